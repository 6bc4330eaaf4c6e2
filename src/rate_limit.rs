use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::debug;
use crate::clock::Clock;
use crate::metrics::RATE_LIMITER_KEYS;

// Rate limit entry - tracks requests per source IP
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Exhausted,
}

// Fixed window limiter: `capacity` requests per `window`, per source identity.
// A window opens on the first request from a source and resets on the first
// request after it has elapsed.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    capacity: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(capacity: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
            window,
            clock,
        }
    }

    // Take one token for `source`. An exhausted source is left untouched.
    pub fn consume(&self, source: &str) -> RateDecision {
        let now = self.clock.now();

        let mut entry = self
            .entries
            .entry(source.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_start: now,
            });

        // window expired..? start a fresh one
        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count < self.capacity {
            entry.count += 1;
            return RateDecision::Allowed;
        }

        RateDecision::Exhausted
    }

    // Drop entries whose window has already elapsed
    pub fn sweep(&self) {
        let now = self.clock.now();
        let window = self.window;
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < window);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Background sweeper - keeps the limiter map bounded to active sources
pub async fn sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let before = limiter.len();
        limiter.sweep();
        let after = limiter.len();
        RATE_LIMITER_KEYS.set(after as f64);

        if before != after {
            debug!(removed = before - after, remaining = after, "swept expired rate limit windows");
        }
    }
}
