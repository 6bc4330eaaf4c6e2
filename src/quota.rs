use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::info;
use crate::clock::Clock;

pub const DAILY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaScope {
    Ip,
    Wallet,
}

impl fmt::Display for QuotaScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaScope::Ip => f.write_str("IP"),
            QuotaScope::Wallet => f.write_str("wallet"),
        }
    }
}

// Storage for the quota counters, one map per scope
pub trait CounterStore: Send + Sync {
    // returns the value after the increment
    fn increment(&self, scope: QuotaScope, key: &str) -> u32;
    fn count(&self, scope: QuotaScope, key: &str) -> u32;
    fn clear(&self);
    fn len(&self, scope: QuotaScope) -> usize;
}

#[derive(Debug, Default)]
pub struct InMemoryCounters {
    ip: DashMap<String, u32>,
    wallet: DashMap<String, u32>,
}

impl InMemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, scope: QuotaScope) -> &DashMap<String, u32> {
        match scope {
            QuotaScope::Ip => &self.ip,
            QuotaScope::Wallet => &self.wallet,
        }
    }
}

impl CounterStore for InMemoryCounters {
    fn increment(&self, scope: QuotaScope, key: &str) -> u32 {
        let mut count = self.map(scope).entry(key.to_string()).or_insert(0);
        let next = count.saturating_add(1);
        *count = next;
        next
    }

    fn count(&self, scope: QuotaScope, key: &str) -> u32 {
        self.map(scope).get(key).map(|c| *c).unwrap_or(0)
    }

    fn clear(&self) {
        self.ip.clear();
        self.wallet.clear();
    }

    fn len(&self, scope: QuotaScope) -> usize {
        self.map(scope).len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub per_ip: u32,
    pub per_wallet: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Reserved,
    IpExceeded,
    WalletExceeded,
}

// Daily quotas per source IP and per wallet, sharing one lazily checked reset
pub struct QuotaTracker {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    limits: QuotaLimits,
    window: Duration,
    last_reset: Mutex<Instant>,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn CounterStore>, clock: Arc<dyn Clock>, limits: QuotaLimits) -> Self {
        Self::with_window(store, clock, limits, DAILY_WINDOW)
    }

    pub fn with_window(
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
        limits: QuotaLimits,
        window: Duration,
    ) -> Self {
        let last_reset = Mutex::new(clock.now());
        Self {
            store,
            clock,
            limits,
            window,
            last_reset,
        }
    }

    // Counters are bumped before comparison: a wallet rejection still uses
    // one IP unit, an IP rejection never reaches the wallet counter.
    pub fn reserve(&self, source: &str, destination: &str) -> QuotaDecision {
        self.reset_if_due();

        let ip_count = self.store.increment(QuotaScope::Ip, source);
        if ip_count > self.limits.per_ip {
            return QuotaDecision::IpExceeded;
        }

        let wallet_count = self.store.increment(QuotaScope::Wallet, destination);
        if wallet_count > self.limits.per_wallet {
            return QuotaDecision::WalletExceeded;
        }

        QuotaDecision::Reserved
    }

    pub fn count(&self, scope: QuotaScope, key: &str) -> u32 {
        self.store.count(scope, key)
    }

    pub fn tracked(&self, scope: QuotaScope) -> usize {
        self.store.len(scope)
    }

    fn reset_if_due(&self) {
        let now = self.clock.now();
        // held across the clear so concurrent callers reset at most once
        let mut last_reset = self.last_reset.lock().unwrap_or_else(PoisonError::into_inner);
        if now.duration_since(*last_reset) > self.window {
            self.store.clear();
            *last_reset = now;
            info!("daily quota counters reset");
        }
    }
}
