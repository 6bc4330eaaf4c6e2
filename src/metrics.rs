use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, register_counter, register_counter_vec, register_gauge,
    register_histogram,
};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("faucet_requests_total", "Total number of faucet requests").unwrap();
    pub static ref OUTCOMES: CounterVec = register_counter_vec!(
        "faucet_outcomes_total",
        "Faucet requests by outcome",
        &["outcome"]
    )
    .unwrap();
    pub static ref DISBURSEMENT_LATENCY: Histogram = register_histogram!(
        "faucet_disbursement_latency_seconds",
        "Time spent waiting on the disbursement command",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]
    )
    .unwrap();
    pub static ref RATE_LIMITER_KEYS: Gauge =
        register_gauge!("faucet_rate_limiter_keys", "Source IPs with an open rate limit window").unwrap();
}
