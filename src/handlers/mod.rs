mod health;
mod metrics;
mod faucet;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use faucet::faucet_handler;
