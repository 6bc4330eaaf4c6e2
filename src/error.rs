use axum::http::StatusCode;
use thiserror::Error;
use crate::quota::QuotaScope;

// Every way a faucet request can end without a disbursement
#[derive(Debug, Error)]
pub enum FaucetError {
    #[error("destinationWallet is invalid")]
    InvalidDestination,
    #[error("amount is invalid (min={min}, max={max})")]
    InvalidAmount { min: u64, max: u64 },
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("too many requests")]
    RateLimited,
    #[error("daily quota per {0} exceeded")]
    QuotaExceeded(QuotaScope),
    #[error("invocation error")]
    Invocation(String),
    #[error("disbursement reported failure")]
    DisbursementRejected(String),
}

impl FaucetError {
    pub fn status(&self) -> StatusCode {
        match self {
            FaucetError::InvalidDestination
            | FaucetError::InvalidAmount { .. }
            | FaucetError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            FaucetError::RateLimited | FaucetError::QuotaExceeded(_) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            FaucetError::Invocation(_) | FaucetError::DisbursementRejected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    // Raw process output attached to disbursement-stage failures
    pub fn detail(&self) -> Option<&str> {
        match self {
            FaucetError::Invocation(detail) | FaucetError::DisbursementRejected(detail) => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum amount {min} is greater than maximum amount {max}")]
    InvertedBounds { min: u64, max: u64 },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
