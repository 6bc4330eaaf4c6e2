use axum::Json;
use axum::response::{IntoResponse, Response};
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;
use crate::error::FaucetError;
use crate::invoker::DisbursementResult;
use crate::models::{FaucetFailure, FaucetSuccess};

lazy_static! {
    static ref SUCCESS_MARKER: Regex = Regex::new(r"(?i)\[successfully\]").unwrap();
    static ref TRANSACTION_ID: Regex = Regex::new(r"[0-9a-fA-F]{64}").unwrap();
}

pub fn has_success_marker(output: &str) -> bool {
    SUCCESS_MARKER.is_match(output)
}

// First 64-hex-char run anywhere in the output
pub fn find_transaction_id(output: &str) -> Option<&str> {
    TRANSACTION_ID.find(output).map(|m| m.as_str())
}

// Terminal result of a faucet request. Only requests that got past the
// quota check carry a request id.
#[derive(Debug)]
pub enum Outcome {
    Rejected(FaucetError),
    Failed {
        request_id: Uuid,
        error: FaucetError,
    },
    Succeeded {
        request_id: Uuid,
        transaction_id: Option<String>,
        raw_output: String,
    },
}

impl Outcome {
    // Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Rejected(FaucetError::RateLimited) => "rate_limited",
            Outcome::Rejected(FaucetError::QuotaExceeded(_)) => "quota_exceeded",
            Outcome::Rejected(FaucetError::MalformedBody(_)) => "malformed",
            Outcome::Rejected(_) => "invalid",
            Outcome::Failed { .. } => "failed",
            Outcome::Succeeded { .. } => "succeeded",
        }
    }

    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            Outcome::Rejected(_) => None,
            Outcome::Failed { request_id, .. } | Outcome::Succeeded { request_id, .. } => {
                Some(*request_id)
            }
        }
    }
}

// Map a finished disbursement attempt to its outcome
pub fn classify(request_id: Uuid, result: DisbursementResult) -> Outcome {
    if !result.succeeded {
        let detail = result.raw_error.unwrap_or_default();
        return Outcome::Failed {
            request_id,
            error: FaucetError::Invocation(detail),
        };
    }

    if !has_success_marker(&result.raw_output) {
        // surface stderr when the tool printed nothing useful on stdout
        let detail = if result.raw_output.is_empty() {
            result.raw_error.unwrap_or_default()
        } else {
            result.raw_output
        };
        return Outcome::Failed {
            request_id,
            error: FaucetError::DisbursementRejected(detail),
        };
    }

    Outcome::Succeeded {
        request_id,
        transaction_id: result.transaction_id,
        raw_output: result.raw_output,
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Rejected(error) => {
                (error.status(), Json(FaucetFailure::rejected(&error))).into_response()
            }
            Outcome::Failed { request_id, error } => (
                error.status(),
                Json(FaucetFailure::failed(&error, request_id)),
            )
                .into_response(),
            Outcome::Succeeded {
                request_id,
                transaction_id,
                raw_output,
            } => Json(FaucetSuccess {
                ok: true,
                tx_id: transaction_id,
                stdout: raw_output,
                req_id: request_id,
            })
            .into_response(),
        }
    }
}
