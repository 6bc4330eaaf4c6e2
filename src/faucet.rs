use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use crate::error::FaucetError;
use crate::invoker::{DisbursementRequest, Disburser};
use crate::metrics::{DISBURSEMENT_LATENCY, OUTCOMES};
use crate::models::FaucetRequest;
use crate::outcome::{Outcome, classify};
use crate::quota::{QuotaDecision, QuotaScope, QuotaTracker};
use crate::rate_limit::{RateDecision, RateLimiter};
use crate::validate::{AmountBounds, amount_from_json, validate_address, validate_amount};

// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRequest {
    pub source_identity: String,
    pub destination_address: String,
    pub amount: u64,
}

// validate -> rate limit -> quota -> disburse -> classify.
// The quota bounds admissions, not transfers in flight.
pub struct Faucet {
    bounds: AmountBounds,
    rate_limiter: Arc<RateLimiter>,
    quotas: QuotaTracker,
    disburser: Arc<dyn Disburser>,
}

impl Faucet {
    pub fn new(
        bounds: AmountBounds,
        rate_limiter: Arc<RateLimiter>,
        quotas: QuotaTracker,
        disburser: Arc<dyn Disburser>,
    ) -> Self {
        Self {
            bounds,
            rate_limiter,
            quotas,
            disburser,
        }
    }

    pub fn bounds(&self) -> AmountBounds {
        self.bounds
    }

    pub fn quotas(&self) -> &QuotaTracker {
        &self.quotas
    }

    // Check the body shape and build the typed request
    pub fn validate(&self, source: &str, body: &FaucetRequest) -> Result<AdmissionRequest, FaucetError> {
        let destination = body
            .destination_wallet
            .as_str()
            .filter(|address| validate_address(address))
            .ok_or(FaucetError::InvalidDestination)?;

        let AmountBounds { min, max } = self.bounds;
        let amount = amount_from_json(&body.amount)
            .filter(|amount| validate_amount(*amount, min, max))
            .ok_or(FaucetError::InvalidAmount { min, max })?;

        Ok(AdmissionRequest {
            source_identity: source.to_string(),
            destination_address: destination.to_string(),
            amount: amount as u64,
        })
    }

    // Synchronous gates; tokens and quota units are consumed here
    pub fn admit(&self, source: &str, body: &FaucetRequest) -> Result<AdmissionRequest, FaucetError> {
        let request = self.validate(source, body)?;

        if self.rate_limiter.consume(&request.source_identity) == RateDecision::Exhausted {
            return Err(FaucetError::RateLimited);
        }

        match self
            .quotas
            .reserve(&request.source_identity, &request.destination_address)
        {
            QuotaDecision::Reserved => Ok(request),
            QuotaDecision::IpExceeded => Err(FaucetError::QuotaExceeded(QuotaScope::Ip)),
            QuotaDecision::WalletExceeded => Err(FaucetError::QuotaExceeded(QuotaScope::Wallet)),
        }
    }

    pub async fn handle(&self, source: &str, body: &FaucetRequest) -> Outcome {
        let outcome = match self.admit(source, body) {
            Ok(request) => self.disburse(request).await,
            Err(error) => {
                info!(source, reason = %error, "faucet request rejected");
                Outcome::Rejected(error)
            }
        };

        OUTCOMES.with_label_values(&[outcome.label()]).inc();
        outcome
    }

    async fn disburse(&self, request: AdmissionRequest) -> Outcome {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            source = %request.source_identity,
            destination = %request.destination_address,
            amount = request.amount,
            "disbursing"
        );

        let started = Instant::now();
        let result = self
            .disburser
            .disburse(&DisbursementRequest {
                destination: request.destination_address,
                amount: request.amount,
            })
            .await;
        DISBURSEMENT_LATENCY.observe(started.elapsed().as_secs_f64());

        let outcome = classify(request_id, result);
        match &outcome {
            Outcome::Succeeded { transaction_id, .. } => {
                info!(%request_id, tx_id = transaction_id.as_deref().unwrap_or("-"), "disbursement succeeded");
            }
            Outcome::Failed { error, .. } => {
                warn!(%request_id, reason = %error, detail = error.detail().unwrap_or_default(), "disbursement failed");
            }
            Outcome::Rejected(_) => {}
        }
        outcome
    }
}
