use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use crate::error::FaucetError;

// POST /api/faucet body. Fields stay untyped until validation so a wrong
// JSON type is reported like any other invalid value.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FaucetRequest {
    #[serde(default)]
    pub destination_wallet: Value,
    #[serde(default)]
    pub amount: Value,
}

// 200 response
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FaucetSuccess {
    pub ok: bool,
    pub tx_id: Option<String>,
    pub stdout: String,
    pub req_id: Uuid,
}

// 4xx / 5xx response
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FaucetFailure {
    pub ok: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_id: Option<Uuid>,
}

impl FaucetFailure {
    pub fn rejected(error: &FaucetError) -> Self {
        Self {
            ok: false,
            error: error.to_string(),
            detail: None,
            req_id: None,
        }
    }

    pub fn failed(error: &FaucetError, request_id: Uuid) -> Self {
        Self {
            ok: false,
            error: error.to_string(),
            detail: Some(error.detail().unwrap_or_default().to_string()),
            req_id: Some(request_id),
        }
    }
}

// GET /api/health response
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub server: String,
    pub asset_id: String,
    pub min: u64,
    pub max: u64,
}
