use crate::faucet::Faucet;
use crate::models::HealthResponse;
// app's shared state

pub struct AppState {
    pub faucet: Faucet,
    pub server_url: String, // ledger server, reported by /api/health
    pub asset_id: String,
}

impl AppState {
    pub fn new(faucet: Faucet, server_url: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            faucet,
            server_url: server_url.into(),
            asset_id: asset_id.into(),
        }
    }

    pub fn health(&self) -> HealthResponse {
        let bounds = self.faucet.bounds();
        HealthResponse {
            ok: true,
            server: self.server_url.clone(),
            asset_id: self.asset_id.clone(),
            min: bounds.min,
            max: bounds.max,
        }
    }
}
