use axum::{Json, extract::State};
use std::sync::Arc;
use crate::models::HealthResponse;
use crate::state::AppState;

// Static configuration only, the transfer tool is not probed
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.health())
}
