use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;
use crate::error::FaucetError;
use crate::metrics::{OUTCOMES, REQUEST_TOTAL};
use crate::outcome::Outcome;
use crate::state::AppState;
use crate::models::FaucetRequest;

// The peer IP is the source identity for rate limits and quotas
pub async fn faucet_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<FaucetRequest>, JsonRejection>,
) -> Response {
    REQUEST_TOTAL.inc();

    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            debug!(peer = %peer, error = %rejection, "unreadable faucet request body");
            let outcome = Outcome::Rejected(FaucetError::MalformedBody(rejection.body_text()));
            OUTCOMES.with_label_values(&[outcome.label()]).inc();
            return outcome.into_response();
        }
    };

    let source = peer.ip().to_string();
    state.faucet.handle(&source, &body).await.into_response()
}
