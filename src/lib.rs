pub mod clock;
pub mod config;
pub mod error;
pub mod faucet;
pub mod handlers;
pub mod invoker;
pub mod metrics;
pub mod models;
pub mod outcome;
pub mod quota;
pub mod rate_limit;
pub mod state;
pub mod validate;

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use crate::handlers::{faucet_handler, health_handler, metrics_handler};
use crate::state::AppState;

// API routes, with the static frontend as fallback
pub fn build_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/faucet", post(faucet_handler))
        .route("/api/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
