use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use token_faucet::build_router;
use token_faucet::clock::{Clock, SystemClock};
use token_faucet::config::Args;
use token_faucet::faucet::Faucet;
use token_faucet::invoker::CommandDisburser;
use token_faucet::quota::{InMemoryCounters, QuotaTracker};
use token_faucet::rate_limit::{RateLimiter, sweeper};
use token_faucet::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("token_faucet=info,tower_http=info")),
        )
        .init();

    // parse cli arguments / environment
    let settings = Args::parse().into_settings()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let rate_limiter = Arc::new(RateLimiter::new(
        settings.rate_limit,
        settings.rate_window,
        clock.clone(),
    ));
    let quotas = QuotaTracker::new(Arc::new(InMemoryCounters::new()), clock, settings.quota_limits);
    let disburser = Arc::new(CommandDisburser::new(settings.command.clone()));

    let faucet = Faucet::new(settings.bounds, rate_limiter.clone(), quotas, disburser);
    let state = Arc::new(AppState::new(
        faucet,
        settings.command.ledger_url.clone(),
        settings.command.asset_id.clone(),
    ));

    // spawn the background sweeper
    tokio::spawn(sweeper(rate_limiter, settings.rate_window));

    let app = build_router(state, &settings.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Faucet running on http://localhost:{}", settings.port);
    info!(
        server = %settings.command.ledger_url,
        asset = %settings.command.asset_id,
        command = %settings.command.program,
        "forwarding transfers"
    );
    info!(
        min = settings.bounds.min,
        max = settings.bounds.max,
        per_ip = settings.quota_limits.per_ip,
        per_wallet = settings.quota_limits.per_wallet,
        "amount bounds and daily quotas"
    );
    info!(
        "Rate limit: {} requests per {} seconds",
        settings.rate_limit,
        settings.rate_window.as_secs()
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
