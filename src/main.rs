use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod error;
mod gateway;
mod live_store;
mod models;
mod ufp;

use api::AppState;
use config::Config;
use gateway::{DataGateway, SportmonksClient};
use live_store::LiveStore;
use ufp::Predictor;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up SPORTMONKS_API_KEY and friends from a local .env, if present
    dotenvy::dotenv().ok();

    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let gateway: Arc<dyn DataGateway> = Arc::new(SportmonksClient::new(
        &config.sportmonks_api_url,
        config.api_key(),
        Duration::from_secs(config.request_timeout_secs),
    )?);
    info!(
        "Upstream gateway: {} at {} (timeout {}s)",
        gateway.name(),
        config.sportmonks_api_url,
        config.request_timeout_secs
    );

    let state = AppState {
        predictor: Predictor::new(gateway, config.fixture_concurrency),
        live_matches: LiveStore::new("match", config.live_store_capacity),
        live_players: LiveStore::new("player", config.live_store_capacity),
    };
    if config.live_store_capacity == 0 {
        info!("Live stores are unbounded");
    } else {
        info!("Live stores capped at {} records each", config.live_store_capacity);
    }

    let app = api::router(state);
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("UFP connector listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
