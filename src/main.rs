mod api;
mod config;
mod http;
mod tracker;
mod upload;

use crate::api::{build_api, AppState};
use crate::config::Config;
use crate::http::ApiClient;
use crate::tracker::service::RestTracker;
use std::error::Error;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let app_state = AppState {
        tracker: Arc::new(RestTracker::new(ApiClient::new(&config)?)),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("serving on {}, tracker at {}", config.bind_address, config.tracker_api_url);
    axum::serve(listener, build_api(app_state)).await?;
    Ok(())
}
