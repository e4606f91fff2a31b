use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use route_server::cache::CachedBackend;
use route_server::config::AppConfig;
use route_server::digitransit::{DigitransitClient, MockDigitransitClient};
use route_server::planner::{PlannerBackend, RoutePlanner};
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // Upstream backend: canned fixtures or the live API
    let backend: Arc<dyn PlannerBackend> = match &config.mock_dir {
        Some(dir) => {
            tracing::warn!(dir = %dir.display(), "serving mock Digitransit data");
            Arc::new(MockDigitransitClient::from_dir(dir)?)
        }
        None => {
            if config.digitransit.subscription_key.is_none() {
                tracing::warn!("DIGITRANSIT_SUBSCRIPTION_KEY not set; API calls may be rejected");
            }
            Arc::new(DigitransitClient::new(config.digitransit.clone())?)
        }
    };

    let backend = CachedBackend::wrap(backend, &config.cache);
    if config.cache.enabled {
        tracing::info!(ttl_secs = config.cache.ttl.as_secs(), "response cache enabled");
    }

    let planner = RoutePlanner::new(backend, config.planner.clone());
    let app = create_router(AppState::new(planner));

    let addr = config.server.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        upstream = %config.digitransit.base_url,
        timezone = %config.planner.timezone,
        stop_selection = %config.planner.stop_selection,
        "route server listening"
    );
    tracing::info!("endpoints: GET /  GET /health  GET /routes?arrival_time=&start_stop=&end_stop=");

    axum::serve(listener, app).await?;
    Ok(())
}
