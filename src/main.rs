// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::assembler::CoverageAssembler;
use crate::application::fetcher::TimeSeriesFetcher;
use crate::application::location_service::LocationService;
use crate::application::observation_service::ObservationService;
use crate::infrastructure::config::load_service_config;
use crate::infrastructure::http_datastore::HttpDatastore;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_service_config()?;

    // Create datastore client (infrastructure layer)
    let store = Arc::new(HttpDatastore::new(&config.datastore)?);
    tracing::info!("Using datastore at {}", config.datastore.base_url());

    // Create services (application layer)
    let fetcher = TimeSeriesFetcher::new(store, config.datastore.timeout());
    let observation_service = ObservationService::new(
        fetcher.clone(),
        CoverageAssembler::new(config.query.drop_missing_ranges),
        config.query.position_buffer_degrees,
    );
    let location_service = LocationService::new(fetcher);

    // Create application state
    let state = Arc::new(AppState {
        observation_service,
        location_service,
        default_window_hours: config.query.default_window_hours,
    });

    // Build router (presentation layer)
    // Compression is handled in the response builders, so no CompressionLayer here
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!("Starting observations EDR service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
