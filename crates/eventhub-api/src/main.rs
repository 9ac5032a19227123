//! EventHub API server entry point.

use std::sync::Arc;

use eventhub_api::config::Config;
use eventhub_api::error::AppError;
use eventhub_api::state::AppState;
use eventhub_core::clock::SystemClock;
use eventhub_core::ids::UuidIdGenerator;
use eventhub_core::persistence::StateStore;
use eventhub_registration::payment::SimulatedPaymentGateway;
use eventhub_storage::{InMemoryStateStore, JsonFileStateStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting EventHub API server");

    let config = Config::from_env()?;

    let backend: Arc<dyn StateStore> = match &config.data_dir {
        Some(dir) => {
            tracing::info!(data_dir = %dir.display(), "persisting state to disk");
            Arc::new(JsonFileStateStore::open(dir.clone())?)
        }
        None => {
            tracing::warn!("EVENTHUB_DATA_DIR not set; state will not survive a restart");
            Arc::new(InMemoryStateStore::new())
        }
    };

    let app_state = AppState::open(
        &backend,
        Arc::new(SystemClock),
        Arc::new(UuidIdGenerator),
        Arc::new(SimulatedPaymentGateway::approving()),
    )?;

    // TODO: Replace CorsLayer::permissive() with the storefront's origin once it is deployed.
    let app = eventhub_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
