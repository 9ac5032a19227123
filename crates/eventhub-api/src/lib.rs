//! EventHub — HTTP API.
//!
//! Library half of the API server so that integration tests can build the
//! same router the binary serves.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/events", routes::events::router())
        .nest("/api/v1/approvals", routes::approvals::router())
        .nest("/api/v1/dashboard", routes::dashboard::router())
        .nest("/api/v1/registrations", routes::registrations::router())
        .nest("/api/v1/support/tickets", routes::support::router())
        .nest("/api/v1/admin", routes::admin::router())
        .with_state(state)
}
