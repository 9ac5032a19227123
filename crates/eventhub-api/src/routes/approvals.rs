//! Routes for the admin review queue.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use eventhub_catalog::application::command_handlers;
use eventhub_catalog::application::query_handlers::{self, ReviewItem};
use eventhub_catalog::domain::commands;

use crate::error::ApiError;
use crate::extract::CurrentActor;
use crate::routes::events::CommandResponse;
use crate::state::AppState;

/// Request body for the approve and reject endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DecisionRequest {
    /// Notes recorded on the event's modification records.
    pub admin_notes: Option<String>,
}

/// GET /
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn list_pending(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<ReviewItem>>, ApiError> {
    actor.require_admin("review pending events")?;
    let catalog = state.catalog();
    Ok(Json(query_handlers::review_queue(&catalog)))
}

/// POST /{event_id}/approve
#[instrument(skip(state, actor, request), fields(user_id = %actor.id))]
async fn approve_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(event_id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ApproveEvent {
        correlation_id: Uuid::new_v4(),
        actor,
        event_id,
        admin_notes: request.admin_notes,
    };

    info!(correlation_id = %command.correlation_id, "handling approve_event command");

    let result = command_handlers::handle_approve_event(
        &command,
        &mut state.catalog(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok(Json(result.into()))
}

/// POST /{event_id}/reject
#[instrument(skip(state, actor, request), fields(user_id = %actor.id))]
async fn reject_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(event_id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RejectEvent {
        correlation_id: Uuid::new_v4(),
        actor,
        event_id,
        admin_notes: request.admin_notes,
    };

    info!(correlation_id = %command.correlation_id, "handling reject_event command");

    let result = command_handlers::handle_reject_event(
        &command,
        &mut state.catalog(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok(Json(result.into()))
}

/// Returns the router for the review queue.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pending))
        .route("/{event_id}/approve", post(approve_event))
        .route("/{event_id}/reject", post(reject_event))
}
