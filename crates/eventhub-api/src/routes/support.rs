//! Routes for the support desk.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use eventhub_support::application::{command_handlers, query_handlers};
use eventhub_support::domain::commands;
use eventhub_support::domain::ticket::{SupportTicket, TicketMessage, TicketPriority, TicketStatus};

use crate::error::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct OpenTicketRequest {
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub priority: TicketPriority,
}

/// Request body for POST /{ticket_id}/messages.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}

/// Request body for PUT /{ticket_id}/status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: TicketStatus,
}

/// GET /
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn list_tickets(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Json<Vec<SupportTicket>> {
    let tickets = state.tickets();
    Json(query_handlers::tickets_for(&tickets, &actor))
}

/// POST /
#[instrument(skip(state, actor, request), fields(user_id = %actor.id))]
async fn open_ticket(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<OpenTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>), ApiError> {
    let command = commands::OpenTicket {
        correlation_id: Uuid::new_v4(),
        actor,
        subject: request.subject,
        description: request.description,
        priority: request.priority,
    };

    info!(correlation_id = %command.correlation_id, "handling open_ticket command");

    let ticket = command_handlers::handle_open_ticket(
        &command,
        &mut state.tickets(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /{ticket_id}
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn get_ticket(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(ticket_id): Path<String>,
) -> Result<Json<SupportTicket>, ApiError> {
    let tickets = state.tickets();
    Ok(Json(query_handlers::ticket_for(&tickets, &actor, &ticket_id)?))
}

/// POST /{ticket_id}/messages
#[instrument(skip(state, actor, request), fields(user_id = %actor.id))]
async fn reply_to_ticket(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(ticket_id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<TicketMessage>), ApiError> {
    let command = commands::ReplyToTicket {
        correlation_id: Uuid::new_v4(),
        actor,
        ticket_id,
        message: request.message,
    };

    info!(correlation_id = %command.correlation_id, "handling reply_to_ticket command");

    let message = command_handlers::handle_reply_to_ticket(
        &command,
        &mut state.tickets(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /{ticket_id}/status
#[instrument(skip(state, actor, request), fields(user_id = %actor.id))]
async fn change_status(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(ticket_id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<SupportTicket>, ApiError> {
    let command = commands::ChangeTicketStatus {
        correlation_id: Uuid::new_v4(),
        actor,
        ticket_id,
        status: request.status,
    };

    info!(correlation_id = %command.correlation_id, "handling change_ticket_status command");

    let ticket = command_handlers::handle_change_ticket_status(
        &command,
        &mut state.tickets(),
        state.clock.as_ref(),
    )?;

    Ok(Json(ticket))
}

/// Returns the router for support tickets.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets).post(open_ticket))
        .route("/{ticket_id}", get(get_ticket))
        .route("/{ticket_id}/messages", post(reply_to_ticket))
        .route("/{ticket_id}/status", put(change_status))
}
