//! Routes for booking, cancelling, and transferring tickets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use eventhub_registration::application::command_handlers::{self, RegistrationCommandResult};
use eventhub_registration::application::query_handlers::{self, RegistrationView};
use eventhub_registration::domain::commands;
use eventhub_registration::domain::registration::{
    AttendeeInfo, PaymentStatus, Registration, TicketType,
};

use crate::error::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct BookTicketsRequest {
    /// The event to book.
    pub event_id: String,
    /// Ticket tier; general admission when omitted.
    #[serde(default = "general_admission")]
    pub ticket_type: TicketType,
    /// Number of tickets.
    pub quantity: u32,
    /// Who will attend.
    pub attendee: AttendeeInfo,
}

fn general_admission() -> TicketType {
    TicketType::General
}

/// Request body for POST /{registration_id}/transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// The new attendee.
    pub attendee: AttendeeInfo,
}

/// Response body for registration commands.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub registration: Registration,
    pub payment: Option<PaymentStatus>,
}

impl From<RegistrationCommandResult> for RegistrationResponse {
    fn from(result: RegistrationCommandResult) -> Self {
        Self {
            registration: result.registration,
            payment: result.payment,
        }
    }
}

/// GET /
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn my_registrations(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Json<Vec<RegistrationView>> {
    let catalog = state.catalog();
    let registrations = state.registrations();
    Json(query_handlers::registrations_for_user(
        &registrations,
        &catalog,
        &actor.id,
    ))
}

/// POST /
#[instrument(skip(state, actor, request), fields(user_id = %actor.id, event_id = %request.event_id))]
async fn book_tickets(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(request): Json<BookTicketsRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let command = commands::BookTickets {
        correlation_id: Uuid::new_v4(),
        actor,
        event_id: request.event_id,
        ticket_type: request.ticket_type,
        quantity: request.quantity,
        attendee: request.attendee,
    };

    info!(correlation_id = %command.correlation_id, "handling book_tickets command");

    let mut catalog = state.catalog();
    let mut registrations = state.registrations();
    let result = command_handlers::handle_book_tickets(
        &command,
        &mut catalog,
        &mut registrations,
        state.gateway.as_ref(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /{registration_id}/cancel
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn cancel_registration(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(registration_id): Path<String>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let command = commands::CancelRegistration {
        correlation_id: Uuid::new_v4(),
        actor,
        registration_id,
    };

    info!(correlation_id = %command.correlation_id, "handling cancel_registration command");

    let mut catalog = state.catalog();
    let mut registrations = state.registrations();
    let result = command_handlers::handle_cancel_registration(
        &command,
        &mut catalog,
        &mut registrations,
        state.clock.as_ref(),
    )?;

    Ok(Json(result.into()))
}

/// POST /{registration_id}/transfer
#[instrument(skip(state, actor, request), fields(user_id = %actor.id))]
async fn transfer_registration(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(registration_id): Path<String>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let command = commands::TransferRegistration {
        correlation_id: Uuid::new_v4(),
        actor,
        registration_id,
        attendee: request.attendee,
    };

    info!(correlation_id = %command.correlation_id, "handling transfer_registration command");

    let result =
        command_handlers::handle_transfer_registration(&command, &mut state.registrations())?;

    Ok(Json(result.into()))
}

/// Returns the router for registrations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_registrations).post(book_tickets))
        .route("/{registration_id}/cancel", post(cancel_registration))
        .route("/{registration_id}/transfer", post(transfer_registration))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::test_support::{attendee_headers, test_app_state};

    fn post(uri: &str, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        for (name, value) in attendee_headers() {
            builder = builder.header(name, value);
        }
        builder
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn attendee() -> Value {
        serde_json::json!({
            "name": "Anita",
            "email": "anita@example.com",
            "phone": "+91 98450 00000"
        })
    }

    #[tokio::test]
    async fn test_booking_unknown_event_returns_404() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({
            "event_id": "evt-missing",
            "quantity": 1,
            "attendee": attendee()
        });

        // Act
        let response = app.oneshot(post("/", &body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cancelling_unknown_registration_returns_404() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(post("/reg-missing/cancel", &serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_booking_without_attendee_returns_422() {
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "event_id": "evt-1", "quantity": 1 });

        let response = app.oneshot(post("/", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
