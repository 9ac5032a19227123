//! Routes for browsing and managing events.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use eventhub_catalog::application::command_handlers::{self, CatalogCommandResult};
use eventhub_catalog::application::query_handlers::{self, EventHistory};
use eventhub_catalog::domain::commands;
use eventhub_catalog::domain::event::{Event, EventDraft, EventPatch};
use eventhub_catalog::domain::filter::FilterCriteria;
use eventhub_catalog::domain::log::EventLog;

use crate::error::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

/// Response body returned after a lifecycle command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The event after the command, absent after a delete.
    pub event: Option<Event>,
    /// The activity-log entry the command wrote.
    pub log: EventLog,
}

impl From<CatalogCommandResult> for CommandResponse {
    fn from(result: CatalogCommandResult) -> Self {
        Self {
            event: result.event,
            log: result.log,
        }
    }
}

/// GET /
#[instrument(skip(state, criteria))]
async fn list_events(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> Json<Vec<Event>> {
    let catalog = state.catalog();
    Json(query_handlers::list_visible_events(&catalog, &criteria))
}

/// POST /
#[instrument(skip(state, actor, draft), fields(user_id = %actor.id))]
async fn create_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let command = commands::CreateEvent {
        correlation_id: Uuid::new_v4(),
        actor,
        draft,
    };

    info!(correlation_id = %command.correlation_id, "handling create_event command");

    let result = command_handlers::handle_create_event(
        &command,
        &mut state.catalog(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// GET /{event_id}
#[instrument(skip(state, actor))]
async fn get_event(
    State(state): State<AppState>,
    actor: Option<CurrentActor>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let catalog = state.catalog();
    let event = match actor {
        Some(CurrentActor(actor)) => query_handlers::get_event_for(&catalog, &actor, &event_id)?,
        None => query_handlers::get_visible_event(&catalog, &event_id)?,
    };
    Ok(Json(event))
}

/// PATCH /{event_id}
#[instrument(skip(state, actor, changes), fields(user_id = %actor.id))]
async fn edit_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(event_id): Path<String>,
    Json(changes): Json<EventPatch>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::EditEvent {
        correlation_id: Uuid::new_v4(),
        actor,
        event_id,
        changes,
    };

    info!(correlation_id = %command.correlation_id, "handling edit_event command");

    let result = command_handlers::handle_edit_event(
        &command,
        &mut state.catalog(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok(Json(result.into()))
}

/// DELETE /{event_id}
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn delete_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(event_id): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DeleteEvent {
        correlation_id: Uuid::new_v4(),
        actor,
        event_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_event command");

    let result = command_handlers::handle_delete_event(
        &command,
        &mut state.catalog(),
        state.clock.as_ref(),
        state.ids.as_ref(),
    )?;

    Ok(Json(result.into()))
}

/// GET /{event_id}/history
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn event_history(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(event_id): Path<String>,
) -> Result<Json<EventHistory>, ApiError> {
    let catalog = state.catalog();
    Ok(Json(query_handlers::event_history(&catalog, &actor, &event_id)?))
}

/// Returns the router for the events resource.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{event_id}",
            get(get_event).patch(edit_event).delete(delete_event),
        )
        .route("/{event_id}/history", get(event_history))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::test_support::{admin_headers, test_app_state};

    fn draft_body() -> Value {
        serde_json::json!({
            "title": "Rust Meetup",
            "description": "Monthly meetup for Rust developers in the city.",
            "date": "2026-06-01",
            "time": "18:00:00",
            "location": "Community Hall",
            "price": 0.0,
            "category": "networking",
            "image_url": "https://images.example.com/rust.jpg",
            "capacity": 40
        })
    }

    #[tokio::test]
    async fn test_list_events_returns_200_with_empty_catalog() {
        // Arrange
        let app = router().with_state(test_app_state());
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_event_without_identity_returns_401() {
        // Arrange
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&draft_body()).unwrap()))
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_create_event_returns_201_and_publishes() {
        // Arrange
        let app = router().with_state(test_app_state());
        let mut builder = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json");
        for (name, value) in admin_headers() {
            builder = builder.header(name, value);
        }
        let request = builder
            .body(Body::from(serde_json::to_vec(&draft_body()).unwrap()))
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["event"]["status"], "approved");
        assert_eq!(json["event"]["organizer"], "Admin");
        assert_eq!(json["log"]["action"], "created");
    }

    #[tokio::test]
    async fn test_get_unknown_event_returns_404() {
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .uri("/evt-missing")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_event_with_missing_fields_returns_422() {
        // Arrange
        let app = router().with_state(test_app_state());
        let mut builder = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json");
        for (name, value) in admin_headers() {
            builder = builder.header(name, value);
        }
        let request = builder.body(Body::from("{}")).unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
