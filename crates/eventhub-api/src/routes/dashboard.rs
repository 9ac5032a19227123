//! Route for the organizer dashboard.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

use eventhub_catalog::application::query_handlers::{self, OrganizerDashboard};

use crate::extract::CurrentActor;
use crate::state::AppState;

/// GET /
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn organizer_dashboard(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Json<OrganizerDashboard> {
    let catalog = state.catalog();
    Json(query_handlers::organizer_dashboard(&catalog, &actor))
}

/// Returns the router for the dashboard.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(organizer_dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::test_support::{attendee_headers, test_app_state};

    #[tokio::test]
    async fn test_dashboard_for_new_organizer_is_empty() {
        // Arrange
        let app = router().with_state(test_app_state());
        let mut builder = Request::builder().uri("/");
        for (name, value) in attendee_headers() {
            builder = builder.header(name, value);
        }

        // Act
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["stats"]["total_events"], 0);
        assert_eq!(json["events"], serde_json::json!([]));
    }
}
