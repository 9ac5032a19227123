//! Route for the admin statistics panel.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::instrument;

use eventhub_registration::application::query_handlers::sales_summary;
use eventhub_registration::domain::registration::Registration;

use crate::error::ApiError;
use crate::extract::CurrentActor;
use crate::state::AppState;

const RECENT_REGISTRATIONS: usize = 5;

/// Platform-wide headline numbers.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_events: usize,
    /// Sum of paid, non-cancelled registrations.
    pub total_revenue: f64,
    /// Events awaiting an approve or reject decision.
    pub pending_approvals: usize,
    pub open_tickets: usize,
    /// The newest registrations, newest first.
    pub recent_registrations: Vec<Registration>,
}

/// GET /stats
#[instrument(skip(state, actor), fields(user_id = %actor.id))]
async fn stats(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<AdminStats>, ApiError> {
    actor.require_admin("view platform statistics")?;

    let (total_events, pending_approvals) = {
        let catalog = state.catalog();
        (catalog.events.events().len(), catalog.pending.len())
    };
    let sales = sales_summary(&state.registrations(), RECENT_REGISTRATIONS);
    let open_tickets = state.tickets().get_open_tickets_count();

    Ok(Json(AdminStats {
        total_events,
        total_revenue: sales.total_revenue,
        pending_approvals,
        open_tickets,
        recent_registrations: sales.recent_registrations,
    }))
}

/// Returns the router for admin endpoints.
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::test_support::{admin_headers, attendee_headers, test_app_state};

    fn get_stats(headers: [(&'static str, &'static str); 3]) -> Request<Body> {
        let mut builder = Request::builder().uri("/stats");
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_stats_for_admin_returns_200() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let response = app.oneshot(get_stats(admin_headers())).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["total_events"], 0);
        assert_eq!(json["open_tickets"], 0);
        assert_eq!(json["recent_registrations"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_stats_for_attendee_returns_403() {
        let app = router().with_state(test_app_state());

        let response = app.oneshot(get_stats(attendee_headers())).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
