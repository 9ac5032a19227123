//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use eventhub_api::state::AppState;
use eventhub_core::persistence::StateStore;
use eventhub_registration::payment::{PaymentGateway, SimulatedPaymentGateway};
use eventhub_storage::InMemoryStateStore;
use eventhub_test_support::{FixedClock, SequenceIds};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Identity headers for a signed-in user.
pub type Identity = [(&'static str, &'static str); 3];

pub const ADMIN: Identity = [
    ("x-user-id", "u-1"),
    ("x-user-name", "Priya"),
    ("x-user-role", "admin"),
];

pub const ORGANIZER: Identity = [
    ("x-user-id", "u-2"),
    ("x-user-name", "Ravi"),
    ("x-user-role", "organizer"),
];

pub const OTHER_ORGANIZER: Identity = [
    ("x-user-id", "u-3"),
    ("x-user-name", "Meera"),
    ("x-user-role", "organizer"),
];

pub const ATTENDEE: Identity = [
    ("x-user-id", "u-5"),
    ("x-user-name", "Anita"),
    ("x-user-role", "attendee"),
];

/// Application state over `backend` with the fixed clock (2026-01-15 10:00
/// UTC), sequential ids, and `gateway`.
pub fn state_with(backend: Arc<dyn StateStore>, gateway: Arc<dyn PaymentGateway>) -> AppState {
    AppState::open(
        &backend,
        Arc::new(FixedClock::default()),
        Arc::new(SequenceIds::default()),
        gateway,
    )
    .unwrap()
}

/// In-memory application state whose payments always succeed.
pub fn test_state() -> AppState {
    state_with(
        Arc::new(InMemoryStateStore::new()),
        Arc::new(SimulatedPaymentGateway::approving()),
    )
}

/// Build the full app router over `state`. Uses the same route structure as
/// `main.rs`.
pub fn build_test_app(state: &AppState) -> Router {
    eventhub_api::build_router(state.clone())
}

/// Send a request with an optional JSON body as `identity` and return the
/// status and parsed JSON response.
pub async fn send_json(
    state: &AppState,
    method: &str,
    uri: &str,
    identity: Option<Identity>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(headers) = identity {
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = build_test_app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    state: &AppState,
    uri: &str,
    identity: Identity,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(state, "POST", uri, Some(identity), Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(
    state: &AppState,
    uri: &str,
    identity: Option<Identity>,
) -> (StatusCode, serde_json::Value) {
    send_json(state, "GET", uri, identity, None).await
}

/// A valid event draft titled `title`, dated after the fixed clock.
pub fn draft(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "An evening of lightning talks on systems programming.",
        "date": "2026-03-14",
        "time": "18:30:00",
        "location": "Bengaluru Convention Centre",
        "price": 500.0,
        "category": "conference",
        "image_url": "https://images.example.com/tech-meet.jpg",
        "capacity": 100
    })
}

/// Attendee details for bookings.
pub fn attendee(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": "attendee@example.com",
        "phone": "+91 98450 00000"
    })
}

/// Creates an event as `identity` and returns its id.
pub async fn create_event(state: &AppState, identity: Identity, title: &str) -> String {
    let (status, json) = post_json(state, "/api/v1/events", identity, &draft(title)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["event"]["id"].as_str().unwrap().to_owned()
}

/// Creates an event as the organizer and has the admin approve it.
pub async fn published_event(state: &AppState, title: &str) -> String {
    let event_id = create_event(state, ORGANIZER, title).await;
    let (status, json) = post_json(
        state,
        &format!("/api/v1/approvals/{event_id}/approve"),
        ADMIN,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approve failed: {json}");
    event_id
}
