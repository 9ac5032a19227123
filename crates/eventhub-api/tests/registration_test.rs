//! Integration tests for ticket booking and the admin statistics panel.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{ADMIN, ATTENDEE};
use eventhub_registration::payment::SimulatedPaymentGateway;
use eventhub_storage::InMemoryStateStore;

fn booking(event_id: &str, quantity: u32, ticket_type: &str) -> serde_json::Value {
    serde_json::json!({
        "event_id": event_id,
        "ticket_type": ticket_type,
        "quantity": quantity,
        "attendee": common::attendee("Anita")
    })
}

async fn tickets_available(state: &eventhub_api::state::AppState, event_id: &str) -> u64 {
    let (_, json) = common::get_json(state, &format!("/api/v1/events/{event_id}"), None).await;
    json["tickets_available"].as_u64().unwrap()
}

#[tokio::test]
async fn test_book_then_cancel_round_trip() {
    let state = common::test_state();
    let event_id = common::published_event(&state, "Tech Meet").await;

    // POST /api/v1/registrations
    let (status, json) = common::post_json(
        &state,
        "/api/v1/registrations",
        ATTENDEE,
        &booking(&event_id, 3, "vip"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["registration"]["total_price"], 2250.0);
    assert_eq!(json["registration"]["status"], "confirmed");
    assert_eq!(json["payment"]["state"], "paid");
    let registration_id = json["registration"]["id"].as_str().unwrap().to_owned();
    assert_eq!(tickets_available(&state, &event_id).await, 97);

    // GET /api/v1/registrations lists it with its event
    let (status, mine) = common::get_json(&state, "/api/v1/registrations", Some(ATTENDEE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["registration"]["id"], registration_id.as_str());
    assert_eq!(mine[0]["event"]["title"], "Tech Meet");

    // POST /api/v1/registrations/{id}/cancel releases the seats
    let (status, json) = common::post_json(
        &state,
        &format!("/api/v1/registrations/{registration_id}/cancel"),
        ATTENDEE,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["registration"]["status"], "cancelled");
    assert_eq!(json["payment"]["refund_status"], "pending");
    assert_eq!(tickets_available(&state, &event_id).await, 100);
}

#[tokio::test]
async fn test_overbooking_returns_409() {
    let state = common::test_state();
    let event_id = common::published_event(&state, "Tech Meet").await;

    let (status, json) = common::post_json(
        &state,
        "/api/v1/registrations",
        ATTENDEE,
        &booking(&event_id, 101, "general"),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "insufficient_tickets");
    assert_eq!(tickets_available(&state, &event_id).await, 100);
}

#[tokio::test]
async fn test_declined_payment_returns_402_and_keeps_stock() {
    let state = common::state_with(
        Arc::new(InMemoryStateStore::new()),
        Arc::new(SimulatedPaymentGateway::declining("card expired")),
    );
    let event_id = common::published_event(&state, "Tech Meet").await;

    let (status, json) = common::post_json(
        &state,
        "/api/v1/registrations",
        ATTENDEE,
        &booking(&event_id, 2, "general"),
    )
    .await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(json["error"], "payment_declined");
    assert_eq!(tickets_available(&state, &event_id).await, 100);
}

#[tokio::test]
async fn test_transfer_by_stranger_returns_403() {
    let state = common::test_state();
    let event_id = common::published_event(&state, "Tech Meet").await;
    let (_, json) = common::post_json(
        &state,
        "/api/v1/registrations",
        ATTENDEE,
        &booking(&event_id, 1, "general"),
    )
    .await;
    let registration_id = json["registration"]["id"].as_str().unwrap().to_owned();

    let (status, _) = common::post_json(
        &state,
        &format!("/api/v1/registrations/{registration_id}/transfer"),
        common::OTHER_ORGANIZER,
        &serde_json::json!({ "attendee": common::attendee("Meera") }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_stats_sum_paid_active_registrations() {
    let state = common::test_state();
    let event_id = common::published_event(&state, "Tech Meet").await;
    common::create_event(&state, common::ORGANIZER, "Rust Workshop").await;
    for quantity in [1, 2] {
        common::post_json(
            &state,
            "/api/v1/registrations",
            ATTENDEE,
            &booking(&event_id, quantity, "general"),
        )
        .await;
    }
    common::post_json(
        &state,
        "/api/v1/support/tickets",
        ATTENDEE,
        &serde_json::json!({ "subject": "Invoice", "description": "Need a GST invoice." }),
    )
    .await;

    let (status, json) = common::get_json(&state, "/api/v1/admin/stats", Some(ADMIN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_events"], 1);
    assert_eq!(json["total_revenue"], 1500.0);
    assert_eq!(json["pending_approvals"], 1);
    assert_eq!(json["open_tickets"], 1);
    assert_eq!(json["recent_registrations"].as_array().unwrap().len(), 2);
}
