use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use skylink_api::{app, AppState, IdentityConfig};
use skylink_booking::{BookingConfig, BookingOrchestrator};
use skylink_core::{InMemoryBookingStore, MockInventoryClient, MockPartnerClient};
use skylink_shared::PartnerBooking;
use std::sync::Arc;
use tower::util::ServiceExt;

const JWT_SECRET: &str = "test-secret";
const PARTNER_KEY: &str = "PARTNER_SECRET";

#[derive(Serialize)]
struct TestClaims {
    id: i64,
    role: String,
    exp: usize,
}

fn token(user_id: i64, role: &str) -> String {
    encode(
        &Header::default(),
        &TestClaims {
            id: user_id,
            role: role.to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        },
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

fn test_app(inventory: MockInventoryClient, travel: MockPartnerClient) -> Router {
    let orchestrator = BookingOrchestrator::new(
        Arc::new(InMemoryBookingStore::new()),
        Arc::new(inventory),
        Arc::new(MockPartnerClient::new()),
        Arc::new(travel),
        BookingConfig::new(0, PARTNER_KEY),
    );

    app(AppState {
        orchestrator: Arc::new(orchestrator),
        identity: IdentityConfig {
            jwt_secret: JWT_SECRET.to_string(),
            partner_api_key: PARTNER_KEY.to_string(),
            service_token_ttl: 300,
        },
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_booking_end_to_end() {
    let app = test_app(
        MockInventoryClient::new().with_flight(1, "FL100", 100.0, 2, "ACTIVE"),
        MockPartnerClient::new(),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/v1/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token(7, "CUSTOMER")))
        .body(Body::from(
            json!({
                "flight_code": "FL100",
                "passenger_name": "Alice",
                "number_of_seats": 2
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["total_price"], json!(200.0));
    assert_eq!(body["status"], json!("BOOKED"));
    assert_eq!(body["payment_status"], json!("UNPAID"));
    assert_eq!(body["source"], json!("USER"));

    // The flight is full now; the next attempt conflicts
    let request = Request::builder()
        .method("POST")
        .uri("/v1/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token(8, "CUSTOMER")))
        .body(Body::from(
            json!({
                "flight_code": "FL100",
                "passenger_name": "Bob",
                "number_of_seats": 1
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Bob has nothing persisted
    let request = Request::builder()
        .uri("/v1/bookings/mine")
        .header(header::AUTHORIZATION, format!("Bearer {}", token(8, "CUSTOMER")))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_anonymous_caller_is_rejected() {
    let app = test_app(
        MockInventoryClient::new().with_flight(1, "FL100", 100.0, 2, "ACTIVE"),
        MockPartnerClient::new(),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/v1/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "flight_code": "FL100",
                "passenger_name": "Alice",
                "number_of_seats": 1
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_travel_sync_with_partner_key() {
    let travel = MockPartnerClient::new().with_booking(PartnerBooking {
        id: "42".to_string(),
        user_id: Some("u-9".to_string()),
        kind: Some("FLIGHT".to_string()),
        hotel_name: None,
        flight_code: Some("FL100".to_string()),
        passenger_name: Some("Dana".to_string()),
        status: Some("PAID".to_string()),
    });
    let app = test_app(
        MockInventoryClient::new().with_flight(1, "FL100", 150.0, 3, "ACTIVE"),
        travel,
    );

    // Without the shared key the sync is refused
    let request = Request::builder()
        .method("POST")
        .uri("/v1/sync/travel")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "booking_id": "42" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("POST")
        .uri("/v1/sync/travel")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-api-key", PARTNER_KEY)
        .body(Body::from(json!({ "booking_id": "42" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], json!("CONFIRMED"));
    assert_eq!(body["payment_status"], json!("PAID"));
    assert_eq!(body["source"], json!("TRAVEL_APP"));
    assert_eq!(body["owner_user_id"], json!(0));

    // The import shows up in the partner reconciliation view
    let request = Request::builder()
        .uri("/v1/partner/bookings")
        .header("x-api-key", PARTNER_KEY)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
