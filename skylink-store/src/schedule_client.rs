use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use skylink_core::{ForwardableCredential, InventoryClient, InventoryError};
use skylink_shared::FlightInfo;
use std::time::Duration;

/// GraphQL-over-HTTP client for the remote schedule authority.
pub struct HttpInventoryClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightDto {
    id: serde_json::Value,
    flight_code: String,
    price: f64,
    available_seats: i32,
    status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeatCountDto {
    available_seats: i32,
}

// GraphQL ID! values arrive as strings even when the upstream key is numeric
fn parse_id(value: &serde_json::Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

impl HttpInventoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    async fn execute(
        &self,
        query: &str,
        variables: serde_json::Value,
        credential: &ForwardableCredential,
    ) -> Result<serde_json::Value, InventoryError> {
        let mut request = self
            .http
            .post(&self.base_url)
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(bearer) = credential.bearer.as_deref() {
            request = request.header("authorization", format!("Bearer {}", bearer));
        }
        if let Some(api_key) = credential.api_key.as_deref() {
            request = request.header("x-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, &self.base_url))?;
        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| transport_error(e, &self.base_url))?;

        if let Some(errors) = body.errors {
            let message = errors
                .into_iter()
                .next()
                .map(|e| e.message)
                .unwrap_or_else(|| "unknown error".to_string());
            if message.to_lowercase().contains("not found") {
                return Err(InventoryError::NotFound(message));
            }
            return Err(InventoryError::Rejected(message));
        }

        body.data
            .ok_or_else(|| InventoryError::Rejected("empty response".to_string()))
    }
}

fn transport_error(err: reqwest::Error, url: &str) -> InventoryError {
    if err.is_timeout() {
        InventoryError::Unavailable(format!("timed out calling {}", url))
    } else if err.is_connect() {
        InventoryError::Unavailable(format!("connection refused: {}", url))
    } else {
        InventoryError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn get_flight(
        &self,
        flight_code: &str,
        credential: &ForwardableCredential,
    ) -> Result<FlightInfo, InventoryError> {
        let data = self
            .execute(
                "query FlightByCode($flightCode: String!) { \
                   flightByCode(flightCode: $flightCode) { \
                     id flightCode price availableSeats status } }",
                json!({ "flightCode": flight_code }),
                credential,
            )
            .await?;

        let flight = data.get("flightByCode").cloned().unwrap_or_default();
        if flight.is_null() {
            return Err(InventoryError::NotFound(flight_code.to_string()));
        }

        let dto: FlightDto = serde_json::from_value(flight)
            .map_err(|e| InventoryError::Rejected(format!("malformed flight payload: {}", e)))?;

        Ok(FlightInfo {
            id: parse_id(&dto.id),
            flight_code: dto.flight_code,
            price: dto.price,
            available_seats: dto.available_seats,
            status: dto.status,
        })
    }

    async fn reserve_seats(
        &self,
        flight_code: &str,
        seats: i32,
        credential: &ForwardableCredential,
    ) -> Result<i32, InventoryError> {
        let data = self
            .execute(
                "mutation ReserveSeats($flightCode: String!, $seats: Int!) { \
                   decreaseAvailableSeats(flightCode: $flightCode, seats: $seats) { \
                     id availableSeats } }",
                json!({ "flightCode": flight_code, "seats": seats }),
                credential,
            )
            .await?;

        let updated = data.get("decreaseAvailableSeats").cloned().unwrap_or_default();
        if updated.is_null() {
            return Err(InventoryError::NotFound(flight_code.to_string()));
        }

        let dto: SeatCountDto = serde_json::from_value(updated)
            .map_err(|e| InventoryError::Rejected(format!("malformed seat payload: {}", e)))?;
        Ok(dto.available_seats)
    }

    async fn release_seats(
        &self,
        flight_code: &str,
        seats: i32,
        credential: &ForwardableCredential,
    ) -> Result<i32, InventoryError> {
        let data = self
            .execute(
                "mutation ReleaseSeats($flightCode: String!, $seats: Int!) { \
                   increaseAvailableSeats(flightCode: $flightCode, seats: $seats) { \
                     id availableSeats } }",
                json!({ "flightCode": flight_code, "seats": seats }),
                credential,
            )
            .await?;

        let updated = data.get("increaseAvailableSeats").cloned().unwrap_or_default();
        if updated.is_null() {
            return Err(InventoryError::NotFound(flight_code.to_string()));
        }

        let dto: SeatCountDto = serde_json::from_value(updated)
            .map_err(|e| InventoryError::Rejected(format!("malformed seat payload: {}", e)))?;
        Ok(dto.available_seats)
    }
}
