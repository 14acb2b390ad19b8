use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use skylink_core::{ForwardableCredential, PartnerClient, PartnerError};
use skylink_shared::PartnerBooking;
use std::time::Duration;

/// GraphQL-over-HTTP client for an external booking system. Both partner
/// systems expose the same bookingById shape, so one client covers them;
/// each instance points at one base URL.
pub struct HttpPartnerClient {
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
struct PartnerBookingDto {
    id: serde_json::Value,
    user_id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    hotel_name: Option<String>,
    flight_code: Option<String>,
    passenger_name: Option<String>,
    status: Option<String>,
}

fn id_to_string(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

impl HttpPartnerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }
}

fn transport_error(err: reqwest::Error, url: &str) -> PartnerError {
    if err.is_timeout() {
        PartnerError::Unavailable(format!("timed out calling {}", url))
    } else if err.is_connect() {
        PartnerError::Unavailable(format!("connection refused: {}", url))
    } else {
        PartnerError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl PartnerClient for HttpPartnerClient {
    async fn fetch_booking(
        &self,
        external_id: &str,
        credential: &ForwardableCredential,
    ) -> Result<PartnerBooking, PartnerError> {
        let mut request = self.http.post(&self.base_url).json(&json!({
            "query": "query BookingById($id: ID!) { \
                        bookingById(id: $id) { \
                          id userId type hotelName flightCode passengerName status } }",
            "variables": { "id": external_id },
        }));

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
                return Err(PartnerError::NotFound(message));
            }
            return Err(PartnerError::Rejected(message));
        }

        let booking = body
            .data
            .and_then(|d| d.get("bookingById").cloned())
            .unwrap_or_default();
        if booking.is_null() {
            return Err(PartnerError::NotFound(external_id.to_string()));
        }

        let dto: PartnerBookingDto = serde_json::from_value(booking)
            .map_err(|e| PartnerError::Rejected(format!("malformed booking payload: {}", e)))?;

        Ok(PartnerBooking {
            id: id_to_string(&dto.id),
            user_id: dto.user_id,
            kind: dto.kind,
            hotel_name: dto.hotel_name,
            flight_code: dto.flight_code,
            passenger_name: dto.passenger_name,
            status: dto.status,
        })
    }
}
