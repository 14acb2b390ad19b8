use async_trait::async_trait;
use skylink_shared::PartnerBooking;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::identity::ForwardableCredential;

#[derive(Debug, thiserror::Error)]
pub enum PartnerError {
    #[error("partner booking not found: {0}")]
    NotFound(String),

    /// The partner system answered with a domain-level error. Message preserved.
    #[error("partner system rejected the request: {0}")]
    Rejected(String),

    /// Connection refused, timeout, or any other transport failure.
    #[error("partner system unavailable: {0}")]
    Unavailable(String),
}

/// Client for an external booking system. Partner schemas differ; every
/// implementation normalizes to [`PartnerBooking`].
#[async_trait]
pub trait PartnerClient: Send + Sync {
    async fn fetch_booking(
        &self,
        external_id: &str,
        credential: &ForwardableCredential,
    ) -> Result<PartnerBooking, PartnerError>;
}

#[derive(Default)]
struct MockPartnerState {
    bookings: HashMap<String, PartnerBooking>,
    failure: Option<PartnerError>,
}

/// In-memory partner system for tests and local development.
pub struct MockPartnerClient {
    state: Mutex<MockPartnerState>,
}

impl MockPartnerClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockPartnerState::default()),
        }
    }

    pub fn with_booking(self, booking: PartnerBooking) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.bookings.insert(booking.id.clone(), booking);
        }
        self
    }

    /// Force the next fetch to fail with the given error.
    pub fn fail_with(&self, err: PartnerError) {
        self.state.lock().unwrap().failure = Some(err);
    }

    /// Replace a stored booking's status, as if the partner mutated it.
    pub fn set_status(&self, external_id: &str, status: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(booking) = state.bookings.get_mut(external_id) {
            booking.status = Some(status.to_string());
        }
    }
}

impl Default for MockPartnerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PartnerClient for MockPartnerClient {
    async fn fetch_booking(
        &self,
        external_id: &str,
        _credential: &ForwardableCredential,
    ) -> Result<PartnerBooking, PartnerError> {
        let mut state = self.state.lock().unwrap();

        if let Some(err) = state.failure.take() {
            return Err(err);
        }

        state
            .bookings
            .get(external_id)
            .cloned()
            .ok_or_else(|| PartnerError::NotFound(external_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_and_miss() {
        let client = MockPartnerClient::new().with_booking(PartnerBooking {
            id: "77".to_string(),
            user_id: None,
            kind: Some("FLIGHT".to_string()),
            hotel_name: None,
            flight_code: Some("FL200".to_string()),
            passenger_name: Some("Budi".to_string()),
            status: Some("BOOKED".to_string()),
        });

        let credential = ForwardableCredential::default();
        let found = client.fetch_booking("77", &credential).await.unwrap();
        assert_eq!(found.flight_code.as_deref(), Some("FL200"));

        let err = client.fetch_booking("78", &credential).await.unwrap_err();
        assert!(matches!(err, PartnerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_forced_failure_is_one_shot() {
        let client = MockPartnerClient::new().with_booking(PartnerBooking {
            id: "1".to_string(),
            user_id: None,
            kind: None,
            hotel_name: None,
            flight_code: None,
            passenger_name: None,
            status: None,
        });
        client.fail_with(PartnerError::Unavailable("connection refused".into()));

        let credential = ForwardableCredential::default();
        assert!(client.fetch_booking("1", &credential).await.is_err());
        assert!(client.fetch_booking("1", &credential).await.is_ok());
    }
}
