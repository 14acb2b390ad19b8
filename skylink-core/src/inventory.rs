use async_trait::async_trait;
use skylink_shared::FlightInfo;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::identity::ForwardableCredential;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("flight not found: {0}")]
    NotFound(String),

    /// The authority reached us but refused the operation (inactive flight,
    /// not enough seats left, validation failure). Message preserved.
    #[error("schedule authority rejected the request: {0}")]
    Rejected(String),

    /// The authority could not be reached or timed out.
    #[error("schedule authority unavailable: {0}")]
    Unavailable(String),
}

/// Client for the remote schedule authority that owns seat-capacity truth.
///
/// `reserve_seats` must be called at most once per logical booking attempt:
/// a failure is terminal for that attempt and the caller compensates, it is
/// never retried silently.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Look up a flight by its public code.
    async fn get_flight(
        &self,
        flight_code: &str,
        credential: &ForwardableCredential,
    ) -> Result<FlightInfo, InventoryError>;

    /// Decrement available seats at the authority. Returns the updated
    /// available-seat count.
    async fn reserve_seats(
        &self,
        flight_code: &str,
        seats: i32,
        credential: &ForwardableCredential,
    ) -> Result<i32, InventoryError>;

    /// Return seats to the pool, capped at the flight's total capacity at
    /// the authority. Returns the updated available-seat count.
    async fn release_seats(
        &self,
        flight_code: &str,
        seats: i32,
        credential: &ForwardableCredential,
    ) -> Result<i32, InventoryError>;
}

struct MockFlight {
    info: FlightInfo,
    total_seats: i32,
}

#[derive(Default)]
struct MockInventoryState {
    flights: HashMap<String, MockFlight>,
    reserve_failure: Option<InventoryError>,
}

/// In-memory schedule authority for tests and local development.
pub struct MockInventoryClient {
    state: Mutex<MockInventoryState>,
}

impl MockInventoryClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockInventoryState::default()),
        }
    }

    pub fn with_flight(self, id: i64, flight_code: &str, price: f64, seats: i32, status: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.flights.insert(
                flight_code.to_string(),
                MockFlight {
                    info: FlightInfo {
                        id,
                        flight_code: flight_code.to_string(),
                        price,
                        available_seats: seats,
                        status: status.to_string(),
                    },
                    total_seats: seats,
                },
            );
        }
        self
    }

    /// Force the next reserve_seats call to fail with the given error.
    pub fn fail_reserves_with(&self, err: InventoryError) {
        self.state.lock().unwrap().reserve_failure = Some(err);
    }

    pub fn available_seats(&self, flight_code: &str) -> Option<i32> {
        self.state
            .lock()
            .unwrap()
            .flights
            .get(flight_code)
            .map(|f| f.info.available_seats)
    }
}

impl Default for MockInventoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryClient for MockInventoryClient {
    async fn get_flight(
        &self,
        flight_code: &str,
        _credential: &ForwardableCredential,
    ) -> Result<FlightInfo, InventoryError> {
        let state = self.state.lock().unwrap();
        state
            .flights
            .get(flight_code)
            .map(|f| f.info.clone())
            .ok_or_else(|| InventoryError::NotFound(flight_code.to_string()))
    }

    async fn reserve_seats(
        &self,
        flight_code: &str,
        seats: i32,
        _credential: &ForwardableCredential,
    ) -> Result<i32, InventoryError> {
        let mut state = self.state.lock().unwrap();

        if let Some(err) = state.reserve_failure.take() {
            return Err(err);
        }

        let flight = state
            .flights
            .get_mut(flight_code)
            .ok_or_else(|| InventoryError::NotFound(flight_code.to_string()))?;

        if flight.info.available_seats < seats {
            return Err(InventoryError::Rejected(format!(
                "not enough seats on {}: requested {}, available {}",
                flight_code, seats, flight.info.available_seats
            )));
        }

        flight.info.available_seats -= seats;
        tracing::debug!(
            "Reserved {} seats on {} (mock authority), {} left",
            seats,
            flight_code,
            flight.info.available_seats
        );
        Ok(flight.info.available_seats)
    }

    async fn release_seats(
        &self,
        flight_code: &str,
        seats: i32,
        _credential: &ForwardableCredential,
    ) -> Result<i32, InventoryError> {
        let mut state = self.state.lock().unwrap();

        let flight = state
            .flights
            .get_mut(flight_code)
            .ok_or_else(|| InventoryError::NotFound(flight_code.to_string()))?;

        flight.info.available_seats =
            (flight.info.available_seats + seats).min(flight.total_seats);
        Ok(flight.info.available_seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> ForwardableCredential {
        ForwardableCredential::default()
    }

    #[tokio::test]
    async fn test_reserve_and_release_lifecycle() {
        let client = MockInventoryClient::new().with_flight(1, "FL100", 100.0, 10, "ACTIVE");

        let remaining = client.reserve_seats("FL100", 3, &credential()).await.unwrap();
        assert_eq!(remaining, 7);

        // Release is capped at total capacity
        let restored = client.release_seats("FL100", 50, &credential()).await.unwrap();
        assert_eq!(restored, 10);
    }

    #[tokio::test]
    async fn test_reserve_rejects_overbooking() {
        let client = MockInventoryClient::new().with_flight(1, "FL100", 100.0, 2, "ACTIVE");

        let err = client.reserve_seats("FL100", 3, &credential()).await.unwrap_err();
        assert!(matches!(err, InventoryError::Rejected(_)));

        // Nothing was decremented
        assert_eq!(client.available_seats("FL100"), Some(2));
    }

    #[tokio::test]
    async fn test_unknown_flight() {
        let client = MockInventoryClient::new();
        let err = client.get_flight("FL999", &credential()).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));
    }
}
