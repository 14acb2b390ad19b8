use serde::{Deserialize, Serialize};

/// Snapshot of a flight as reported by the remote schedule authority.
/// The snapshot may be stale by the time a reservation is issued; the
/// authority's own seat accounting is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightInfo {
    pub id: i64,
    pub flight_code: String,
    pub price: f64,
    pub available_seats: i32,
    pub status: String,
}

impl FlightInfo {
    /// The authority marks sellable flights "ACTIVE".
    pub fn is_active(&self) -> bool {
        self.status == "ACTIVE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_flag() {
        let mut flight = FlightInfo {
            id: 1,
            flight_code: "FL100".to_string(),
            price: 100.0,
            available_seats: 2,
            status: "ACTIVE".to_string(),
        };
        assert!(flight.is_active());

        flight.status = "CANCELLED".to_string();
        assert!(!flight.is_active());
    }
}
