use serde::{Deserialize, Serialize};

/// A booking as reported by an external partner system, normalized to one
/// shape. Partner schemas are heterogeneous (some sell hotels as well as
/// flights), so everything beyond the id is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerBooking {
    pub id: String,
    pub user_id: Option<String>,
    pub kind: Option<String>,
    pub hotel_name: Option<String>,
    pub flight_code: Option<String>,
    pub passenger_name: Option<String>,
    pub status: Option<String>,
}

impl PartnerBooking {
    /// Partner records without an explicit type default to FLIGHT.
    pub fn is_flight(&self) -> bool {
        self.kind
            .as_deref()
            .map(|k| k.trim().to_uppercase() == "FLIGHT")
            .unwrap_or(true)
    }

    /// Partners report "PAID" once the traveler has settled.
    pub fn is_paid(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.trim().to_uppercase() == "PAID")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PartnerBooking {
        PartnerBooking {
            id: "42".to_string(),
            user_id: Some("u-1".to_string()),
            kind: None,
            hotel_name: None,
            flight_code: Some("FL100".to_string()),
            passenger_name: Some("Alice".to_string()),
            status: Some("BOOKED".to_string()),
        }
    }

    #[test]
    fn test_kind_defaults_to_flight() {
        let mut ext = sample();
        assert!(ext.is_flight());

        ext.kind = Some("HOTEL".to_string());
        assert!(!ext.is_flight());

        ext.kind = Some("flight".to_string());
        assert!(ext.is_flight());
    }

    #[test]
    fn test_paid_detection() {
        let mut ext = sample();
        assert!(!ext.is_paid());

        ext.status = Some("paid".to_string());
        assert!(ext.is_paid());

        ext.status = None;
        assert!(!ext.is_paid());
    }
}
