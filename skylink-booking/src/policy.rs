use skylink_core::CallerContext;
use skylink_shared::Booking;

/// Pure access decisions for viewing and mutating a booking.
pub struct AccessPolicy {
    import_owner_id: i64,
}

impl AccessPolicy {
    pub fn new(import_owner_id: i64) -> Self {
        Self { import_owner_id }
    }

    /// A caller may touch a booking when any of these holds:
    /// - the caller has the admin role
    /// - the booking belongs to the caller
    /// - the booking is owned by the sentinel import user
    /// - the booking was imported from a partner system; imported bookings
    ///   are readable and writable by any authenticated caller so that
    ///   integrated systems can reconcile them
    pub fn can_access(&self, booking: &Booking, caller: &CallerContext) -> bool {
        if caller.is_admin() {
            return true;
        }
        if caller.user_id == Some(booking.owner_user_id) {
            return true;
        }
        if booking.owner_user_id == self.import_owner_id {
            return true;
        }
        booking.is_partner_import()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skylink_core::ForwardableCredential;
    use skylink_shared::{BookingStatus, PaymentStatus};
    use uuid::Uuid;

    fn booking(owner: i64, external_id: Option<&str>) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            owner_user_id: owner,
            flight_code: "FL100".to_string(),
            flight_id: None,
            passenger_name: "Alice".to_string(),
            seat_number: None,
            number_of_seats: 1,
            total_price: 0.0,
            status: BookingStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            payment_id: None,
            external_booking_id: external_id.map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    fn user(id: i64, role: &str) -> CallerContext {
        CallerContext::user(id, role, ForwardableCredential::default())
    }

    #[test]
    fn test_owner_can_access() {
        let policy = AccessPolicy::new(0);
        assert!(policy.can_access(&booking(7, None), &user(7, "CUSTOMER")));
    }

    #[test]
    fn test_stranger_cannot_access_user_booking() {
        let policy = AccessPolicy::new(0);
        assert!(!policy.can_access(&booking(7, None), &user(8, "CUSTOMER")));
    }

    #[test]
    fn test_admin_can_access_everything() {
        let policy = AccessPolicy::new(0);
        assert!(policy.can_access(&booking(7, None), &user(8, "ADMIN")));
    }

    #[test]
    fn test_imported_booking_is_open_to_any_caller() {
        let policy = AccessPolicy::new(0);
        assert!(policy.can_access(&booking(7, Some("EXT-1")), &user(8, "CUSTOMER")));
    }

    #[test]
    fn test_sentinel_owned_booking_is_open() {
        let policy = AccessPolicy::new(0);
        assert!(policy.can_access(&booking(0, None), &user(8, "CUSTOMER")));
    }
}
