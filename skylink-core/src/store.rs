use async_trait::async_trait;
use chrono::Utc;
use skylink_shared::{Booking, NewBooking};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("booking record not found")]
    NotFound,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Keyed record storage for bookings.
///
/// Single-record atomicity only: each call is its own write, there is no
/// multi-record transaction across calls.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persist a new booking; the store assigns the id and timestamps.
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Lookup by the partner-sync idempotency key.
    async fn get_by_external_id(&self, external_id: &str) -> Result<Option<Booking>, StoreError>;

    async fn list_by_owner(&self, owner_user_id: i64) -> Result<Vec<Booking>, StoreError>;

    /// All bookings, newest first.
    async fn list_all(&self) -> Result<Vec<Booking>, StoreError>;

    /// Bookings materialized from partner systems, newest first.
    async fn list_imported(&self) -> Result<Vec<Booking>, StoreError>;

    /// Overwrite an existing booking keyed by its id.
    async fn update(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory booking store for tests and local development.
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let mut bookings = self.bookings.lock().unwrap();

        // The store owns the uniqueness of the partner idempotency key
        if let Some(external_id) = new.external_booking_id.as_deref() {
            if bookings
                .values()
                .any(|b| b.external_booking_id.as_deref() == Some(external_id))
            {
                return Err(StoreError::Backend(format!(
                    "duplicate external booking id: {}",
                    external_id
                )));
            }
        }
        if let Some(payment_id) = new.payment_id.as_deref() {
            if bookings
                .values()
                .any(|b| b.payment_id.as_deref() == Some(payment_id))
            {
                return Err(StoreError::Backend(format!(
                    "duplicate payment id: {}",
                    payment_id
                )));
            }
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            owner_user_id: new.owner_user_id,
            flight_code: new.flight_code,
            flight_id: new.flight_id,
            passenger_name: new.passenger_name,
            seat_number: new.seat_number,
            number_of_seats: new.number_of_seats,
            total_price: new.total_price,
            status: new.status,
            payment_status: new.payment_status,
            payment_id: new.payment_id,
            external_booking_id: new.external_booking_id,
            created_at: now,
            updated_at: now,
        };
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_external_id(&self, external_id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .values()
            .find(|b| b.external_booking_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn list_by_owner(&self, owner_user_id: i64) -> Result<Vec<Booking>, StoreError> {
        let mut result: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.owner_user_id == owner_user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        let mut result: Vec<Booking> = self.bookings.lock().unwrap().values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_imported(&self) -> Result<Vec<Booking>, StoreError> {
        let mut result: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.external_booking_id.is_some())
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.get_mut(&booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        match self.bookings.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylink_shared::{BookingStatus, PaymentStatus};

    fn new_booking(owner: i64, external_id: Option<&str>) -> NewBooking {
        NewBooking {
            owner_user_id: owner,
            flight_code: "FL100".to_string(),
            flight_id: Some(1),
            passenger_name: "Alice".to_string(),
            seat_number: None,
            number_of_seats: 1,
            total_price: 100.0,
            status: BookingStatus::Booked,
            payment_status: PaymentStatus::Unpaid,
            payment_id: None,
            external_booking_id: external_id.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let store = InMemoryBookingStore::new();

        let mut booking = store.create(new_booking(7, None)).await.unwrap();
        assert_eq!(store.get(booking.id).await.unwrap().unwrap().owner_user_id, 7);

        booking.set_status(BookingStatus::Cancelled);
        store.update(&booking).await.unwrap();
        assert_eq!(
            store.get(booking.id).await.unwrap().unwrap().status,
            BookingStatus::Cancelled
        );

        store.delete(booking.id).await.unwrap();
        assert!(store.get(booking.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(booking.id).await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_external_id_is_unique() {
        let store = InMemoryBookingStore::new();

        store.create(new_booking(7, Some("EXT-1"))).await.unwrap();
        let err = store.create(new_booking(8, Some("EXT-1"))).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        let found = store.get_by_external_id("EXT-1").await.unwrap().unwrap();
        assert_eq!(found.owner_user_id, 7);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let store = InMemoryBookingStore::new();
        store.create(new_booking(1, None)).await.unwrap();
        store.create(new_booking(2, Some("EXT-9"))).await.unwrap();
        store.create(new_booking(1, None)).await.unwrap();

        assert_eq!(store.list_by_owner(1).await.unwrap().len(), 2);
        assert_eq!(store.list_all().await.unwrap().len(), 3);
        assert_eq!(store.list_imported().await.unwrap().len(), 1);
    }
}
