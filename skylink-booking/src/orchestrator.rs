use chrono::Utc;
use serde::Deserialize;
use skylink_core::payment::{generate_payment_id, normalize_payment_id};
use skylink_core::{BookingStore, CallerContext, InventoryClient, PartnerClient};
use skylink_shared::{Booking, BookingStatus, NewBooking, PartnerBooking, PaymentStatus};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::BookingConfig;
use crate::error::BookingError;
use crate::policy::AccessPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_code: String,
    pub passenger_name: String,
    pub number_of_seats: i32,
    pub seat_number: Option<String>,
    pub payment_id: Option<String>,
}

/// Coordinates the distributed write at the heart of the system: a booking
/// row in the local store plus a seat reservation at the remote schedule
/// authority, with no shared transaction between the two.
///
/// Ordering is local-first: the booking row is committed, then the remote
/// reservation is issued. When the reservation fails the row is deleted
/// again, so no booking survives without its seats. A crash between the
/// local commit and the remote call still leaves an orphan row behind;
/// closing that window would take a durable intent log.
pub struct BookingOrchestrator {
    store: Arc<dyn BookingStore>,
    inventory: Arc<dyn InventoryClient>,
    mirror_partner: Arc<dyn PartnerClient>,
    travel_partner: Arc<dyn PartnerClient>,
    config: BookingConfig,
    policy: AccessPolicy,
}

impl BookingOrchestrator {
    pub fn new(
        store: Arc<dyn BookingStore>,
        inventory: Arc<dyn InventoryClient>,
        mirror_partner: Arc<dyn PartnerClient>,
        travel_partner: Arc<dyn PartnerClient>,
        config: BookingConfig,
    ) -> Self {
        let policy = AccessPolicy::new(config.import_owner_id);
        Self {
            store,
            inventory,
            mirror_partner,
            travel_partner,
            config,
            policy,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Create a booking and reserve its seats at the schedule authority.
    pub async fn create_booking(
        &self,
        req: CreateBookingRequest,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        self.ensure_authenticated(caller)?;
        let owner = self.caller_user_id(caller)?;

        if req.number_of_seats < 1 {
            return Err(BookingError::InvalidState(
                "a booking needs at least one seat".to_string(),
            ));
        }

        let flight = self
            .inventory
            .get_flight(&req.flight_code, &caller.credential)
            .await?;

        if !flight.is_active() {
            return Err(BookingError::InvalidState(format!(
                "flight {} is not active",
                flight.flight_code
            )));
        }
        if flight.available_seats < req.number_of_seats {
            return Err(BookingError::InvalidState(format!(
                "not enough seats on {}: requested {}, available {}",
                flight.flight_code, req.number_of_seats, flight.available_seats
            )));
        }

        // Price is snapshotted here and never recomputed
        let total_price = flight.price * f64::from(req.number_of_seats);
        let payment_id = normalize_payment_id(req.payment_id.as_deref());
        let paid = payment_id.is_some();

        let mut booking = self
            .store
            .create(NewBooking {
                owner_user_id: owner,
                flight_code: req.flight_code.clone(),
                flight_id: Some(flight.id),
                passenger_name: req.passenger_name,
                seat_number: req.seat_number,
                number_of_seats: req.number_of_seats,
                total_price,
                status: BookingStatus::Booked,
                payment_status: if paid {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Unpaid
                },
                payment_id,
                external_booking_id: None,
            })
            .await?;

        // Pre-paid bookings are confirmed locally before the remote call
        if paid {
            booking.set_status(BookingStatus::Confirmed);
            self.store.update(&booking).await?;
        }

        if let Err(err) = self
            .inventory
            .reserve_seats(&req.flight_code, req.number_of_seats, &caller.credential)
            .await
        {
            self.compensate_create(&booking).await;
            return Err(err.into());
        }

        info!(booking_id = %booking.id, flight_code = %booking.flight_code, "booking created");
        Ok(booking)
    }

    /// Overwrite a booking's status. Any status may replace any other; the
    /// caller is trusted to know what it is doing.
    pub async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        self.ensure_authenticated(caller)?;
        let mut booking = self.load_accessible(id, caller).await?;

        booking.set_status(status);
        self.store.update(&booking).await?;
        Ok(booking)
    }

    /// Mark a booking paid. Partner-imported and sentinel-owned bookings
    /// get a synthesized payment id when none exists; user bookings must
    /// supply one.
    pub async fn confirm_payment(
        &self,
        booking_id: Uuid,
        payment_id: Option<&str>,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        self.ensure_authenticated(caller)?;
        let mut booking = self.load_accessible(booking_id, caller).await?;

        let final_payment_id = normalize_payment_id(payment_id)
            .or_else(|| normalize_payment_id(booking.payment_id.as_deref()));

        let final_payment_id = match final_payment_id {
            Some(id) => id,
            None => {
                if booking.is_partner_import()
                    || booking.owner_user_id == self.config.import_owner_id
                {
                    generate_payment_id()
                } else {
                    return Err(BookingError::PaymentIdRequired);
                }
            }
        };

        booking.mark_paid(final_payment_id);
        self.store.update(&booking).await?;
        Ok(booking)
    }

    /// Mirror a booking created in another booking system into the local
    /// store. Record-only: no seats are reserved for mirrored bookings.
    /// Idempotent under the partner's id - a second sync only refreshes
    /// the status.
    pub async fn sync_external_booking(
        &self,
        external_booking_id: &str,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        self.ensure_authenticated(caller)?;
        let owner = self.caller_user_id(caller)?;

        let ext = self
            .mirror_partner
            .fetch_booking(external_booking_id, &caller.credential)
            .await?;

        if let Some(mut booking) = self.store.get_by_external_id(&ext.id).await? {
            if let Some(status) = self.partner_status(&ext) {
                booking.set_status(status);
            }
            self.store.update(&booking).await?;
            return Ok(booking);
        }

        let flight_code = ext
            .flight_code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "EXTERNAL".to_string());

        let booking = self
            .store
            .create(NewBooking {
                owner_user_id: owner,
                flight_code,
                flight_id: None,
                passenger_name: ext
                    .passenger_name
                    .clone()
                    .unwrap_or_else(|| "Traveler".to_string()),
                seat_number: None,
                number_of_seats: 1,
                total_price: 0.0,
                status: self.partner_status(&ext).unwrap_or(BookingStatus::Pending),
                payment_status: PaymentStatus::Unpaid,
                payment_id: None,
                external_booking_id: Some(ext.id.clone()),
            })
            .await?;

        info!(booking_id = %booking.id, external_id = %ext.id, "partner booking mirrored");
        Ok(booking)
    }

    /// Import a flight booking created in the travel app. Unlike the
    /// mirror flow this holds real inventory: a fresh import reserves
    /// exactly one seat, with the same compensation as create_booking.
    /// Idempotent under the partner's id - re-syncs reconcile status and
    /// payment fields without touching inventory again.
    pub async fn sync_travel_booking(
        &self,
        booking_id: &str,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        self.require_partner(caller)?;

        let ext = self
            .travel_partner
            .fetch_booking(booking_id, &caller.credential)
            .await?;

        if !ext.is_flight() {
            return Err(BookingError::InvalidState(
                "only flight bookings can be imported".to_string(),
            ));
        }
        let flight_code = ext
            .flight_code
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                BookingError::InvalidState("partner booking has no flight code".to_string())
            })?;

        if let Some(mut booking) = self.store.get_by_external_id(&ext.id).await? {
            if ext.is_paid() {
                booking.status = BookingStatus::Confirmed;
                booking.payment_status = PaymentStatus::Paid;
                booking.updated_at = Utc::now();
            } else if let Some(status) = self.partner_status(&ext) {
                booking.set_status(status);
            }
            if normalize_payment_id(booking.payment_id.as_deref()).is_none() {
                booking.payment_id = Some(generate_payment_id());
            }
            self.store.update(&booking).await?;
            return Ok(booking);
        }

        let flight = self
            .inventory
            .get_flight(&flight_code, &caller.credential)
            .await?;
        if !flight.is_active() {
            return Err(BookingError::InvalidState(format!(
                "flight {} is not active",
                flight_code
            )));
        }
        if flight.available_seats < 1 {
            return Err(BookingError::InvalidState(format!(
                "no seats left on {}",
                flight_code
            )));
        }

        let seats = 1;
        let total_price = flight.price * f64::from(seats);
        let paid = ext.is_paid();

        let booking = self
            .store
            .create(NewBooking {
                owner_user_id: self.config.import_owner_id,
                flight_code: flight_code.clone(),
                flight_id: Some(flight.id),
                passenger_name: ext
                    .passenger_name
                    .clone()
                    .unwrap_or_else(|| "Traveler".to_string()),
                seat_number: None,
                number_of_seats: seats,
                total_price,
                status: if paid {
                    BookingStatus::Confirmed
                } else {
                    self.partner_status(&ext).unwrap_or(BookingStatus::Booked)
                },
                payment_status: if paid {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Unpaid
                },
                payment_id: Some(generate_payment_id()),
                external_booking_id: Some(ext.id.clone()),
            })
            .await?;

        if let Err(err) = self
            .inventory
            .reserve_seats(&flight_code, seats, &caller.credential)
            .await
        {
            self.compensate_create(&booking).await;
            return Err(err.into());
        }

        info!(booking_id = %booking.id, external_id = %ext.id, "travel booking imported");
        Ok(booking)
    }

    /// The caller's own bookings, newest first.
    pub async fn my_bookings(&self, caller: &CallerContext) -> Result<Vec<Booking>, BookingError> {
        self.ensure_authenticated(caller)?;
        let owner = self.caller_user_id(caller)?;
        Ok(self.store.list_by_owner(owner).await?)
    }

    /// Every booking, newest first.
    pub async fn all_bookings(&self, caller: &CallerContext) -> Result<Vec<Booking>, BookingError> {
        self.ensure_authenticated(caller)?;
        Ok(self.store.list_all().await?)
    }

    pub async fn booking_by_id(
        &self,
        id: Uuid,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        self.ensure_authenticated(caller)?;
        self.load_accessible(id, caller).await
    }

    /// Fetch a partner booking without materializing it locally.
    pub async fn external_booking_info(
        &self,
        external_booking_id: &str,
        caller: &CallerContext,
    ) -> Result<PartnerBooking, BookingError> {
        self.ensure_authenticated(caller)?;
        Ok(self
            .mirror_partner
            .fetch_booking(external_booking_id, &caller.credential)
            .await?)
    }

    /// Imported bookings, for partner-side reconciliation.
    pub async fn partner_imported_bookings(
        &self,
        caller: &CallerContext,
    ) -> Result<Vec<Booking>, BookingError> {
        self.require_partner(caller)?;
        Ok(self.store.list_imported().await?)
    }

    pub async fn partner_booking_by_external_id(
        &self,
        external_booking_id: &str,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        self.require_partner(caller)?;
        self.store
            .get_by_external_id(external_booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("booking not found".to_string()))
    }

    fn ensure_authenticated(&self, caller: &CallerContext) -> Result<(), BookingError> {
        if caller.is_authenticated {
            Ok(())
        } else {
            Err(BookingError::Unauthorized(
                "authentication required".to_string(),
            ))
        }
    }

    fn caller_user_id(&self, caller: &CallerContext) -> Result<i64, BookingError> {
        caller
            .user_id
            .ok_or_else(|| BookingError::Unauthorized("caller has no user id".to_string()))
    }

    fn require_partner(&self, caller: &CallerContext) -> Result<(), BookingError> {
        match caller.credential.api_key.as_deref() {
            Some(key) if key == self.config.partner_api_key.expose() => Ok(()),
            _ => Err(BookingError::Unauthorized(
                "partner credential required".to_string(),
            )),
        }
    }

    /// Inaccessible bookings read as absent so that existence is not leaked.
    async fn load_accessible(
        &self,
        id: Uuid,
        caller: &CallerContext,
    ) -> Result<Booking, BookingError> {
        let booking = self.store.get(id).await?;
        match booking {
            Some(b) if self.policy.can_access(&b, caller) => Ok(b),
            _ => Err(BookingError::NotFound("booking not found".to_string())),
        }
    }

    fn partner_status(&self, ext: &PartnerBooking) -> Option<BookingStatus> {
        let raw = ext.status.as_deref()?;
        match BookingStatus::from_partner(raw) {
            Some(status) => Some(status),
            None => {
                warn!(external_id = %ext.id, status = raw, "unrecognized partner status");
                None
            }
        }
    }

    /// Undo the local half of a failed distributed write. Best-effort: a
    /// failed delete leaves an orphan row behind and is only logged.
    async fn compensate_create(&self, booking: &Booking) {
        if let Err(delete_err) = self.store.delete(booking.id).await {
            warn!(
                booking_id = %booking.id,
                error = %delete_err,
                "compensating delete failed, orphan booking left behind"
            );
        } else {
            warn!(
                booking_id = %booking.id,
                flight_code = %booking.flight_code,
                "seat reservation failed, booking rolled back"
            );
        }
    }
}
