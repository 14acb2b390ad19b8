use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Booked,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Booked => "BOOKED",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse one of our own status spellings, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(BookingStatus::Pending),
            "BOOKED" => Some(BookingStatus::Booked),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Map a partner system's free-form status into our closed set.
    /// Partners report "PAID" for a settled booking; we fold that into
    /// CONFIRMED. Unknown spellings return None and the caller decides.
    pub fn from_partner(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PAID" => Some(BookingStatus::Confirmed),
            other => BookingStatus::parse(other),
        }
    }
}

/// Payment settlement status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "UNPAID" => Some(PaymentStatus::Unpaid),
            "PAID" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// Where a booking originated. Derived, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingSource {
    User,
    TravelApp,
}

/// A seat reservation against a remote flight schedule, or a mirrored
/// record of a booking created in a partner system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub owner_user_id: i64,
    pub flight_code: String,
    pub flight_id: Option<i64>,
    pub passenger_name: String,
    pub seat_number: Option<String>,
    pub number_of_seats: i32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub external_booking_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Bookings materialized from a partner system carry the partner's id.
    pub fn is_partner_import(&self) -> bool {
        self.external_booking_id.is_some()
    }

    pub fn source(&self) -> BookingSource {
        if self.is_partner_import() {
            BookingSource::TravelApp
        } else {
            BookingSource::User
        }
    }

    /// Overwrite status and touch updated_at
    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn mark_paid(&mut self, payment_id: String) {
        self.payment_status = PaymentStatus::Paid;
        self.payment_id = Some(payment_id);
        self.status = BookingStatus::Confirmed;
        self.updated_at = Utc::now();
    }
}

/// Fields of a booking before the store has assigned an id.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub owner_user_id: i64,
    pub flight_code: String,
    pub flight_id: Option<i64>,
    pub passenger_name: String,
    pub seat_number: Option<String>,
    pub number_of_seats: i32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub external_booking_id: Option<String>,
}
