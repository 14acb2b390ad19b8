use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skylink_core::{BookingStore, StoreError};
use skylink_shared::{Booking, BookingStatus, NewBooking, PaymentStatus};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Row shape for type-safe querying; status columns stay TEXT in the
// database and are parsed into the closed enums on the way out.
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    owner_user_id: i64,
    flight_code: String,
    flight_id: Option<i64>,
    passenger_name: String,
    seat_number: Option<String>,
    number_of_seats: i32,
    total_price: f64,
    status: String,
    payment_status: String,
    payment_id: Option<String>,
    external_booking_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, StoreError> {
        let status = BookingStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Backend(format!("unknown status in row: {}", row.status)))?;
        let payment_status = PaymentStatus::parse(&row.payment_status).ok_or_else(|| {
            StoreError::Backend(format!(
                "unknown payment status in row: {}",
                row.payment_status
            ))
        })?;

        Ok(Booking {
            id: row.id,
            owner_user_id: row.owner_user_id,
            flight_code: row.flight_code,
            flight_id: row.flight_id,
            passenger_name: row.passenger_name,
            seat_number: row.seat_number,
            number_of_seats: row.number_of_seats,
            total_price: row.total_price,
            status,
            payment_status,
            payment_id: row.payment_id,
            external_booking_id: row.external_booking_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, owner_user_id, flight_code, flight_id, passenger_name, \
     seat_number, number_of_seats, total_price, status, payment_status, payment_id, \
     external_booking_id, created_at, updated_at";

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create(&self, new: NewBooking) -> Result<Booking, StoreError> {
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

        sqlx::query(
            "INSERT INTO bookings (id, owner_user_id, flight_code, flight_id, passenger_name, \
             seat_number, number_of_seats, total_price, status, payment_status, payment_id, \
             external_booking_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(booking.id)
        .bind(booking.owner_user_id)
        .bind(&booking.flight_code)
        .bind(booking.flight_id)
        .bind(&booking.passenger_name)
        .bind(&booking.seat_number)
        .bind(booking.number_of_seats)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(&booking.payment_id)
        .bind(&booking.external_booking_id)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn get_by_external_id(&self, external_id: &str) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE external_booking_id = $1",
            SELECT_COLUMNS
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_by_owner(&self, owner_user_id: i64) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE owner_user_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(owner_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_imported(&self) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE external_booking_id IS NOT NULL \
             ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE bookings SET owner_user_id = $2, flight_code = $3, flight_id = $4, \
             passenger_name = $5, seat_number = $6, number_of_seats = $7, total_price = $8, \
             status = $9, payment_status = $10, payment_id = $11, external_booking_id = $12, \
             updated_at = $13 WHERE id = $1",
        )
        .bind(booking.id)
        .bind(booking.owner_user_id)
        .bind(&booking.flight_code)
        .bind(booking.flight_id)
        .bind(&booking.passenger_name)
        .bind(&booking.seat_number)
        .bind(booking.number_of_seats)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(&booking.payment_id)
        .bind(&booking.external_booking_id)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
