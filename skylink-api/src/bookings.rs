use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use skylink_booking::CreateBookingRequest;
use skylink_core::CallerContext;
use skylink_shared::{Booking, BookingSource, BookingStatus, PaymentStatus};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Booking as returned to API callers; carries the derived source field.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
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
    pub source: BookingSource,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        let source = booking.source();
        Self {
            id: booking.id,
            owner_user_id: booking.owner_user_id,
            flight_code: booking.flight_code,
            flight_id: booking.flight_id,
            passenger_name: booking.passenger_name,
            seat_number: booking.seat_number,
            number_of_seats: booking.number_of_seats,
            total_price: booking.total_price,
            status: booking.status,
            payment_status: booking.payment_status,
            payment_id: booking.payment_id,
            external_booking_id: booking.external_booking_id,
            source,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: BookingStatus,
}

#[derive(Debug, Deserialize)]
struct ConfirmPaymentRequest {
    payment_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(all_bookings))
        .route("/v1/bookings/mine", get(my_bookings))
        .route("/v1/bookings/{id}", get(booking_by_id))
        .route("/v1/bookings/{id}/status", put(update_status))
        .route("/v1/bookings/{id}/payment", post(confirm_payment))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.orchestrator.create_booking(req, &caller).await?;
    Ok(Json(booking.into()))
}

async fn all_bookings(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.orchestrator.all_bookings(&caller).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.orchestrator.my_bookings(&caller).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

async fn booking_by_id(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.orchestrator.booking_by_id(id, &caller).await?;
    Ok(Json(booking.into()))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .orchestrator
        .update_booking_status(id, req.status, &caller)
        .await?;
    Ok(Json(booking.into()))
}

async fn confirm_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .orchestrator
        .confirm_payment(id, req.payment_id.as_deref(), &caller)
        .await?;
    Ok(Json(booking.into()))
}
