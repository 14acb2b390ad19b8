use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use skylink_core::CallerContext;
use skylink_shared::PartnerBooking;

use crate::bookings::BookingResponse;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SyncExternalRequest {
    external_booking_id: String,
}

#[derive(Debug, Deserialize)]
struct SyncTravelRequest {
    booking_id: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sync/external", post(sync_external))
        .route("/v1/sync/travel", post(sync_travel))
        .route("/v1/external-bookings/{id}", get(external_booking_info))
        .route("/v1/partner/bookings", get(partner_imported))
        .route("/v1/partner/bookings/{external_id}", get(partner_by_external_id))
}

async fn sync_external(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Json(req): Json<SyncExternalRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .orchestrator
        .sync_external_booking(&req.external_booking_id, &caller)
        .await?;
    Ok(Json(booking.into()))
}

/// Called by the travel app after it creates a flight booking, with the
/// shared partner key.
async fn sync_travel(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Json(req): Json<SyncTravelRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .orchestrator
        .sync_travel_booking(&req.booking_id, &caller)
        .await?;
    Ok(Json(booking.into()))
}

async fn external_booking_info(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Result<Json<PartnerBooking>, AppError> {
    let info = state.orchestrator.external_booking_info(&id, &caller).await?;
    Ok(Json(info))
}

async fn partner_imported(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.orchestrator.partner_imported_bookings(&caller).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

async fn partner_by_external_id(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(external_id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .orchestrator
        .partner_booking_by_external_id(&external_id, &caller)
        .await?;
    Ok(Json(booking.into()))
}
