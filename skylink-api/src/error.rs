use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skylink_booking::BookingError;

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AppError(#[from] pub BookingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self.0 {
            BookingError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            BookingError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            BookingError::InvalidState(_) => (StatusCode::CONFLICT, self.0.to_string()),
            BookingError::PaymentIdRequired => (StatusCode::BAD_REQUEST, self.0.to_string()),
            BookingError::RemoteUnavailable(_) | BookingError::RemoteRejected(_) => {
                (StatusCode::BAD_GATEWAY, self.0.to_string())
            }
            BookingError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
