use skylink_core::{InventoryError, PartnerError, StoreError};

/// Failure taxonomy of the orchestrator operations. None of these are
/// retried by the core; each surfaces directly as the operation's result.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A domain precondition failed: inactive flight, not enough seats,
    /// a partner record the core cannot import.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("a payment id must be supplied or already present on the booking")]
    PaymentIdRequired,

    /// A remote collaborator could not be reached or timed out.
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// A remote collaborator answered with a domain-level error; its
    /// message is preserved for diagnostics.
    #[error("remote service rejected the request: {0}")]
    RemoteRejected(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<InventoryError> for BookingError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(code) => {
                BookingError::NotFound(format!("flight {} not found", code))
            }
            InventoryError::Rejected(msg) => BookingError::RemoteRejected(msg),
            InventoryError::Unavailable(msg) => BookingError::RemoteUnavailable(msg),
        }
    }
}

impl From<PartnerError> for BookingError {
    fn from(err: PartnerError) -> Self {
        match err {
            PartnerError::NotFound(id) => {
                BookingError::NotFound(format!("partner booking {} not found", id))
            }
            PartnerError::Rejected(msg) => BookingError::RemoteRejected(msg),
            PartnerError::Unavailable(msg) => BookingError::RemoteUnavailable(msg),
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => BookingError::NotFound("booking not found".to_string()),
            StoreError::Backend(msg) => BookingError::Storage(msg),
        }
    }
}
