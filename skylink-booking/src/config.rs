use serde::Deserialize;
use skylink_shared::pii::Masked;

/// Settings the orchestrator needs from its environment, passed explicitly
/// into the constructor rather than read from ambient globals.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Placeholder owner for bookings that arise from partner imports
    /// rather than direct user action.
    pub import_owner_id: i64,

    /// Shared secret presented by partner systems on server-to-server calls.
    pub partner_api_key: Masked<String>,
}

impl BookingConfig {
    pub fn new(import_owner_id: i64, partner_api_key: impl Into<String>) -> Self {
        Self {
            import_owner_id,
            partner_api_key: Masked::new(partner_api_key.into()),
        }
    }
}
