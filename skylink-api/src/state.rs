use skylink_booking::BookingOrchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct IdentityConfig {
    /// Secret for verifying inbound caller tokens.
    pub jwt_secret: String,
    /// Shared secret expected from partner systems.
    pub partner_api_key: String,
    /// Lifetime of the re-signed service assertion, in seconds.
    pub service_token_ttl: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<BookingOrchestrator>,
    pub identity: IdentityConfig,
}
