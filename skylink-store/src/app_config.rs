use serde::Deserialize;
use skylink_shared::pii::Masked;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub remotes: RemoteConfig,
    pub booking: BookingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: Masked<String>,
    /// Lifetime of the re-signed service assertion forwarded on outbound
    /// calls.
    #[serde(default = "default_service_token_ttl")]
    pub service_token_ttl_seconds: u64,
}

fn default_service_token_ttl() -> u64 {
    300
}

/// Endpoints of the remote collaborators.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Schedule authority owning seat-capacity truth.
    pub schedule_url: String,
    /// External booking system mirrored by the record-only sync.
    pub external_booking_url: String,
    /// Travel app whose flight bookings are imported with real inventory.
    pub travel_booking_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingSettings {
    /// Owner id recorded on bookings imported from partner systems.
    #[serde(default)]
    pub import_owner_id: i64,
    pub partner_api_key: Masked<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Base configuration file
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. SKYLINK__SERVER__PORT=4003
            .add_source(config::Environment::with_prefix("SKYLINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
