pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod partner_client;
pub mod schedule_client;

pub use booking_repo::PgBookingStore;
pub use database::DbClient;
pub use partner_client::HttpPartnerClient;
pub use schedule_client::HttpInventoryClient;
