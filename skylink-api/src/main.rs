use skylink_api::{app, AppState, IdentityConfig};
use skylink_booking::{BookingConfig, BookingOrchestrator};
use skylink_store::{DbClient, HttpInventoryClient, HttpPartnerClient, PgBookingStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skylink_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = skylink_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Skylink booking API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let timeout = Duration::from_secs(config.remotes.request_timeout_seconds);
    let inventory = HttpInventoryClient::new(config.remotes.schedule_url.clone(), timeout)
        .expect("Failed to build schedule client");
    let mirror_partner =
        HttpPartnerClient::new(config.remotes.external_booking_url.clone(), timeout)
            .expect("Failed to build external booking client");
    let travel_partner = HttpPartnerClient::new(config.remotes.travel_booking_url.clone(), timeout)
        .expect("Failed to build travel booking client");

    let orchestrator = BookingOrchestrator::new(
        Arc::new(PgBookingStore::new(db.pool.clone())),
        Arc::new(inventory),
        Arc::new(mirror_partner),
        Arc::new(travel_partner),
        BookingConfig::new(
            config.booking.import_owner_id,
            config.booking.partner_api_key.expose().clone(),
        ),
    );

    let app_state = AppState {
        orchestrator: Arc::new(orchestrator),
        identity: IdentityConfig {
            jwt_secret: config.auth.jwt_secret.expose().clone(),
            partner_api_key: config.booking.partner_api_key.expose().clone(),
            service_token_ttl: config.auth.service_token_ttl_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
