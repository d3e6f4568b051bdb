//! Machine Rental Service entry point
//!
//! REST API server for machine rental bookings.
//! Reads configuration from TOML file (~/.config/rental-service/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use machine_rental::application::services::{
    start_pending_expiry_task, AvailabilityService, BookingPolicy, BookingService,
    PaymentReconciler,
};
use machine_rental::domain::{RentalCatalog, RepositoryProvider};
use machine_rental::infrastructure::payment::{StripeCheckout, StripeConfig, WebhookVerifier};
use machine_rental::shared::shutdown::ShutdownCoordinator;
use machine_rental::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig, Migrator,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("RENTAL_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Machine Rental Service...");

    if app_cfg.payment.secret_key.is_empty() {
        warn!("No Stripe secret key configured; checkout session creation will fail");
    }

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }
    info!("Database migrations applied");

    // ── Services ───────────────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let catalog = Arc::new(RentalCatalog::standard());

    let policy = BookingPolicy {
        total_units: app_cfg.booking.total_units,
        deposit_cents: app_cfg.booking.deposit_cents,
        delivery_fee_cents: app_cfg.booking.delivery_fee_cents,
    };

    let checkout = Arc::new(StripeCheckout::new(StripeConfig {
        secret_key: app_cfg.payment.secret_key.clone(),
        success_url: app_cfg.payment.success_url(),
        cancel_url: app_cfg.payment.cancel_url(),
    }));

    let availability_service = Arc::new(AvailabilityService::new(
        repos.clone(),
        catalog.clone(),
        policy.total_units,
    ));
    let booking_service = Arc::new(BookingService::new(
        repos.clone(),
        catalog,
        checkout,
        policy,
    ));
    let reconciler = Arc::new(PaymentReconciler::new(repos.clone()));
    let webhook_verifier = Arc::new(WebhookVerifier::new(app_cfg.payment.webhook_secret.clone()));

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout_secs);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // Reap pending reservations whose checkout never completed
    start_pending_expiry_task(
        repos.clone(),
        shutdown_signal.clone(),
        app_cfg.booking.sweep_interval_secs,
        app_cfg.booking.pending_ttl_minutes,
    );

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        db.clone(),
        repos,
        availability_service,
        booking_service,
        reconciler,
        webhook_verifier,
    );

    let api_addr = app_cfg.server.api_address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Machine Rental Service shutdown complete");
    Ok(())
}
