//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{AvailabilityService, BookingService, PaymentReconciler};
use crate::domain::RepositoryProvider;
use crate::infrastructure::payment::WebhookVerifier;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::availability::{self, dto::AvailabilityResponse};
use crate::interfaces::http::modules::bookings::{
    self,
    dto::{BookingDto, CreateBookingRequest, CreateBookingResponse},
};
use crate::interfaces::http::modules::health::{
    self,
    handlers::{ComponentHealth, HealthResponse},
};
use crate::interfaces::http::modules::webhooks::{self, handlers::WebhookAck};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::health_check,
        availability::handlers::get_availability,
        bookings::handlers::create_booking,
        bookings::handlers::get_booking,
        webhooks::handlers::stripe_webhook,
    ),
    components(
        schemas(
            ApiResponse<String>,
            HealthResponse,
            ComponentHealth,
            AvailabilityResponse,
            CreateBookingRequest,
            CreateBookingResponse,
            BookingDto,
            WebhookAck,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Availability", description = "Bookable start dates per rental product"),
        (name = "Bookings", description = "Booking admission and lookup"),
        (name = "Webhooks", description = "Payment provider event delivery"),
    ),
    info(
        title = "Machine Rental API",
        version = "1.0.0",
        description = "REST API for machine rental bookings with hosted checkout",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    repos: Arc<dyn RepositoryProvider>,
    availability_service: Arc<AvailabilityService>,
    booking_service: Arc<BookingService>,
    reconciler: Arc<PaymentReconciler>,
    webhook_verifier: Arc<WebhookVerifier>,
) -> Router {
    let availability_state = availability::handlers::AvailabilityAppState {
        availability: availability_service,
    };

    let booking_state = bookings::handlers::BookingAppState {
        booking: booking_service,
        repos,
    };

    let webhook_state = webhooks::handlers::WebhookAppState {
        verifier: webhook_verifier,
        reconciler,
    };

    let health_state = health::handlers::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let availability_routes = Router::new()
        .route("/", get(availability::handlers::get_availability))
        .with_state(availability_state);

    let booking_routes = Router::new()
        .route("/", post(bookings::handlers::create_booking))
        .route("/{id}", get(bookings::handlers::get_booking))
        .with_state(booking_state);

    let webhook_routes = Router::new()
        .route("/stripe", post(webhooks::handlers::stripe_webhook))
        .with_state(webhook_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route(
            "/health",
            get(health::handlers::health_check).with_state(health_state),
        )
        .nest("/api/v1/availability", availability_routes)
        .nest("/api/v1/bookings", booking_routes)
        .nest("/api/v1/webhooks", webhook_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
