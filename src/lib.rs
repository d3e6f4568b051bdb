//! # Machine Rental Service
//!
//! Booking backend for a small fleet of rental machines: availability
//! computation, booking admission with hosted checkout, and payment
//! webhook reconciliation.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, the availability engine and repository traits
//! - **application**: Booking, availability and reconciliation services plus ports
//! - **infrastructure**: External concerns (database, payment provider)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::migrator::Migrator;
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::create_api_router;
