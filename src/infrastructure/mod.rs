//! Infrastructure layer - database, storage, and payment adapters

pub mod database;
pub mod payment;
pub mod storage;

pub use database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
