//! Core business entities, the availability engine and repository traits

pub mod availability;
pub mod blocked_date;
pub mod catalog;
pub mod reservation;

pub use blocked_date::{BlockedDate, BlockedDateRepository};
pub use catalog::{DayType, RentalCatalog, RentalProduct};
pub use reservation::{
    CustomerContact, FulfillmentMode, Reservation, ReservationRepository, ReservationStatus,
};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let active = repos.reservations().find_active_overlapping(start, end).await?;
///     let blocks = repos.blocked_dates().find_in_range(start, end).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn reservations(&self) -> &dyn ReservationRepository;
    fn blocked_dates(&self) -> &dyn BlockedDateRepository;
}
