//! SeaORM-backed repository provider

use sea_orm::DatabaseConnection;

use crate::domain::blocked_date::BlockedDateRepository;
use crate::domain::reservation::ReservationRepository;
use crate::domain::RepositoryProvider;

use super::blocked_date_repository::SeaOrmBlockedDateRepository;
use super::reservation_repository::SeaOrmReservationRepository;

/// Bundles the SeaORM repository implementations behind the domain
/// `RepositoryProvider` trait, sharing one connection pool.
pub struct SeaOrmRepositoryProvider {
    reservations: SeaOrmReservationRepository,
    blocked_dates: SeaOrmBlockedDateRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            reservations: SeaOrmReservationRepository::new(db.clone()),
            blocked_dates: SeaOrmBlockedDateRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn blocked_dates(&self) -> &dyn BlockedDateRepository {
        &self.blocked_dates
    }
}
