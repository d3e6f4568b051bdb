//! SeaORM repository implementations

pub mod blocked_date_repository;
pub mod repository_provider;
pub mod reservation_repository;

pub use blocked_date_repository::SeaOrmBlockedDateRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use reservation_repository::SeaOrmReservationRepository;
