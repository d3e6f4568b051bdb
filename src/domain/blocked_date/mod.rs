pub mod model;
pub mod repository;

pub use model::BlockedDate;
pub use repository::BlockedDateRepository;
