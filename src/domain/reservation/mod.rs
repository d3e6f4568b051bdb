pub mod model;
pub mod repository;

pub use model::{CustomerContact, FulfillmentMode, Reservation, ReservationStatus};
pub use repository::ReservationRepository;
