pub mod availability;
pub mod booking;
pub mod pending_expiry;
pub mod reconciler;

pub use availability::{AvailabilityReport, AvailabilityService};
pub use booking::{BookingPolicy, BookingRequest, BookingService, CreatedBooking};
pub use pending_expiry::start_pending_expiry_task;
pub use reconciler::PaymentReconciler;
