//! Business logic: services and ports

pub mod ports;
pub mod services;

pub use ports::{CheckoutProvider, PaymentEvent};
pub use services::{
    AvailabilityService, BookingPolicy, BookingRequest, BookingService, PaymentReconciler,
};
