//! HTTP endpoint modules, one per resource

pub mod availability;
pub mod bookings;
pub mod health;
pub mod webhooks;
