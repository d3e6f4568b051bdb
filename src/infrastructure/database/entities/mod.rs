//! SeaORM database entities

pub mod blocked_date;
pub mod reservation;
