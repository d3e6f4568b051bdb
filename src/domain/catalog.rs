//! Rental product catalog
//!
//! The catalog is a fixed table of rental product definitions (price,
//! duration, allowed day class). It is built once at process start and
//! injected wherever product lookup is needed; nothing mutates it at
//! runtime and products are never persisted as rows.

use chrono::Weekday;

/// Which weekday class a product may start and run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    /// Monday through Friday
    Weekday,
    /// Saturday and Sunday
    Weekend,
    /// Any day of the week
    Any,
}

impl DayType {
    /// Check whether `weekday` falls into this day class.
    pub fn permits(&self, weekday: Weekday) -> bool {
        let is_weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);
        match self {
            DayType::Weekday => !is_weekend,
            DayType::Weekend => is_weekend,
            DayType::Any => true,
        }
    }
}

/// A rentable product definition.
#[derive(Debug, Clone)]
pub struct RentalProduct {
    /// Stable string key used on the wire (e.g. "full_day_weekday")
    pub id: &'static str,
    /// Human-readable name shown on checkout line items
    pub display_name: &'static str,
    /// Rental price in cents, excluding deposit and delivery fee
    pub unit_price_cents: i64,
    /// Rental length in consecutive calendar days
    pub duration_days: u32,
    /// Day class every day of the rental must satisfy
    pub day_type: DayType,
    /// If set, the rental must start on this weekday (weekend package → Saturday)
    pub must_start_on: Option<Weekday>,
}

impl RentalProduct {
    /// Check whether `date` is an allowed start day for this product.
    ///
    /// This only applies the day-type and start-weekday rules; capacity
    /// is the availability engine's concern.
    pub fn allows_start(&self, date: chrono::NaiveDate) -> bool {
        use chrono::Datelike;
        if !self.day_type.permits(date.weekday()) {
            return false;
        }
        match self.must_start_on {
            Some(required) => date.weekday() == required,
            None => true,
        }
    }
}

/// Immutable catalog of all bookable products.
pub struct RentalCatalog {
    products: Vec<RentalProduct>,
}

impl RentalCatalog {
    /// The standard six-product catalog.
    pub fn standard() -> Self {
        Self {
            products: vec![
                RentalProduct {
                    id: "half_day_weekday",
                    display_name: "Half Day Rental (Weekday)",
                    unit_price_cents: 4500,
                    duration_days: 1,
                    day_type: DayType::Weekday,
                    must_start_on: None,
                },
                RentalProduct {
                    id: "full_day_weekday",
                    display_name: "Full Day Rental (Weekday)",
                    unit_price_cents: 7500,
                    duration_days: 1,
                    day_type: DayType::Weekday,
                    must_start_on: None,
                },
                RentalProduct {
                    id: "half_day_weekend",
                    display_name: "Half Day Rental (Weekend)",
                    unit_price_cents: 5500,
                    duration_days: 1,
                    day_type: DayType::Weekend,
                    must_start_on: None,
                },
                RentalProduct {
                    id: "full_day_weekend",
                    display_name: "Full Day Rental (Weekend)",
                    unit_price_cents: 10000,
                    duration_days: 1,
                    day_type: DayType::Weekend,
                    must_start_on: None,
                },
                RentalProduct {
                    id: "weekend_package",
                    display_name: "Weekend Package (Sat+Sun)",
                    unit_price_cents: 17500,
                    duration_days: 2,
                    day_type: DayType::Weekend,
                    must_start_on: Some(Weekday::Sat),
                },
                RentalProduct {
                    id: "weekly",
                    display_name: "Weekly Rental",
                    unit_price_cents: 35000,
                    duration_days: 7,
                    day_type: DayType::Any,
                    must_start_on: None,
                },
            ],
        }
    }

    /// Look up a product by its wire id.
    pub fn lookup(&self, product_id: &str) -> Option<&RentalProduct> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn products(&self) -> &[RentalProduct] {
        &self.products
    }
}

// ── Tests ──────────────────────────────────────────────────────
