//! Availability DTOs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for availability lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// First candidate start date (ISO 8601). Defaults to today.
    pub start: Option<NaiveDate>,
    /// Last candidate start date (ISO 8601). Defaults to today + 90 days.
    pub end: Option<NaiveDate>,
    /// Rental product id. Defaults to "full_day_weekday".
    pub product: Option<String>,
}

/// Bookable start dates for one rental product
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub product_id: String,
    /// Product price in cents
    pub price_cents: i64,
    pub duration_days: u32,
    /// Dates a rental of this product can begin, ascending
    pub available_dates: Vec<NaiveDate>,
    /// Remaining machine count per available date
    pub machines_by_date: BTreeMap<NaiveDate, u32>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn availability_response_serializes_expected_wire_keys() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let response = AvailabilityResponse {
            product_id: "full_day_weekday".into(),
            price_cents: 7500,
            duration_days: 1,
            available_dates: vec![date],
            machines_by_date: BTreeMap::from([(date, 3)]),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("machines_by_date").is_some());
        assert!(json.get("available_dates").is_some());
        assert_eq!(json["machines_by_date"]["2025-06-02"], 3);
    }
}
