//! Availability query service
//!
//! Thin orchestration over the pure engine in
//! [`crate::domain::availability`]: resolve the product, fetch the
//! reservations and blocks the computation needs, run it. Nothing is
//! cached between calls; every query re-reads current records.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::domain::availability::compute_availability;
use crate::domain::{DomainError, DomainResult, RentalCatalog, RepositoryProvider};

/// Result of one availability query
#[derive(Debug)]
pub struct AvailabilityReport {
    pub product_id: String,
    pub price_cents: i64,
    pub duration_days: u32,
    /// Bookable start dates with remaining unit counts
    pub dates_with_capacity: BTreeMap<NaiveDate, u32>,
}

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    catalog: Arc<RentalCatalog>,
    total_units: u32,
}

impl AvailabilityService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        catalog: Arc<RentalCatalog>,
        total_units: u32,
    ) -> Self {
        Self {
            repos,
            catalog,
            total_units,
        }
    }

    /// Compute bookable start dates for `product_id` in `[range_start, range_end]`.
    pub async fn compute(
        &self,
        range_start: NaiveDate,
        range_end: NaiveDate,
        product_id: &str,
    ) -> DomainResult<AvailabilityReport> {
        let product = self
            .catalog
            .lookup(product_id)
            .ok_or_else(|| DomainError::InvalidProduct(product_id.to_string()))?;

        // Multi-day products look past range_end during the span check,
        // so fetch far enough ahead to account for the full duration.
        let fetch_end = range_end
            .checked_add_days(Days::new(u64::from(product.duration_days.saturating_sub(1))))
            .unwrap_or(range_end);

        let reservations = self
            .repos
            .reservations()
            .find_active_overlapping(range_start, fetch_end)
            .await?;
        let blocks = self
            .repos
            .blocked_dates()
            .find_in_range(range_start, fetch_end)
            .await?;

        let dates_with_capacity = compute_availability(
            range_start,
            range_end,
            product,
            self.total_units,
            &reservations,
            &blocks,
        );

        Ok(AvailabilityReport {
            product_id: product.id.to_string(),
            price_cents: product.unit_price_cents,
            duration_days: product.duration_days,
            dates_with_capacity,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::{CustomerContact, FulfillmentMode, Reservation};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service_with(repos: Arc<InMemoryRepositoryProvider>) -> AvailabilityService {
        AvailabilityService::new(repos, Arc::new(RentalCatalog::standard()), 3)
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let service = service_with(repos);

        let err = service
            .compute(date(2025, 6, 2), date(2025, 6, 8), "hourly")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidProduct(_)));
    }

    #[tokio::test]
    async fn weekday_product_over_one_week() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let service = service_with(repos);

        let report = service
            .compute(date(2025, 6, 2), date(2025, 6, 8), "full_day_weekday")
            .await
            .unwrap();

        assert_eq!(report.price_cents, 7500);
        assert_eq!(report.duration_days, 1);
        assert_eq!(report.dates_with_capacity.len(), 5);
        assert!(report.dates_with_capacity.values().all(|&n| n == 3));
    }

    #[tokio::test]
    async fn reservation_beyond_range_end_still_blocks_weekly_span() {
        // Weekly rental starting at range_end: days 2..8 must be free,
        // so a full house on day 5 (outside the queried range) matters.
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        for _ in 0..3 {
            let r = Reservation::new_pending(
                "full_day_weekday",
                date(2025, 6, 5),
                date(2025, 6, 5),
                CustomerContact {
                    name: "X".into(),
                    email: "x@example.com".into(),
                    phone: "555".into(),
                },
                FulfillmentMode::Pickup,
                None,
                None,
                37500,
                30000,
            );
            repos.add_reservation(r);
        }
        let service = service_with(repos);

        let report = service
            .compute(date(2025, 6, 2), date(2025, 6, 2), "weekly")
            .await
            .unwrap();
        assert!(report.dates_with_capacity.is_empty());
    }

    #[tokio::test]
    async fn blocked_date_hides_day_from_results() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.add_blocked_date(date(2025, 6, 3), None);
        let service = service_with(repos);

        let report = service
            .compute(date(2025, 6, 2), date(2025, 6, 6), "full_day_weekday")
            .await
            .unwrap();

        assert!(!report.dates_with_capacity.contains_key(&date(2025, 6, 3)));
        assert_eq!(report.dates_with_capacity.len(), 4);
    }
}
