//! Availability engine
//!
//! Pure capacity computation over a fixed pool of fungible units.
//! Callers fetch the reservations and blocked dates overlapping the
//! range once, then everything here runs in memory. Both the advisory
//! availability query and the admission-time re-check go through
//! [`span_is_available`], so the two paths can never disagree on what
//! "has capacity" means.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use super::blocked_date::BlockedDate;
use super::catalog::RentalProduct;
use super::reservation::Reservation;

/// Remaining units on a single day, before any day-type filtering.
///
/// Returns `None` when a null-machine block removes the whole pool;
/// otherwise `max(0, total - booked - blocked)`. A fully blocked day is
/// distinct from a day that merely counts down to zero: for multi-day
/// spans a null-machine block anywhere rejects the start date outright.
pub fn remaining_units(
    date: NaiveDate,
    total_units: u32,
    reservations: &[Reservation],
    blocks: &[BlockedDate],
) -> Option<u32> {
    let booked = reservations
        .iter()
        .filter(|r| r.is_active() && r.covers(date))
        .count() as u32;

    let mut blocked = 0u32;
    for block in blocks.iter().filter(|b| b.date == date) {
        if block.blocks_all_units() {
            return None;
        }
        blocked += 1;
    }

    Some(total_units.saturating_sub(booked + blocked))
}

/// Consecutive-availability check: every day in `[start, start + duration - 1]`
/// must have at least one remaining unit and no null-machine block.
pub fn span_is_available(
    start: NaiveDate,
    duration_days: u32,
    total_units: u32,
    reservations: &[Reservation],
    blocks: &[BlockedDate],
) -> bool {
    (0..duration_days).all(|offset| {
        let Some(day) = start.checked_add_days(Days::new(u64::from(offset))) else {
            return false;
        };
        matches!(
            remaining_units(day, total_units, reservations, blocks),
            Some(n) if n > 0
        )
    })
}

/// Compute per-date remaining capacity for one product over a date range.
///
/// Only valid, available start dates appear in the result; dates that
/// fail the product's day rules or have no capacity are simply absent,
/// never reported as zero. An inverted range yields an empty map.
pub fn compute_availability(
    range_start: NaiveDate,
    range_end: NaiveDate,
    product: &RentalProduct,
    total_units: u32,
    reservations: &[Reservation],
    blocks: &[BlockedDate],
) -> BTreeMap<NaiveDate, u32> {
    let mut result = BTreeMap::new();

    let mut current = range_start;
    while current <= range_end {
        if product.allows_start(current) {
            if let Some(remaining) = remaining_units(current, total_units, reservations, blocks) {
                let available = remaining > 0
                    && (product.duration_days <= 1
                        || span_is_available(
                            current,
                            product.duration_days,
                            total_units,
                            reservations,
                            blocks,
                        ));
                if available {
                    result.insert(current, remaining);
                }
            }
        }

        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }

    result
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::RentalCatalog;
    use crate::domain::reservation::{CustomerContact, FulfillmentMode, ReservationStatus};

    const TOTAL_UNITS: u32 = 3;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reservation(start: NaiveDate, end: NaiveDate, status: ReservationStatus) -> Reservation {
        let mut r = Reservation::new_pending(
            "full_day_weekday",
            start,
            end,
            CustomerContact {
                name: "Test Customer".into(),
                email: "test@example.com".into(),
                phone: "555-0100".into(),
            },
            FulfillmentMode::Pickup,
            None,
            None,
            37500,
            30000,
        );
        r.status = status;
        r
    }

    fn catalog() -> RentalCatalog {
        RentalCatalog::standard()
    }

    #[test]
    fn full_week_no_bookings_returns_only_weekdays_at_full_capacity() {
        // Scenario A: Mon 2025-06-02 .. Sun 2025-06-08
        let c = catalog();
        let product = c.lookup("full_day_weekday").unwrap();

        let result = compute_availability(
            date(2025, 6, 2),
            date(2025, 6, 8),
            product,
            TOTAL_UNITS,
            &[],
            &[],
        );

        assert_eq!(result.len(), 5);
        for day in 2..=6 {
            assert_eq!(result.get(&date(2025, 6, day)), Some(&TOTAL_UNITS));
        }
        assert!(!result.contains_key(&date(2025, 6, 7)));
        assert!(!result.contains_key(&date(2025, 6, 8)));
    }

    #[test]
    fn active_reservation_reduces_remaining() {
        // Scenario B
        let c = catalog();
        let product = c.lookup("full_day_weekday").unwrap();
        let booked = vec![reservation(
            date(2025, 6, 10),
            date(2025, 6, 10),
            ReservationStatus::Confirmed,
        )];

        let result = compute_availability(
            date(2025, 6, 10),
            date(2025, 6, 10),
            product,
            TOTAL_UNITS,
            &booked,
            &[],
        );

        assert_eq!(result.get(&date(2025, 6, 10)), Some(&2));
    }

    #[test]
    fn cancelled_reservation_does_not_consume_inventory() {
        let c = catalog();
        let product = c.lookup("full_day_weekday").unwrap();
        let booked = vec![reservation(
            date(2025, 6, 10),
            date(2025, 6, 10),
            ReservationStatus::Cancelled,
        )];

        let result = compute_availability(
            date(2025, 6, 10),
            date(2025, 6, 10),
            product,
            TOTAL_UNITS,
            &booked,
            &[],
        );

        assert_eq!(result.get(&date(2025, 6, 10)), Some(&3));
    }

    #[test]
    fn null_machine_block_removes_date_entirely() {
        // Scenario C
        let c = catalog();
        let product = c.lookup("full_day_weekday").unwrap();
        let blocks = vec![BlockedDate {
            date: date(2025, 6, 10),
            machine_id: None,
        }];

        let result = compute_availability(
            date(2025, 6, 9),
            date(2025, 6, 11),
            product,
            TOTAL_UNITS,
            &[],
            &blocks,
        );

        assert!(!result.contains_key(&date(2025, 6, 10)));
        assert_eq!(result.get(&date(2025, 6, 9)), Some(&3));
        assert_eq!(result.get(&date(2025, 6, 11)), Some(&3));
    }

    #[test]
    fn single_machine_block_reduces_count() {
        let c = catalog();
        let product = c.lookup("full_day_weekday").unwrap();
        let blocks = vec![
            BlockedDate {
                date: date(2025, 6, 10),
                machine_id: Some("unit-1".into()),
            },
            BlockedDate {
                date: date(2025, 6, 10),
                machine_id: Some("unit-2".into()),
            },
        ];

        let result = compute_availability(
            date(2025, 6, 10),
            date(2025, 6, 10),
            product,
            TOTAL_UNITS,
            &[],
            &blocks,
        );

        assert_eq!(result.get(&date(2025, 6, 10)), Some(&1));
    }

    #[test]
    fn weekly_start_rejected_when_block_falls_mid_span() {
        // Scenario D: weekly starting Mon 2025-06-02, full block on Fri 06-06
        let c = catalog();
        let product = c.lookup("weekly").unwrap();
        let blocks = vec![BlockedDate {
            date: date(2025, 6, 6),
            machine_id: None,
        }];

        let result = compute_availability(
            date(2025, 6, 2),
            date(2025, 6, 2),
            product,
            TOTAL_UNITS,
            &[],
            &blocks,
        );

        assert!(!result.contains_key(&date(2025, 6, 2)));
    }

    #[test]
    fn weekly_start_rejected_when_span_day_is_fully_booked() {
        let c = catalog();
        let product = c.lookup("weekly").unwrap();
        // Three active reservations all covering 2025-06-05
        let booked: Vec<Reservation> = (0..3)
            .map(|_| {
                reservation(
                    date(2025, 6, 5),
                    date(2025, 6, 5),
                    ReservationStatus::Pending,
                )
            })
            .collect();

        let result = compute_availability(
            date(2025, 6, 2),
            date(2025, 6, 2),
            product,
            TOTAL_UNITS,
            &booked,
            &[],
        );

        assert!(!result.contains_key(&date(2025, 6, 2)));
    }

    #[test]
    fn weekly_start_accepted_when_whole_span_is_free() {
        let c = catalog();
        let product = c.lookup("weekly").unwrap();

        let result = compute_availability(
            date(2025, 6, 2),
            date(2025, 6, 2),
            product,
            TOTAL_UNITS,
            &[],
            &[],
        );

        assert_eq!(result.get(&date(2025, 6, 2)), Some(&3));
    }

    #[test]
    fn weekend_package_offered_only_on_saturdays() {
        let c = catalog();
        let product = c.lookup("weekend_package").unwrap();

        // 2025-06-07 is a Saturday, 2025-06-08 a Sunday
        let result = compute_availability(
            date(2025, 6, 2),
            date(2025, 6, 8),
            product,
            TOTAL_UNITS,
            &[],
            &[],
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(&date(2025, 6, 7)), Some(&3));
    }

    #[test]
    fn weekend_package_rejected_when_sunday_blocked() {
        let c = catalog();
        let product = c.lookup("weekend_package").unwrap();
        let blocks = vec![BlockedDate {
            date: date(2025, 6, 8),
            machine_id: None,
        }];

        let result = compute_availability(
            date(2025, 6, 7),
            date(2025, 6, 7),
            product,
            TOTAL_UNITS,
            &[],
            &blocks,
        );

        assert!(result.is_empty());
    }

    #[test]
    fn inverted_range_yields_empty_result() {
        let c = catalog();
        let product = c.lookup("full_day_weekday").unwrap();

        let result = compute_availability(
            date(2025, 6, 10),
            date(2025, 6, 1),
            product,
            TOTAL_UNITS,
            &[],
            &[],
        );

        assert!(result.is_empty());
    }

    #[test]
    fn remaining_never_exceeds_total_units() {
        let c = catalog();
        let product = c.lookup("weekly").unwrap();
        let booked = vec![reservation(
            date(2025, 6, 3),
            date(2025, 6, 4),
            ReservationStatus::InProgress,
        )];

        let result = compute_availability(
            date(2025, 6, 1),
            date(2025, 6, 30),
            product,
            TOTAL_UNITS,
            &booked,
            &[],
        );

        assert!(result.values().all(|&n| n >= 1 && n <= TOTAL_UNITS));
    }

    #[test]
    fn fully_booked_date_is_absent_not_zero() {
        let c = catalog();
        let product = c.lookup("full_day_weekday").unwrap();
        let booked: Vec<Reservation> = (0..3)
            .map(|_| {
                reservation(
                    date(2025, 6, 10),
                    date(2025, 6, 10),
                    ReservationStatus::Confirmed,
                )
            })
            .collect();

        let result = compute_availability(
            date(2025, 6, 10),
            date(2025, 6, 10),
            product,
            TOTAL_UNITS,
            &booked,
            &[],
        );

        assert!(result.is_empty());
    }

    #[test]
    fn span_check_counts_overlapping_reservations_per_day() {
        // A reservation covering only part of the span still blocks the
        // span when its day drops to zero remaining.
        let booked: Vec<Reservation> = (0..3)
            .map(|_| {
                reservation(
                    date(2025, 6, 4),
                    date(2025, 6, 6),
                    ReservationStatus::Confirmed,
                )
            })
            .collect();

        assert!(!span_is_available(
            date(2025, 6, 2),
            7,
            TOTAL_UNITS,
            &booked,
            &[]
        ));
        assert!(span_is_available(
            date(2025, 6, 2),
            2,
            TOTAL_UNITS,
            &booked,
            &[]
        ));
    }
}
