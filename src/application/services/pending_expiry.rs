//! Background task that reaps stale pending reservations.
//!
//! A reservation stays `pending` from admission until its checkout
//! completes or expires. When checkout-session creation fails, or the
//! provider never delivers an expiry event, that row would hold
//! inventory forever. This task cancels pending reservations older than
//! the configured TTL, with the same compare-and-swap the reconciler
//! uses so a concurrently-confirmed reservation is never touched.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::time;
use tracing::{info, warn};

use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

/// Cancel pending reservations created more than `ttl_minutes` ago.
/// Returns how many were cancelled.
pub async fn cancel_stale_pending(
    repos: &Arc<dyn RepositoryProvider>,
    ttl_minutes: i64,
) -> DomainResult<usize> {
    let cutoff = Utc::now() - Duration::minutes(ttl_minutes);
    let stale = repos.reservations().find_stale_pending(cutoff).await?;

    if stale.is_empty() {
        return Ok(0);
    }

    info!(count = stale.len(), "Reaping stale pending reservations");

    let mut cancelled = 0;
    for reservation in stale {
        match repos.reservations().cancel_if_pending(&reservation.id).await {
            Ok(true) => cancelled += 1,
            // Confirmed between the query and the swap
            Ok(false) => {}
            Err(e) => {
                warn!(
                    reservation_id = %reservation.id,
                    error = %e,
                    "Failed to cancel stale reservation"
                );
            }
        }
    }

    Ok(cancelled)
}

/// Start the pending-reservation expiry sweep.
///
/// Checks every `check_interval_secs` for pending reservations older
/// than `ttl_minutes` and cancels them.
pub fn start_pending_expiry_task(
    repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
    ttl_minutes: i64,
) {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            ttl_minutes, "Pending-reservation expiry task started"
        );

        let mut interval = time::interval(time::Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = cancel_stale_pending(&repos, ttl_minutes).await {
                        warn!(error = %e, "Pending-reservation expiry check error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Pending-reservation expiry task shutting down");
                    break;
                }
            }
        }
    });
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{
        CustomerContact, FulfillmentMode, Reservation, ReservationStatus,
    };
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn reservation_created_at(minutes_ago: i64) -> Reservation {
        let mut r = Reservation::new_pending(
            "full_day_weekday",
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            CustomerContact {
                name: "Alice Doe".into(),
                email: "alice@example.com".into(),
                phone: "555-0100".into(),
            },
            FulfillmentMode::Pickup,
            None,
            None,
            37500,
            30000,
        );
        r.created_at = Utc::now() - Duration::minutes(minutes_ago);
        r
    }

    #[tokio::test]
    async fn stale_pending_is_cancelled() {
        let provider = Arc::new(InMemoryRepositoryProvider::new());
        let stale = reservation_created_at(120);
        let stale_id = stale.id.clone();
        provider.add_reservation(stale);

        let repos: Arc<dyn RepositoryProvider> = provider.clone();
        let cancelled = cancel_stale_pending(&repos, 60).await.unwrap();

        assert_eq!(cancelled, 1);
        assert_eq!(
            provider.get_reservation(&stale_id).unwrap().status,
            ReservationStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn fresh_pending_is_kept() {
        let provider = Arc::new(InMemoryRepositoryProvider::new());
        let fresh = reservation_created_at(5);
        let fresh_id = fresh.id.clone();
        provider.add_reservation(fresh);

        let repos: Arc<dyn RepositoryProvider> = provider.clone();
        let cancelled = cancel_stale_pending(&repos, 60).await.unwrap();

        assert_eq!(cancelled, 0);
        assert_eq!(
            provider.get_reservation(&fresh_id).unwrap().status,
            ReservationStatus::Pending
        );
    }

    #[tokio::test]
    async fn confirmed_reservation_is_never_reaped() {
        let provider = Arc::new(InMemoryRepositoryProvider::new());
        let mut confirmed = reservation_created_at(120);
        confirmed.status = ReservationStatus::Confirmed;
        let id = confirmed.id.clone();
        provider.add_reservation(confirmed);

        let repos: Arc<dyn RepositoryProvider> = provider.clone();
        let cancelled = cancel_stale_pending(&repos, 60).await.unwrap();

        assert_eq!(cancelled, 0);
        assert_eq!(
            provider.get_reservation(&id).unwrap().status,
            ReservationStatus::Confirmed
        );
    }
}
