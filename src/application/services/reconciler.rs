//! Payment event reconciler
//!
//! Applies payment lifecycle events to reservation state. Events arrive
//! at least once and possibly out of order, so every transition is
//! idempotent and guarded by a compare-and-swap on the current status.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::ports::PaymentEvent;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct PaymentReconciler {
    repos: Arc<dyn RepositoryProvider>,
}

impl PaymentReconciler {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Apply one already-authenticated payment event.
    ///
    /// Returns `Ok` for every event the service accepts, including ones
    /// it deliberately ignores; only storage failures propagate so the
    /// delivery can be retried by the provider.
    pub async fn apply(&self, event: PaymentEvent) -> DomainResult<()> {
        match event {
            PaymentEvent::CheckoutCompleted {
                reservation_id,
                payment_intent_id,
            } => {
                match self
                    .repos
                    .reservations()
                    .confirm_paid(&reservation_id, &payment_intent_id)
                    .await
                {
                    Ok(()) => {
                        info!(reservation_id = %reservation_id, "Reservation confirmed");
                        Ok(())
                    }
                    Err(DomainError::NotFound { .. }) => {
                        warn!(
                            reservation_id = %reservation_id,
                            "Checkout completed for unknown reservation; acknowledging"
                        );
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }

            PaymentEvent::CheckoutExpired { reservation_id } => {
                match self
                    .repos
                    .reservations()
                    .cancel_if_pending(&reservation_id)
                    .await
                {
                    Ok(true) => {
                        info!(reservation_id = %reservation_id, "Reservation cancelled (checkout expired)");
                        Ok(())
                    }
                    Ok(false) => {
                        debug!(
                            reservation_id = %reservation_id,
                            "Checkout expired for non-pending reservation; no transition"
                        );
                        Ok(())
                    }
                    Err(DomainError::NotFound { .. }) => {
                        warn!(
                            reservation_id = %reservation_id,
                            "Checkout expired for unknown reservation; acknowledging"
                        );
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }

            // Reserved for deposit-refund handling
            PaymentEvent::ChargeRefunded { charge_id } => {
                info!(charge_id = %charge_id, "Charge refunded");
                Ok(())
            }

            PaymentEvent::Ignored { event_type } => {
                debug!(event_type = %event_type, "Ignoring unhandled payment event");
                Ok(())
            }
        }
    }
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

    fn pending_reservation() -> Reservation {
        Reservation::new_pending(
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
        )
    }

    fn setup() -> (Arc<InMemoryRepositoryProvider>, PaymentReconciler, String) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let reservation = pending_reservation();
        let id = reservation.id.clone();
        repos.add_reservation(reservation);
        let reconciler = PaymentReconciler::new(repos.clone());
        (repos, reconciler, id)
    }

    #[tokio::test]
    async fn checkout_completed_confirms_and_records_intent() {
        let (repos, reconciler, id) = setup();

        reconciler
            .apply(PaymentEvent::CheckoutCompleted {
                reservation_id: id.clone(),
                payment_intent_id: "pi_123".into(),
            })
            .await
            .unwrap();

        let stored = repos.get_reservation(&id).unwrap();
        assert_eq!(stored.status, ReservationStatus::Confirmed);
        assert_eq!(stored.payment_intent_id.as_deref(), Some("pi_123"));
    }

    #[tokio::test]
    async fn checkout_completed_is_idempotent_on_replay() {
        let (repos, reconciler, id) = setup();

        let event = PaymentEvent::CheckoutCompleted {
            reservation_id: id.clone(),
            payment_intent_id: "pi_123".into(),
        };
        reconciler.apply(event.clone()).await.unwrap();
        let after_first = repos.get_reservation(&id).unwrap();

        reconciler.apply(event).await.unwrap();
        let after_second = repos.get_reservation(&id).unwrap();

        assert_eq!(after_first.status, after_second.status);
        assert_eq!(after_first.payment_intent_id, after_second.payment_intent_id);
    }

    #[tokio::test]
    async fn checkout_expired_cancels_pending() {
        let (repos, reconciler, id) = setup();

        reconciler
            .apply(PaymentEvent::CheckoutExpired {
                reservation_id: id.clone(),
            })
            .await
            .unwrap();

        let stored = repos.get_reservation(&id).unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn checkout_expired_never_cancels_confirmed() {
        let (repos, reconciler, id) = setup();

        reconciler
            .apply(PaymentEvent::CheckoutCompleted {
                reservation_id: id.clone(),
                payment_intent_id: "pi_123".into(),
            })
            .await
            .unwrap();
        reconciler
            .apply(PaymentEvent::CheckoutExpired {
                reservation_id: id.clone(),
            })
            .await
            .unwrap();

        let stored = repos.get_reservation(&id).unwrap();
        assert_eq!(stored.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn completed_after_expiry_does_not_resurrect_cancelled() {
        let (repos, reconciler, id) = setup();

        reconciler
            .apply(PaymentEvent::CheckoutExpired {
                reservation_id: id.clone(),
            })
            .await
            .unwrap();
        reconciler
            .apply(PaymentEvent::CheckoutCompleted {
                reservation_id: id.clone(),
                payment_intent_id: "pi_123".into(),
            })
            .await
            .unwrap();

        let stored = repos.get_reservation(&id).unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn unknown_reservation_is_acknowledged() {
        let (_repos, reconciler, _id) = setup();

        reconciler
            .apply(PaymentEvent::CheckoutCompleted {
                reservation_id: "missing".into(),
                payment_intent_id: "pi_999".into(),
            })
            .await
            .unwrap();
        reconciler
            .apply(PaymentEvent::CheckoutExpired {
                reservation_id: "missing".into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refunds_and_unknown_kinds_are_accepted() {
        let (_repos, reconciler, _id) = setup();

        reconciler
            .apply(PaymentEvent::ChargeRefunded {
                charge_id: "ch_1".into(),
            })
            .await
            .unwrap();
        reconciler
            .apply(PaymentEvent::Ignored {
                event_type: "invoice.created".into(),
            })
            .await
            .unwrap();
    }
}
