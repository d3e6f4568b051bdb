//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::Reservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new pending reservation, but only if every day of its
    /// span still has a free unit under `total_units`.
    ///
    /// The capacity check and the insert run as one atomic unit so two
    /// concurrent admissions cannot both pass the check. Blocked dates
    /// overlapping the span are included in the accounting. Returns
    /// `DomainError::CapacityExceeded` when the span is full.
    async fn insert_if_capacity(
        &self,
        reservation: Reservation,
        total_units: u32,
    ) -> DomainResult<()>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Find all active reservations overlapping `[start, end]` (inclusive)
    async fn find_active_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Reservation>>;

    /// Attach the external checkout session id to a reservation
    async fn attach_checkout_session(&self, id: &str, session_id: &str) -> DomainResult<()>;

    /// Mark a reservation confirmed and record its payment intent.
    ///
    /// Idempotent: confirming an already-confirmed reservation is a
    /// no-op success. Returns the status the reservation ended up in.
    async fn confirm_paid(&self, id: &str, payment_intent_id: &str) -> DomainResult<()>;

    /// Cancel a reservation only if it is still pending
    /// (compare-and-swap on status). Returns whether a row changed.
    async fn cancel_if_pending(&self, id: &str) -> DomainResult<bool>;

    /// Find pending reservations created before `cutoff` (stale
    /// checkout sessions to be reaped).
    async fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Reservation>>;
}
