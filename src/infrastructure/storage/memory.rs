//! In-memory repository provider
//!
//! Backs the service-level tests. All state sits behind one mutex so the
//! capacity check and insert in [`insert_if_capacity`] are atomic, the
//! same guarantee the SQLite transaction gives in production.
//!
//! [`insert_if_capacity`]: crate::domain::ReservationRepository::insert_if_capacity

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::availability::span_is_available;
use crate::domain::{
    BlockedDate, BlockedDateRepository, DomainError, DomainResult, Reservation,
    ReservationRepository, ReservationStatus, RepositoryProvider,
};

#[derive(Default)]
struct State {
    reservations: HashMap<String, Reservation>,
    blocked_dates: Vec<BlockedDate>,
}

/// Repository provider holding everything in process memory.
pub struct InMemoryRepositoryProvider {
    reservations: InMemoryReservationRepository,
    blocked_dates: InMemoryBlockedDateRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(State::default()));
        Self {
            reservations: InMemoryReservationRepository {
                state: state.clone(),
            },
            blocked_dates: InMemoryBlockedDateRepository { state },
        }
    }

    /// Seed a blocked date.
    pub fn add_blocked_date(&self, date: NaiveDate, machine_id: Option<String>) {
        let mut state = self.reservations.state.lock().unwrap();
        state.blocked_dates.push(BlockedDate { date, machine_id });
    }

    /// Seed a reservation without the capacity check.
    pub fn add_reservation(&self, reservation: Reservation) {
        let mut state = self.reservations.state.lock().unwrap();
        state
            .reservations
            .insert(reservation.id.clone(), reservation);
    }

    /// Fetch a reservation by id, bypassing the repository trait.
    pub fn get_reservation(&self, id: &str) -> Option<Reservation> {
        let state = self.reservations.state.lock().unwrap();
        state.reservations.get(id).cloned()
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn blocked_dates(&self) -> &dyn BlockedDateRepository {
        &self.blocked_dates
    }
}

struct InMemoryReservationRepository {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn insert_if_capacity(
        &self,
        reservation: Reservation,
        total_units: u32,
    ) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();

        let existing: Vec<Reservation> = state.reservations.values().cloned().collect();
        let duration = (reservation.end_date - reservation.start_date).num_days() as u32 + 1;
        if !span_is_available(
            reservation.start_date,
            duration,
            total_units,
            &existing,
            &state.blocked_dates,
        ) {
            return Err(DomainError::CapacityExceeded);
        }

        state
            .reservations
            .insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let state = self.state.lock().unwrap();
        Ok(state.reservations.get(id).cloned())
    }

    async fn find_active_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reservations
            .values()
            .filter(|r| r.is_active() && r.start_date <= end && r.end_date >= start)
            .cloned()
            .collect())
    }

    async fn attach_checkout_session(&self, id: &str, session_id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let reservation = state
            .reservations
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
        reservation.checkout_session_id = Some(session_id.to_string());
        Ok(())
    }

    async fn confirm_paid(&self, id: &str, payment_intent_id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let reservation = state
            .reservations
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })?;
        match reservation.status {
            ReservationStatus::Pending => {
                reservation.status = ReservationStatus::Confirmed;
                reservation.payment_intent_id = Some(payment_intent_id.to_string());
            }
            // Redelivered completion event: keep the original intent
            ReservationStatus::Confirmed => {}
            // Never resurrect a cancelled or finished reservation
            _ => {}
        }
        Ok(())
    }

    async fn cancel_if_pending(&self, id: &str) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.reservations.get_mut(id) {
            Some(r) if r.status == ReservationStatus::Pending => {
                r.status = ReservationStatus::Cancelled;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            }),
        }
    }

    async fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reservations
            .values()
            .filter(|r| r.status == ReservationStatus::Pending && r.created_at < cutoff)
            .cloned()
            .collect())
    }
}

struct InMemoryBlockedDateRepository {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl BlockedDateRepository for InMemoryBlockedDateRepository {
    async fn find_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<BlockedDate>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .blocked_dates
            .iter()
            .filter(|b| start <= b.date && b.date <= end)
            .cloned()
            .collect())
    }
}
