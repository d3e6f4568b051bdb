//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use tracing::debug;

use crate::domain::availability::span_is_available;
use crate::domain::reservation::{
    CustomerContact, FulfillmentMode, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{BlockedDate, DomainError, DomainResult};
use crate::infrastructure::database::entities::{blocked_date, reservation};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        product_id: m.product_id,
        start_date: m.start_date,
        end_date: m.end_date,
        status: ReservationStatus::from_str(&m.status),
        customer: CustomerContact {
            name: m.customer_name,
            email: m.customer_email,
            phone: m.customer_phone,
        },
        fulfillment: FulfillmentMode::from_str(&m.fulfillment),
        delivery_address: m.delivery_address,
        notes: m.notes,
        total_amount_cents: m.total_amount_cents,
        deposit_amount_cents: m.deposit_amount_cents,
        checkout_session_id: m.checkout_session_id,
        payment_intent_id: m.payment_intent_id,
        created_at: m.created_at,
    }
}

fn domain_to_active(r: Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id),
        product_id: Set(r.product_id),
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
        status: Set(r.status.as_str().to_string()),
        customer_name: Set(r.customer.name),
        customer_email: Set(r.customer.email),
        customer_phone: Set(r.customer.phone),
        fulfillment: Set(r.fulfillment.as_str().to_string()),
        delivery_address: Set(r.delivery_address),
        notes: Set(r.notes),
        total_amount_cents: Set(r.total_amount_cents),
        deposit_amount_cents: Set(r.deposit_amount_cents),
        checkout_session_id: Set(r.checkout_session_id),
        payment_intent_id: Set(r.payment_intent_id),
        created_at: Set(r.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// SQLite reports write-lock contention as a busy/locked error. Inside
/// the admission transaction that means another booking won the race
/// for the same span, so the loser gets a capacity conflict the caller
/// can retry, not a server error.
fn admission_err(e: sea_orm::DbErr) -> DomainError {
    let message = e.to_string().to_lowercase();
    if message.contains("database is locked") || message.contains("busy") {
        return DomainError::CapacityExceeded;
    }
    db_err(e)
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert_if_capacity(
        &self,
        reservation: Reservation,
        total_units: u32,
    ) -> DomainResult<()> {
        debug!(reservation_id = %reservation.id, "Admitting reservation");

        let start = reservation.start_date;
        let end = reservation.end_date;
        let duration = (end - start).num_days() as u32 + 1;

        // Capacity check and insert inside one transaction, so two
        // concurrent admissions serialize on the write lock instead of
        // both passing the check.
        let result = self
            .db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    let active: Vec<Reservation> = reservation::Entity::find()
                        .filter(reservation::Column::Status.is_in(ReservationStatus::ACTIVE))
                        .filter(reservation::Column::StartDate.lte(end))
                        .filter(reservation::Column::EndDate.gte(start))
                        .all(txn)
                        .await
                        .map_err(admission_err)?
                        .into_iter()
                        .map(model_to_domain)
                        .collect();

                    let blocks: Vec<BlockedDate> = blocked_date::Entity::find()
                        .filter(blocked_date::Column::Date.gte(start))
                        .filter(blocked_date::Column::Date.lte(end))
                        .all(txn)
                        .await
                        .map_err(admission_err)?
                        .into_iter()
                        .map(|b| BlockedDate {
                            date: b.date,
                            machine_id: b.machine_id,
                        })
                        .collect();

                    if !span_is_available(start, duration, total_units, &active, &blocks) {
                        return Err(DomainError::CapacityExceeded);
                    }

                    domain_to_active(reservation)
                        .insert(txn)
                        .await
                        .map_err(admission_err)?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Connection(e)) => Err(admission_err(e)),
            Err(TransactionError::Transaction(e)) => Err(e),
        }
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.is_in(ReservationStatus::ACTIVE))
            .filter(reservation::Column::StartDate.lte(end))
            .filter(reservation::Column::EndDate.gte(start))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn attach_checkout_session(&self, id: &str, session_id: &str) -> DomainResult<()> {
        let updated = reservation::Entity::update_many()
            .col_expr(
                reservation::Column::CheckoutSessionId,
                Expr::value(session_id),
            )
            .filter(reservation::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn confirm_paid(&self, id: &str, payment_intent_id: &str) -> DomainResult<()> {
        // Compare-and-swap: only a pending reservation transitions.
        let updated = reservation::Entity::update_many()
            .col_expr(
                reservation::Column::Status,
                Expr::value(ReservationStatus::Confirmed.as_str()),
            )
            .col_expr(
                reservation::Column::PaymentIntentId,
                Expr::value(payment_intent_id),
            )
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if updated.rows_affected > 0 {
            return Ok(());
        }

        // No swap: redelivered event (already confirmed) is a no-op
        // success, a missing reservation is the caller's problem.
        match self.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            }),
        }
    }

    async fn cancel_if_pending(&self, id: &str) -> DomainResult<bool> {
        let updated = reservation::Entity::update_many()
            .col_expr(
                reservation::Column::Status,
                Expr::value(ReservationStatus::Cancelled.as_str()),
            )
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if updated.rows_affected > 0 {
            return Ok(true);
        }

        match self.find_by_id(id).await? {
            Some(_) => Ok(false),
            None => Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            }),
        }
    }

    async fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .filter(reservation::Column::CreatedAt.lt(cutoff))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────
