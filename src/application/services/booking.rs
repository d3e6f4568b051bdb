//! Booking admission service
//!
//! Validates a booking request, admits it against current capacity and
//! opens the external checkout session. The capacity check and the
//! reservation insert run as one atomic repository operation
//! ([`ReservationRepository::insert_if_capacity`]), so concurrent
//! admissions can never oversubscribe the pool.
//!
//! [`ReservationRepository::insert_if_capacity`]: crate::domain::ReservationRepository::insert_if_capacity

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{info, warn};

use crate::application::ports::{CheckoutLineItem, CheckoutProvider, CheckoutRequest};
use crate::domain::{
    CustomerContact, DomainError, DomainResult, FulfillmentMode, RentalCatalog, Reservation,
    RepositoryProvider,
};

/// Deployment-fixed booking amounts and inventory size
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Total fungible machine count
    pub total_units: u32,
    /// Refundable security deposit in cents
    pub deposit_cents: i64,
    /// Flat delivery fee in cents
    pub delivery_fee_cents: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            total_units: 3,
            deposit_cents: 30000,
            delivery_fee_cents: 2500,
        }
    }
}

/// A validated booking request (field presence already enforced at the
/// HTTP boundary; business rules are checked here).
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer: CustomerContact,
    pub product_id: String,
    pub start_date: NaiveDate,
    pub fulfillment: FulfillmentMode,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

/// Successful admission result
#[derive(Debug)]
pub struct CreatedBooking {
    pub reservation_id: String,
    pub checkout_url: String,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    catalog: Arc<RentalCatalog>,
    checkout: Arc<dyn CheckoutProvider>,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        catalog: Arc<RentalCatalog>,
        checkout: Arc<dyn CheckoutProvider>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            repos,
            catalog,
            checkout,
            policy,
        }
    }

    /// Admit a booking and open its checkout session.
    ///
    /// If checkout creation fails after the reservation is persisted,
    /// the pending row stays behind holding inventory; the expiry sweep
    /// cancels it once it goes stale.
    pub async fn create(&self, request: BookingRequest) -> DomainResult<CreatedBooking> {
        let product = self
            .catalog
            .lookup(&request.product_id)
            .ok_or_else(|| DomainError::InvalidProduct(request.product_id.clone()))?;

        if request.fulfillment == FulfillmentMode::Delivery
            && request
                .delivery_address
                .as_deref()
                .map_or(true, |a| a.trim().is_empty())
        {
            return Err(DomainError::Validation(
                "Delivery address required for delivery".to_string(),
            ));
        }

        if !product.allows_start(request.start_date) {
            return Err(DomainError::Validation(format!(
                "{} cannot start on {}",
                product.id, request.start_date
            )));
        }

        let end_date = request
            .start_date
            .checked_add_days(Days::new(u64::from(product.duration_days - 1)))
            .ok_or_else(|| DomainError::Validation("Start date out of range".to_string()))?;

        let mut total_cents = product.unit_price_cents + self.policy.deposit_cents;
        if request.fulfillment == FulfillmentMode::Delivery {
            total_cents += self.policy.delivery_fee_cents;
        }

        let reservation = Reservation::new_pending(
            product.id,
            request.start_date,
            end_date,
            request.customer.clone(),
            request.fulfillment.clone(),
            request.delivery_address.clone(),
            request.notes.clone(),
            total_cents,
            self.policy.deposit_cents,
        );
        let reservation_id = reservation.id.clone();

        self.repos
            .reservations()
            .insert_if_capacity(reservation, self.policy.total_units)
            .await?;

        info!(
            reservation_id = %reservation_id,
            product_id = %product.id,
            start_date = %request.start_date,
            end_date = %end_date,
            total_cents,
            "Reservation admitted"
        );

        let session = self
            .checkout
            .create_session(self.checkout_request(
                &reservation_id,
                &request,
                product.display_name,
                product.unit_price_cents,
                request.start_date,
                end_date,
            ))
            .await
            .map_err(|e| {
                warn!(
                    reservation_id = %reservation_id,
                    error = %e,
                    "Checkout session creation failed; pending reservation left for expiry sweep"
                );
                e
            })?;

        self.repos
            .reservations()
            .attach_checkout_session(&reservation_id, &session.id)
            .await?;

        Ok(CreatedBooking {
            reservation_id,
            checkout_url: session.url,
        })
    }

    fn checkout_request(
        &self,
        reservation_id: &str,
        request: &BookingRequest,
        product_name: &str,
        product_price_cents: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> CheckoutRequest {
        let mut line_items = vec![
            CheckoutLineItem {
                name: product_name.to_string(),
                description: format!("{} to {}", start_date, end_date),
                amount_cents: product_price_cents,
            },
            CheckoutLineItem {
                name: "Security Deposit".to_string(),
                description: "Refundable upon return of equipment in good condition".to_string(),
                amount_cents: self.policy.deposit_cents,
            },
        ];
        if request.fulfillment == FulfillmentMode::Delivery {
            line_items.push(CheckoutLineItem {
                name: "Delivery Fee".to_string(),
                description: "Delivery within 15 miles".to_string(),
                amount_cents: self.policy.delivery_fee_cents,
            });
        }

        CheckoutRequest {
            reservation_id: reservation_id.to_string(),
            customer_email: request.customer.email.clone(),
            line_items,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
