//! Outbound ports: external collaborators the application depends on

use async_trait::async_trait;

use crate::domain::DomainResult;

/// One charge line on a checkout session
#[derive(Debug, Clone)]
pub struct CheckoutLineItem {
    pub name: String,
    pub description: String,
    pub amount_cents: i64,
}

/// Request to open a hosted checkout session for one reservation
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Reservation id, carried in session metadata for webhook reconciliation
    pub reservation_id: String,
    pub customer_email: String,
    pub line_items: Vec<CheckoutLineItem>,
}

/// A created hosted checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Opaque provider session id
    pub id: String,
    /// URL the customer is redirected to for payment
    pub url: String,
}

/// Hosted payment checkout provider (Stripe in production).
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session scoped to one reservation.
    async fn create_session(&self, request: CheckoutRequest) -> DomainResult<CheckoutSession>;
}
