//! Reservation domain entity

use chrono::{DateTime, NaiveDate, Utc};

/// Reservation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Created by booking admission, payment not yet completed
    Pending,
    /// Payment completed
    Confirmed,
    /// Rental is currently running
    InProgress,
    /// Cancelled (checkout expired, reaped, or manual)
    Cancelled,
    /// Rental finished and equipment returned
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Cancelled,
        }
    }

    /// Statuses that count against inventory.
    pub fn counts_against_inventory(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::InProgress)
    }

    /// The status values that consume inventory, as stored in the database.
    pub const ACTIVE: [&'static str; 3] = ["pending", "confirmed", "in_progress"];
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the customer receives the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentMode {
    Pickup,
    Delivery,
}

impl FulfillmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "delivery" => Self::Delivery,
            _ => Self::Pickup,
        }
    }
}

impl std::fmt::Display for FulfillmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contact details for the booking customer
#[derive(Debug, Clone)]
pub struct CustomerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A machine rental reservation
#[derive(Debug, Clone)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: String,
    /// Catalog product this reservation was booked under
    pub product_id: String,
    /// First rental day (inclusive)
    pub start_date: NaiveDate,
    /// Last rental day (inclusive): start_date + duration - 1
    pub end_date: NaiveDate,
    /// Current status
    pub status: ReservationStatus,
    pub customer: CustomerContact,
    pub fulfillment: FulfillmentMode,
    /// Required when fulfillment is delivery
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    /// Full charge in cents: product + deposit + optional delivery fee
    pub total_amount_cents: i64,
    /// Refundable deposit portion of the total, in cents
    pub deposit_amount_cents: i64,
    /// External checkout session id, set once checkout is created
    pub checkout_session_id: Option<String>,
    /// External payment intent id, set once payment completes
    pub payment_intent_id: Option<String>,
    /// When the reservation was created
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Build a new pending reservation with a generated id.
    #[allow(clippy::too_many_arguments)]
    pub fn new_pending(
        product_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        customer: CustomerContact,
        fulfillment: FulfillmentMode,
        delivery_address: Option<String>,
        notes: Option<String>,
        total_amount_cents: i64,
        deposit_amount_cents: i64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            start_date,
            end_date,
            status: ReservationStatus::Pending,
            customer,
            fulfillment,
            delivery_address,
            notes,
            total_amount_cents,
            deposit_amount_cents,
            checkout_session_id: None,
            payment_intent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Check if this reservation consumes inventory.
    pub fn is_active(&self) -> bool {
        self.status.counts_against_inventory()
    }

    /// Check whether the rental span includes `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

// ── Tests ──────────────────────────────────────────────────────
