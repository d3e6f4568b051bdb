//! Booking DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Reservation;

/// Request to create a booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Customer full name
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 50, message = "phone is required"))]
    pub phone: String,
    /// Rental product id (e.g. "full_day_weekday", "weekly")
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    /// First rental day (ISO 8601)
    pub start_date: NaiveDate,
    /// "pickup" or "delivery"
    #[serde(default = "default_fulfillment")]
    pub fulfillment: String,
    /// Required when fulfillment is "delivery"
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

fn default_fulfillment() -> String {
    "pickup".to_string()
}

/// Response from creating a booking
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookingResponse {
    pub reservation_id: String,
    /// Hosted checkout URL the customer is redirected to
    pub checkout_url: String,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub product_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub fulfillment: String,
    pub delivery_address: Option<String>,
    pub total_amount_cents: i64,
    pub deposit_amount_cents: i64,
    pub created_at: String,
}

impl From<Reservation> for BookingDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            product_id: r.product_id,
            start_date: r.start_date,
            end_date: r.end_date,
            status: r.status.to_string(),
            customer_name: r.customer.name,
            customer_email: r.customer.email,
            fulfillment: r.fulfillment.to_string(),
            delivery_address: r.delivery_address,
            total_amount_cents: r.total_amount_cents,
            deposit_amount_cents: r.deposit_amount_cents,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}
