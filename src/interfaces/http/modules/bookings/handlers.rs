//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::services::{BookingRequest, BookingService};
use crate::domain::{CustomerContact, DomainError, FulfillmentMode, RepositoryProvider};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};

use super::dto::*;

#[derive(Clone)]
pub struct BookingAppState {
    pub booking: Arc<BookingService>,
    pub repos: Arc<dyn RepositoryProvider>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking admitted, checkout session opened", body = ApiResponse<CreateBookingResponse>),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "No machines available for the selected dates"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<
    Json<ApiResponse<CreateBookingResponse>>,
    (StatusCode, Json<ApiResponse<CreateBookingResponse>>),
> {
    let fulfillment = match request.fulfillment.as_str() {
        "pickup" => FulfillmentMode::Pickup,
        "delivery" => FulfillmentMode::Delivery,
        other => {
            return Err(domain_error_response(DomainError::Validation(format!(
                "Unknown fulfillment mode: {}",
                other
            ))));
        }
    };

    let created = state
        .booking
        .create(BookingRequest {
            customer: CustomerContact {
                name: request.name,
                email: request.email,
                phone: request.phone,
            },
            product_id: request.product_id,
            start_date: request.start_date,
            fulfillment,
            delivery_address: request.delivery_address,
            notes: request.notes,
        })
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(CreateBookingResponse {
        reservation_id: created.reservation_id,
        checkout_url: created.checkout_url,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let reservation = state
        .repos
        .reservations()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?
        .ok_or_else(|| {
            domain_error_response(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.clone(),
            })
        })?;

    Ok(Json(ApiResponse::success(reservation.into())))
}
