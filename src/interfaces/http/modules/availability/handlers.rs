//! Availability HTTP handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Days, Utc};

use crate::application::services::AvailabilityService;
use crate::interfaces::http::common::{domain_error_response, ApiResponse};

use super::dto::*;

/// Default lookahead window when no range is given
const DEFAULT_WINDOW_DAYS: u64 = 90;
const DEFAULT_PRODUCT: &str = "full_day_weekday";

#[derive(Clone)]
pub struct AvailabilityAppState {
    pub availability: Arc<AvailabilityService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable start dates", body = ApiResponse<AvailabilityResponse>),
        (status = 400, description = "Unknown product or invalid range")
    )
)]
pub async fn get_availability(
    State(state): State<AvailabilityAppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<
    Json<ApiResponse<AvailabilityResponse>>,
    (StatusCode, Json<ApiResponse<AvailabilityResponse>>),
> {
    let today = Utc::now().date_naive();
    let start = query.start.unwrap_or(today);
    let end = query
        .end
        .unwrap_or_else(|| today.checked_add_days(Days::new(DEFAULT_WINDOW_DAYS)).unwrap_or(today));
    let product = query.product.as_deref().unwrap_or(DEFAULT_PRODUCT);

    let report = state
        .availability
        .compute(start, end, product)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(AvailabilityResponse {
        product_id: report.product_id,
        price_cents: report.price_cents,
        duration_days: report.duration_days,
        available_dates: report.dates_with_capacity.keys().copied().collect(),
        machines_by_date: report.dates_with_capacity,
    })))
}
