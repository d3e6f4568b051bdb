//! Stripe webhook HTTP handler
//!
//! Takes the raw request body; signature verification happens over the
//! exact bytes Stripe signed, before any deserialization.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::application::services::PaymentReconciler;
use crate::infrastructure::payment::WebhookVerifier;
use crate::interfaces::http::common::{domain_error_response, ApiResponse};

#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Arc<WebhookVerifier>,
    pub reconciler: Arc<PaymentReconciler>,
}

/// Webhook acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
}

#[utoipa::path(
    post,
    path = "/api/v1/webhooks/stripe",
    tag = "Webhooks",
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "Event accepted", body = WebhookAck),
        (status = 400, description = "Invalid signature or malformed event"),
        (status = 500, description = "Event could not be applied; Stripe will redeliver")
    )
)]
pub async fn stripe_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, Json<ApiResponse<WebhookAck>>)> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let event = state
        .verifier
        .verify_and_classify(&body, signature)
        .map_err(|e| {
            warn!(error = %e, "Rejected webhook delivery");
            domain_error_response(e)
        })?;

    state
        .reconciler
        .apply(event)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(WebhookAck { received: true }))
}
