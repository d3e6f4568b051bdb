//! Stripe hosted checkout adapter
//!
//! Talks to the Stripe Checkout Sessions API over its form-encoded REST
//! surface. The reservation id travels in session metadata so the
//! webhook layer can route completion events back to the reservation.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::application::ports::{CheckoutProvider, CheckoutRequest, CheckoutSession};
use crate::domain::{DomainError, DomainResult};

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_live_... / sk_test_...)
    pub secret_key: String,
    /// Where Stripe redirects after successful payment
    pub success_url: String,
    /// Where Stripe redirects when the customer abandons checkout
    pub cancel_url: String,
}

pub struct StripeCheckout {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeCheckout {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_session(&self, request: CheckoutRequest) -> DomainResult<CheckoutSession> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("customer_email".into(), request.customer_email.clone()),
            ("success_url".into(), self.config.success_url.clone()),
            ("cancel_url".into(), self.config.cancel_url.clone()),
            (
                "metadata[reservation_id]".into(),
                request.reservation_id.clone(),
            ),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            form.push((
                format!("line_items[{}][price_data][currency]", i),
                "usd".into(),
            ));
            form.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form.push((
                format!("line_items[{}][price_data][product_data][description]", i),
                item.description.clone(),
            ));
            form.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.amount_cents.to_string(),
            ));
            form.push((format!("line_items[{}][quantity]", i), "1".into()));
        }

        debug!(reservation_id = %request.reservation_id, "Creating Stripe checkout session");

        let response = self
            .client
            .post(CHECKOUT_SESSIONS_URL)
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format!("Stripe request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Stripe checkout session creation failed");
            return Err(DomainError::Upstream(format!(
                "Stripe returned {}: {}",
                status, body
            )));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Upstream(format!("Invalid Stripe response: {}", e)))?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }
}
