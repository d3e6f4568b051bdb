//! Payment provider adapters

pub mod stripe;
pub mod webhook;

pub use stripe::{StripeCheckout, StripeConfig};
pub use webhook::WebhookVerifier;
