pub mod inbound;
pub mod outbound;

pub use inbound::PaymentEvent;
pub use outbound::{CheckoutLineItem, CheckoutProvider, CheckoutRequest, CheckoutSession};
