//! Inbound ports: externally-verified events delivered to the application

/// A payment lifecycle event, already authenticated by the webhook layer.
///
/// The reconciler treats every event it receives as verified; signature
/// checking happens before classification and is not its concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// Customer completed checkout; the reservation is paid.
    CheckoutCompleted {
        reservation_id: String,
        payment_intent_id: String,
    },
    /// Hosted checkout session expired without payment.
    CheckoutExpired { reservation_id: String },
    /// A charge was refunded (deposit return). Observation-only for now.
    ChargeRefunded { charge_id: String },
    /// Any event kind this service does not act on. Accepted and
    /// acknowledged so the provider stops redelivering it.
    Ignored { event_type: String },
}
