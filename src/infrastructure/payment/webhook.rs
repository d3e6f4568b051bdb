//! Stripe webhook signature verification and event classification
//!
//! Stripe signs each delivery with a `Stripe-Signature` header of the
//! form `t=<unix>,v1=<hex hmac>`. The HMAC-SHA256 is computed over
//! `"{t}.{raw body}"` with the endpoint's webhook secret. Verification
//! must run on the raw bytes before any JSON parsing.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use tracing::warn;

use crate::application::ports::PaymentEvent;
use crate::domain::{DomainError, DomainResult};

type HmacSha256 = Hmac<Sha256>;

/// Default allowed clock skew between Stripe's timestamp and ours.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Verify the `Stripe-Signature` header against the raw body, then
    /// classify the event. Rejected deliveries never reach the
    /// reconciler.
    pub fn verify_and_classify(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> DomainResult<PaymentEvent> {
        self.verify(payload, signature_header, Utc::now())?;
        classify_event(payload)
    }

    fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let (timestamp, signatures) = parse_signature_header(signature_header)?;

        let age = (now.timestamp() - timestamp).abs();
        if age > self.tolerance_secs {
            return Err(DomainError::SignatureInvalid(
                "timestamp outside tolerance".into(),
            ));
        }

        for candidate in &signatures {
            let Ok(candidate_bytes) = hex::decode(candidate) else {
                continue;
            };
            let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
                .map_err(|e| DomainError::SignatureInvalid(e.to_string()))?;
            mac.update(timestamp.to_string().as_bytes());
            mac.update(b".");
            mac.update(payload);
            if mac.verify_slice(&candidate_bytes).is_ok() {
                return Ok(());
            }
        }

        Err(DomainError::SignatureInvalid(
            "no matching signature".into(),
        ))
    }
}

/// Parse `t=<unix>,v1=<hex>[,v1=<hex>...]`. Stripe may send several v1
/// entries during secret rotation; any match accepts the delivery.
fn parse_signature_header(header: &str) -> DomainResult<(i64, Vec<String>)> {
    let mut timestamp: Option<i64> = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(v)) => {
                timestamp = v.parse().ok();
            }
            (Some("v1"), Some(v)) => signatures.push(v.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| DomainError::SignatureInvalid("missing timestamp".into()))?;
    if signatures.is_empty() {
        return Err(DomainError::SignatureInvalid("missing v1 signature".into()));
    }
    Ok((timestamp, signatures))
}

/// Map a verified event envelope to a `PaymentEvent`.
///
/// Checkout session events carry the reservation id in session
/// metadata. A handled-type envelope without one cannot be applied,
/// but the delivery is still acknowledged — signature failure is the
/// only rejection case — so it degrades to `Ignored` with a warning
/// rather than bouncing the delivery into endless redelivery.
fn classify_event(payload: &[u8]) -> DomainResult<PaymentEvent> {
    let envelope: Value = serde_json::from_slice(payload)
        .map_err(|e| DomainError::Validation(format!("Malformed webhook payload: {}", e)))?;

    let event_type = envelope["type"].as_str().unwrap_or_default().to_string();
    let object = &envelope["data"]["object"];

    match event_type.as_str() {
        "checkout.session.completed" => match metadata_reservation_id(object) {
            Some(reservation_id) => {
                let payment_intent_id = object["payment_intent"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                Ok(PaymentEvent::CheckoutCompleted {
                    reservation_id,
                    payment_intent_id,
                })
            }
            None => Ok(ignored_without_metadata(event_type)),
        },
        "checkout.session.expired" => match metadata_reservation_id(object) {
            Some(reservation_id) => Ok(PaymentEvent::CheckoutExpired { reservation_id }),
            None => Ok(ignored_without_metadata(event_type)),
        },
        "charge.refunded" => Ok(PaymentEvent::ChargeRefunded {
            charge_id: object["id"].as_str().unwrap_or_default().to_string(),
        }),
        _ => Ok(PaymentEvent::Ignored { event_type }),
    }
}

fn ignored_without_metadata(event_type: String) -> PaymentEvent {
    warn!(
        event_type = %event_type,
        "Checkout event carries no reservation id metadata; acknowledging without applying"
    );
    PaymentEvent::Ignored { event_type }
}

fn metadata_reservation_id(object: &Value) -> Option<String> {
    object["metadata"]["reservation_id"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], timestamp: i64, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let sig = hex::encode(mac.finalize().into_bytes());
        format!("t={},v1={}", timestamp, sig)
    }

    fn completed_payload() -> Vec<u8> {
        serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_1",
                    "payment_intent": "pi_123",
                    "metadata": { "reservation_id": "res-abc" }
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn valid_signature_is_accepted() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload();
        let header = sign(&payload, Utc::now().timestamp(), SECRET);

        let event = verifier.verify_and_classify(&payload, &header).unwrap();
        assert_eq!(
            event,
            PaymentEvent::CheckoutCompleted {
                reservation_id: "res-abc".into(),
                payment_intent_id: "pi_123".into(),
            }
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload();
        let header = sign(&payload, Utc::now().timestamp(), SECRET);

        let mut tampered = payload.clone();
        tampered[0] ^= 0x01;

        let err = verifier.verify_and_classify(&tampered, &header).unwrap_err();
        assert!(matches!(err, DomainError::SignatureInvalid(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload();
        let header = sign(&payload, Utc::now().timestamp(), "whsec_other");

        let err = verifier.verify_and_classify(&payload, &header).unwrap_err();
        assert!(matches!(err, DomainError::SignatureInvalid(_)));
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload();
        let header = sign(&payload, Utc::now().timestamp() - 3600, SECRET);

        let err = verifier.verify_and_classify(&payload, &header).unwrap_err();
        assert!(matches!(err, DomainError::SignatureInvalid(_)));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let verifier = WebhookVerifier::new(SECRET);
        let payload = completed_payload();

        for header in ["", "t=abc", "v1=deadbeef", "nonsense"] {
            let err = verifier.verify_and_classify(&payload, header).unwrap_err();
            assert!(matches!(err, DomainError::SignatureInvalid(_)), "{header}");
        }
    }

    #[test]
    fn expired_session_classifies_to_checkout_expired() {
        let payload = serde_json::json!({
            "type": "checkout.session.expired",
            "data": { "object": { "metadata": { "reservation_id": "res-xyz" } } }
        })
        .to_string()
        .into_bytes();

        let event = classify_event(&payload).unwrap();
        assert_eq!(
            event,
            PaymentEvent::CheckoutExpired {
                reservation_id: "res-xyz".into()
            }
        );
    }

    #[test]
    fn refund_classifies_to_charge_refunded() {
        let payload = serde_json::json!({
            "type": "charge.refunded",
            "data": { "object": { "id": "ch_42" } }
        })
        .to_string()
        .into_bytes();

        let event = classify_event(&payload).unwrap();
        assert_eq!(
            event,
            PaymentEvent::ChargeRefunded {
                charge_id: "ch_42".into()
            }
        );
    }

    #[test]
    fn unknown_event_kind_is_ignored() {
        let payload = serde_json::json!({
            "type": "invoice.paid",
            "data": { "object": {} }
        })
        .to_string()
        .into_bytes();

        let event = classify_event(&payload).unwrap();
        assert_eq!(
            event,
            PaymentEvent::Ignored {
                event_type: "invoice.paid".into()
            }
        );
    }

    #[test]
    fn signed_completed_session_without_metadata_is_acknowledged() {
        // A correctly signed delivery with no reservation id cannot be
        // applied, but must still be accepted or Stripe redelivers it
        // forever.
        let verifier = WebhookVerifier::new(SECRET);
        let payload = serde_json::json!({
            "type": "checkout.session.completed",
            "data": { "object": { "payment_intent": "pi_1", "metadata": {} } }
        })
        .to_string()
        .into_bytes();
        let header = sign(&payload, Utc::now().timestamp(), SECRET);

        let event = verifier.verify_and_classify(&payload, &header).unwrap();
        assert_eq!(
            event,
            PaymentEvent::Ignored {
                event_type: "checkout.session.completed".into()
            }
        );
    }

    #[test]
    fn expired_session_without_metadata_is_acknowledged() {
        let payload = serde_json::json!({
            "type": "checkout.session.expired",
            "data": { "object": {} }
        })
        .to_string()
        .into_bytes();

        let event = classify_event(&payload).unwrap();
        assert_eq!(
            event,
            PaymentEvent::Ignored {
                event_type: "checkout.session.expired".into()
            }
        );
    }
}
