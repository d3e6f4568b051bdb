use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Unknown rental product: {0}")]
    InvalidProduct(String),

    #[error("No machines available for the selected dates")]
    CapacityExceeded,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Webhook signature verification failed: {0}")]
    SignatureInvalid(String),
}
