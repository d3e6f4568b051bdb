//! Shared HTTP building blocks

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every REST endpoint wraps its payload in this structure.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload data, `null` on failure
    pub data: Option<T>,
    /// Error description, `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain error to its HTTP status and client-facing message.
///
/// Server-side failures get a generic message; their detail belongs in
/// the logs, not the response body.
pub fn domain_error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let (status, message) = match &err {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Validation(_) | DomainError::InvalidProduct(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        DomainError::CapacityExceeded => (StatusCode::CONFLICT, err.to_string()),
        DomainError::SignatureInvalid(_) => (
            StatusCode::BAD_REQUEST,
            "Invalid webhook signature".to_string(),
        ),
        DomainError::Storage(_) | DomainError::Upstream(_) => {
            tracing::error!(error = %err, "Internal error serving request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(ApiResponse::error(message)))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        let (status, _) = domain_error_response::<()>(DomainError::CapacityExceeded);
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) =
            domain_error_response::<()>(DomainError::InvalidProduct("hourly".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = domain_error_response::<()>(DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: "x".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn server_errors_hide_detail() {
        let (status, Json(body)) =
            domain_error_response::<()>(DomainError::Storage("connection refused".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }
}
