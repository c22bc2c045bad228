//! Error types and the API response envelope

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::response::ErrorBody;

/// Application error with a stable error code and optional details
///
/// This is the primary error type for the platform, providing:
/// - Stable wire codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (field-level errors, context)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationError, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a reservation conflict error
    pub fn conflict() -> Self {
        Self::new(ErrorCode::ReservationConflict)
    }

    /// Create a past-time validation error
    pub fn past_time(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ReservationPastTime, msg)
    }

    /// Create an invalid-window validation error
    pub fn invalid_time(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ReservationInvalidTime, msg)
    }

    /// Create a missing idempotency key error
    pub fn missing_idempotency_key() -> Self {
        Self::new(ErrorCode::MissingIdempotencyKey)
    }

    /// Create an auth-required error
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired)
    }

    /// Create an invalid-credentials error
    pub fn auth_invalid(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AuthInvalid, msg)
    }

    /// Create a tenant-not-found error
    pub fn tenant_not_found(tenant: impl Into<String>) -> Self {
        let t = tenant.into();
        Self::with_message(ErrorCode::TenantNotFound, format!("Tenant {} not found", t))
            .with_detail("tenant", t)
    }

    /// Create a database error
    ///
    /// The detail message stays server-side (logs); callers see the generic
    /// message for the code.
    pub fn database(msg: impl Into<String>) -> Self {
        let detail: String = msg.into();
        tracing::error!(detail = %detail, "database error");
        Self::new(ErrorCode::DatabaseError)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        let detail: String = msg.into();
        tracing::error!(detail = %detail, "internal error");
        Self::new(ErrorCode::InternalError)
    }
}

/// Unified API response envelope
///
/// Every endpoint returns either `{"data": ...}` or
/// `{"error": {"code", "message", "requestId"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error body (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response from an AppError and a request id
    pub fn error(err: &AppError, request_id: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ErrorBody {
                code: err.code,
                message: err.message.clone(),
                request_id: request_id.into(),
                details: err.details.clone(),
            }),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        // Log system errors; validation/conflict traffic is expected and is
        // recorded by the request logging middleware instead.
        if self.code.category().is_server_fault() {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
        }

        // The envelope middleware fills in the request id from request
        // extensions; until then the body carries an empty one.
        let body = ApiResponse::<()>::error(&self, "");
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}
