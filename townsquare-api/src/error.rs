/// Error handling and response envelope for the API server
///
/// Every handler returns `Result<T, ApiError>`; the error converts into the
/// uniform `{"success": false, "error": {...}}` envelope with the right
/// status code. Successful responses use [`Envelope`] for the matching
/// `{"success": true, "data": ...}` shape.
///
/// Status mapping:
/// - validation failure and uniqueness conflict: 400
/// - missing/invalid credentials: 401, insufficient rights: 403
/// - missing resource: 404
/// - anything unexpected: 500; the detail is always logged and is included
///   in the response body only in development

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether 500 responses carry the underlying error detail
static EXPOSE_INTERNAL_DETAIL: AtomicBool = AtomicBool::new(false);

/// Sets whether 500 responses include the underlying error detail
///
/// Called once when the application state is built: development exposes the
/// detail, production sends a generic message and keeps it in the logs.
pub fn expose_internal_detail(expose: bool) {
    EXPOSE_INTERNAL_DETAIL.store(expose, Ordering::Relaxed);
}

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed input, uniqueness conflict
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Validation failure (400) with field-specific messages
    Validation(Vec<FieldError>),

    /// Internal server error (500); detail is logged, never sent to clients
    Internal(String),
}

/// A single field validation failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Always true for success responses
    pub success: bool,

    /// Response payload
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload in the success envelope
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope: `{"success": false, "error": {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always false for error responses
    pub success: bool,

    /// Error payload
    pub error: ErrorBody,
}

/// Error payload inside the envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (e.g., "bad_request", "not_found")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Field-specific validation failures, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                // Always logged; the response carries the detail only in
                // development
                tracing::error!("Internal error: {}", msg);
                let message = if EXPOSE_INTERNAL_DETAIL.load(Ordering::Relaxed) {
                    msg
                } else {
                    "An internal error occurred".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message, None)
            }
        };

        let body = Json(ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique constraint violations map to 400, matching the original backend;
/// everything else is an internal error.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if message.contains("UNIQUE constraint failed") {
                    // "UNIQUE constraint failed: users.email" -> "email"
                    let field = message.rsplit('.').next().unwrap_or("value").to_string();
                    return ApiError::BadRequest(format!("{} already exists", field));
                }

                ApiError::Internal(format!("Database error: {}", message))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert validator failures into the field-specific 400 response
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

/// Convert JWT errors to API errors
impl From<townsquare_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: townsquare_shared::auth::jwt::JwtError) -> Self {
        use townsquare_shared::auth::jwt::JwtError;

        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<townsquare_shared::auth::password::PasswordError> for ApiError {
    fn from(err: townsquare_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}
