//! # API Error and Response Envelope
//!
//! Every endpoint answers with the same JSON envelope.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront API                     │
//! │                                                                         │
//! │  Handler ─► CartService / ProductService                                │
//! │                   │                                                     │
//! │                   ├── CoreError::ProductNotFound ──┐                    │
//! │                   ├── CoreError::ItemNotInCart ────┤                    │
//! │                   ├── LookupError::Transport ──────┼──► ApiError ──►    │
//! │                   ├── SessionError::Storage ───────┤    IntoResponse    │
//! │                   └── ValidationErrors ────────────┘                    │
//! │                                                                         │
//! │  {                                                                      │
//! │    "success": false,                                                    │
//! │    "message": "Failed to add product to cart",                          │
//! │    "error": "Product not found: 9999"                                   │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use storefront_core::error::FieldViolation;
use storefront_core::{CoreError, ValidationErrors};

use crate::cart::CartError;
use crate::ports::{LookupError, SessionError};

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Request body failed field validation (422)
    ValidationError,

    /// Request could not be read at all (400)
    BadRequest,

    /// The product catalog could not be reached (502)
    CatalogUnavailable,

    /// Session storage failed (500)
    StorageError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::CatalogUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::StorageError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Error returned from handlers.
///
/// `message` is the headline shown to users; `error` carries the
/// underlying cause when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub error: Option<String>,
    pub errors: Option<Vec<FieldViolation>>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            error: None,
            errors: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// 422 carrying every field violation.
    pub fn validation(errors: ValidationErrors) -> Self {
        ApiError {
            errors: Some(errors.violations().to_vec()),
            ..ApiError::new(ErrorCode::ValidationError, "Validation failed")
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Malformed or non-object JSON body.
    pub fn invalid_json() -> Self {
        ApiError::bad_request("Invalid JSON payload")
    }

    pub fn catalog_unavailable(cause: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CatalogUnavailable, "Please try again later").with_error(cause)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Attaches the underlying cause.
    pub fn with_error(mut self, cause: impl Into<String>) -> Self {
        self.error = Some(cause.into());
        self
    }

    /// Replaces the headline, keeping the previous one as the cause.
    ///
    /// Validation and bad-request errors keep their own headline.
    pub fn headline(mut self, message: impl Into<String>) -> Self {
        if matches!(self.code, ErrorCode::ValidationError | ErrorCode::BadRequest) {
            return self;
        }
        let previous = std::mem::replace(&mut self.message, message.into());
        if self.error.is_none() {
            self.error = Some(previous);
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(cause) => write!(f, "[{:?}] {}: {}", self.code, self.message, cause),
            None => write!(f, "[{:?}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldViolation]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: &self.message,
            error: self.error.as_deref(),
            errors: self.errors.as_deref(),
        };
        (self.status(), Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) | CoreError::ItemNotInCart(_) => {
                ApiError::not_found(err.to_string())
            }
            CoreError::Validation(e) => {
                let mut errors = ValidationErrors::new();
                errors.push(e, serde_json::Value::Null);
                ApiError::validation(errors)
            }
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => ApiError::not_found(err.to_string()),
            LookupError::Transport(_) | LookupError::Decode(_) => {
                error!(error = %err, "Catalog request failed");
                ApiError::catalog_unavailable(err.to_string())
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        // Log the actual error but return a generic message
        error!(error = %err, "Session storage failed");
        ApiError::new(ErrorCode::StorageError, "Please try again later")
            .with_error("Session storage is unavailable")
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Core(e) => e.into(),
            CartError::Catalog(e) => e.into(),
            CartError::Session(e) => e.into(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation(errors)
    }
}

// =============================================================================
// Success Envelope
// =============================================================================

/// Successful response body.
///
/// ```json
/// { "success": true, "message": "Cart retrieved successfully", "data": { ... } }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Handler result type.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
