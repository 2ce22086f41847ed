//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                     │
//! │  ├── CoreError         - Cart rule violations                           │
//! │  ├── ValidationError   - A single invalid request field                 │
//! │  └── ValidationErrors  - All invalid fields of one request              │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                  │
//! │  └── DbError           - Session storage failures                       │
//! │                                                                         │
//! │  storefront-api errors                                                  │
//! │  ├── LookupError       - Catalog (FakeStore) failures                   │
//! │  ├── CartError         - What CartService returns                       │
//! │  └── ApiError          - What the frontend sees (JSON envelope)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → ApiError → Frontend    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart business rule errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Product cannot be resolved in the catalog.
    ///
    /// ## When This Occurs
    /// - Adding a product id the catalog does not know
    /// - Surfaced only by add; during cart reads stale ids are purged instead
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Updating the quantity of a product that is not in the cart.
    #[error("Product {0} not found in cart")]
    ItemNotInCart(ProductId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation before cart logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::TooLong { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Error List
// =============================================================================

/// One entry of a 422 response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
    pub value: serde_json::Value,
}

/// Every violation found while validating a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation together with the rejected value.
    pub fn push(&mut self, error: ValidationError, value: impl Into<serde_json::Value>) {
        self.violations.push(FieldViolation {
            field: error.field().to_string(),
            message: error.to_string(),
            value: value.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
