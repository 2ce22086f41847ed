//! # Validation Module
//!
//! Request validation rules for cart and catalog endpoints.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                       │
//! │  ├── Malformed JSON → 400                                               │
//! │  └── Wrong JSON types → 400                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (typed values → domain values)                    │
//! │  ├── productId positive, fits the id range                              │
//! │  └── quantity within the per-request range                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart rules (cart.rs)                                          │
//! │  └── ItemNotInCart, increments, removal on zero                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_add_quantity, validate_product_id};
//!
//! assert!(validate_product_id(1).is_ok());
//! assert!(validate_product_id(0).is_err());
//! assert_eq!(validate_add_quantity(5).unwrap(), 5);
//! ```

use crate::error::ValidationError;
use crate::types::ProductId;
use crate::MAX_REQUEST_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted free-text search query.
pub const MAX_SEARCH_LENGTH: usize = 100;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a product id coming from a request body or path.
///
/// ## Rules
/// - Must be positive
/// - Must fit the catalog's id range
pub fn validate_product_id(id: i64) -> ValidationResult<ProductId> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "productId".to_string(),
        });
    }

    u32::try_from(id)
        .map(ProductId::new)
        .map_err(|_| ValidationError::OutOfRange {
            field: "productId".to_string(),
            min: 1,
            max: i64::from(u32::MAX),
        })
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates the quantity of an add request.
///
/// ## Rules
/// - Between 1 and [`MAX_REQUEST_QUANTITY`] inclusive
pub fn validate_add_quantity(quantity: i64) -> ValidationResult<u32> {
    quantity_in_range(quantity, 1)
}

/// Validates the quantity of an update request.
///
/// ## Rules
/// - Between 0 and [`MAX_REQUEST_QUANTITY`] inclusive
/// - 0 means "remove the item"
pub fn validate_update_quantity(quantity: i64) -> ValidationResult<u32> {
    quantity_in_range(quantity, 0)
}

fn quantity_in_range(quantity: i64, min: i64) -> ValidationResult<u32> {
    let out_of_range = || ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min,
        max: MAX_REQUEST_QUANTITY,
    };

    if !(min..=MAX_REQUEST_QUANTITY).contains(&quantity) {
        return Err(out_of_range());
    }
    u32::try_from(quantity).map_err(|_| out_of_range())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no search)
/// - At most [`MAX_SEARCH_LENGTH`] characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
