//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate contains the cart pricing engine, the cart aggregation rules
//! and the product filtering logic as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (Vue)                               │   │
//! │  │    Product grid ──► Cart drawer ──► Totals / discount banner    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    storefront-api (axum)                        │   │
//! │  │    CartService, ProductService, FakeStore client, sessions      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ │   │
//! │  │   │  money  │ │ pricing │ │  cart   │ │ catalog │ │validation│ │   │
//! │  │   │  Money  │ │ Totals  │ │LineItems│ │ filters │ │  rules   │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                storefront-db (Session Storage)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItemRef, Cart, CartTotals)
//! - [`money`] - Decimal money and discount rates
//! - [`pricing`] - Subtotal / discount / total computation
//! - [`cart`] - Session line-item mapping and resolve/repair of cart snapshots
//! - [`catalog`] - Product filtering, search and statistics
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::money::{DiscountRate, Money};
//! use storefront_core::pricing::{calculate_totals, DiscountPolicy};
//!
//! let policy = DiscountPolicy::new(Money::from_major(200), DiscountRate::from_percent(10));
//! let totals = calculate_totals(&[], &policy, "EUR");
//!
//! assert!(totals.subtotal.is_zero());
//! assert!(!totals.has_discount);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::{DiscountRate, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when the deployment does not configure one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Largest quantity a single add/update request may carry.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10).
/// Repeated adds may still accumulate beyond this in the stored mapping.
pub const MAX_REQUEST_QUANTITY: i64 = 99;
