//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │  LineItemRef    │   │  ResolvedLineItem   │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  product_id     │   │  product_id, title  │   │
//! │  │  title, price   │   │  quantity (≥1)  │   │  unit_price, qty    │   │
//! │  │  category ...   │   │  (persisted)    │   │  line_total (derived│   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────────┐     │
//! │  │   CartTotals    │   │  Cart = items + totals (fully derived)  │     │
//! │  │  subtotal       │   └─────────────────────────────────────────┘     │
//! │  │  discount       │                                                    │
//! │  │  total          │                                                    │
//! │  │  has_discount   │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted vs Derived
//! Only [`LineItemRef`]s are ever stored (in the session). Everything else is
//! recomputed from the live catalog on every cart read.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        ProductId(id)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Customer rating summary as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

/// A product as currently offered by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    #[ts(type = "number")]
    pub id: ProductId,

    /// Display name shown in the grid and in the cart.
    pub title: String,

    /// Current unit price.
    #[ts(type = "number")]
    pub price: Money,

    /// Store currency (stamped by the catalog adapter).
    pub currency: String,

    pub description: String,

    pub category: String,

    /// Image URL.
    pub image: String,

    pub rating: Option<Rating>,
}

// =============================================================================
// Line Item Reference
// =============================================================================

/// One `productId -> quantity` entry of the session's cart mapping.
///
/// Quantity is at least 1 by construction: a quantity that would drop to
/// zero removes the entry instead of persisting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemRef {
    #[ts(type = "number")]
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Resolved Line Item
// =============================================================================

/// A line item merged with live product data.
///
/// ## Serialization
/// ```json
/// { "productId": 1, "title": "...", "price": 109.95, "currency": "EUR",
///   "quantity": 2, "image": "https://...", "totalPrice": 219.9 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, rename = "CartItem")]
pub struct ResolvedLineItem {
    #[ts(type = "number")]
    pub product_id: ProductId,

    pub title: String,

    /// Unit price at the moment of this read.
    #[serde(rename = "price")]
    #[ts(type = "number")]
    pub unit_price: Money,

    pub currency: String,

    pub quantity: u32,

    pub image: String,

    /// `unit_price × quantity`, unrounded.
    #[serde(rename = "totalPrice")]
    #[ts(type = "number")]
    pub line_total: Money,
}

impl ResolvedLineItem {
    /// Merges a stored line-item reference with the product it resolved to.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        ResolvedLineItem {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            currency: product.currency.clone(),
            quantity,
            image: product.image.clone(),
            line_total: product.price.multiply_quantity(quantity),
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Aggregate pricing of a cart.
///
/// ## Invariants
/// - `discount` is zero exactly when `has_discount` is false
/// - `total ≤ subtotal` for any non-negative rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub discount: Money,
    #[ts(type = "number")]
    pub total: Money,
    pub has_discount: bool,
    pub currency: String,
}

impl CartTotals {
    /// All-zero totals for an empty cart.
    pub fn zero(currency: impl Into<String>) -> Self {
        CartTotals {
            subtotal: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
            has_discount: false,
            currency: currency.into(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart snapshot returned by every cart operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub items: Vec<ResolvedLineItem>,
    pub totals: CartTotals,
}

impl Cart {
    /// An empty cart priced in the given currency.
    pub fn empty(currency: impl Into<String>) -> Self {
        Cart {
            items: Vec::new(),
            totals: CartTotals::zero(currency),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over resolved items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
