//! # Catalog Module
//!
//! Product filtering, search and statistics over a fetched product list.
//!
//! The remote catalog only understands `limit` and `sort`; everything else
//! (category match, price range, free-text search) is applied here after the
//! fetch, in this order:
//!
//! ```text
//!   fetch(limit, sort) ──► ProductFilter::apply ──► search (optional)
//! ```

use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Sort Order
// =============================================================================

/// Sort direction understood by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses `asc`/`desc` case-insensitively. Anything else is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Post-fetch filters.
///
/// Every bound is optional; an all-`None` filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive exact category match.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }

    /// Keeps matching products, preserving their order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

// =============================================================================
// Search
// =============================================================================

/// Case-insensitive substring search over title, description and category.
///
/// A blank query keeps everything.
pub fn search(products: Vec<Product>, query: &str) -> Vec<Product> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return products;
    }

    products
        .into_iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
                || p.category.to_lowercase().contains(&term)
        })
        .collect()
}

// =============================================================================
// Statistics
// =============================================================================

/// Price statistics used by the frontend's filter sliders.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ProductStats {
    pub total_products: usize,
    #[ts(type = "number")]
    pub min_price: Money,
    #[ts(type = "number")]
    pub max_price: Money,
    #[ts(type = "number")]
    pub avg_price: Money,
}

impl ProductStats {
    /// Slider upper bound reported when the catalog is empty.
    pub const EMPTY_MAX_PRICE: i64 = 1000;

    pub fn from_products(products: &[Product]) -> Self {
        let prices = products.iter().map(|p| p.price);

        let (Some(min_price), Some(max_price)) = (prices.clone().min(), prices.clone().max())
        else {
            return ProductStats {
                total_products: 0,
                min_price: Money::zero(),
                max_price: Money::from_major(Self::EMPTY_MAX_PRICE),
                avg_price: Money::zero(),
            };
        };

        let sum: Money = prices.sum();
        ProductStats {
            total_products: products.len(),
            min_price,
            max_price,
            avg_price: sum.average_over(products.len()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
