//! # Cart Module
//!
//! The session's line-item mapping and the pure half of cart aggregation.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Read (get_cart)                            │
//! │                                                                         │
//! │   SessionStore ──► LineItems ──► lookup each id ──► Resolution          │
//! │                    (ordered)      (I/O, caller)      │                  │
//! │                                                      ├─ resolved items  │
//! │                                                      └─ stale refs      │
//! │                                                                         │
//! │   Resolution::repair(&mut LineItems)   → drops stale refs (caller saves)│
//! │   Resolution::into_cart(policy, cur)   → items + totals                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution and repair are separate so the purge can be tested without
//! any lookups, and so the caller decides when the repaired mapping is
//! persisted.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::pricing::{calculate_totals, DiscountPolicy};
use crate::types::{Cart, LineItemRef, Product, ProductId, ResolvedLineItem};

// =============================================================================
// Line Items (persisted mapping)
// =============================================================================

/// The `productId -> quantity` mapping stored in the session.
///
/// ## Invariants
/// - Product ids are unique
/// - Every quantity is ≥ 1
/// - Insertion order is preserved (display order)
///
/// Serialized as an ordered JSON array of [`LineItemRef`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItemRef>", into = "Vec<LineItemRef>")]
pub struct LineItems {
    entries: Vec<LineItemRef>,
}

impl LineItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineItemRef> {
        self.entries.iter()
    }

    /// Current quantity of a product, if present.
    pub fn get(&self, product_id: ProductId) -> Option<u32> {
        self.position(product_id).map(|idx| self.entries[idx].quantity)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Adds `quantity` to an existing entry or appends a new one.
    ///
    /// A zero quantity is a no-op. Accumulation saturates at `u32::MAX`.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.position(product_id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.quantity = entry.quantity.saturating_add(quantity);
            }
            None => self.entries.push(LineItemRef {
                product_id,
                quantity,
            }),
        }
    }

    /// Replaces the quantity of an existing entry.
    ///
    /// A zero quantity removes the entry (even if it was absent).
    ///
    /// ## Errors
    /// [`CoreError::ItemNotInCart`] when the product is not present and
    /// `quantity > 0`. Nothing is changed in that case.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> CoreResult<()> {
        if quantity == 0 {
            self.remove(product_id);
            return Ok(());
        }
        let idx = self
            .position(product_id)
            .ok_or(CoreError::ItemNotInCart(product_id))?;
        self.entries[idx].quantity = quantity;
        Ok(())
    }

    /// Removes an entry. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        match self.position(product_id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every listed reference whose stored quantity is unchanged.
    ///
    /// An entry modified since `stale` was read (re-added, updated) is kept.
    /// Returns how many entries were dropped.
    pub fn purge(&mut self, stale: &[LineItemRef]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !stale.contains(entry));
        before - self.entries.len()
    }

    /// Sum of stored quantities, stale ids included.
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id == product_id)
    }
}

/// Rebuilds the invariants from an untrusted list: later duplicates are
/// merged into the first occurrence and zero quantities are dropped.
impl From<Vec<LineItemRef>> for LineItems {
    fn from(refs: Vec<LineItemRef>) -> Self {
        let mut items = LineItems::new();
        for item in refs {
            items.add(item.product_id, item.quantity);
        }
        items
    }
}

impl From<LineItems> for Vec<LineItemRef> {
    fn from(items: LineItems) -> Self {
        items.entries
    }
}

impl FromIterator<LineItemRef> for LineItems {
    fn from_iter<I: IntoIterator<Item = LineItemRef>>(iter: I) -> Self {
        LineItems::from(iter.into_iter().collect::<Vec<_>>())
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Outcome of resolving every stored line item against the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    resolved: Vec<ResolvedLineItem>,
    stale: Vec<LineItemRef>,
}

impl Resolution {
    /// Builds a resolution from lookup outcomes, in mapping order.
    ///
    /// `None` marks a reference that did not resolve, whatever the reason.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::cart::Resolution;
    /// use storefront_core::types::{LineItemRef, ProductId};
    ///
    /// let gone = LineItemRef { product_id: ProductId::new(9), quantity: 1 };
    /// let resolution = Resolution::from_lookups(vec![(gone, None)]);
    ///
    /// assert!(resolution.items().is_empty());
    /// assert_eq!(resolution.stale(), &[gone]);
    /// ```
    pub fn from_lookups<I>(lookups: I) -> Self
    where
        I: IntoIterator<Item = (LineItemRef, Option<Product>)>,
    {
        let mut resolution = Resolution::default();
        for (item, product) in lookups {
            match product {
                Some(product) => resolution
                    .resolved
                    .push(ResolvedLineItem::from_product(&product, item.quantity)),
                None => resolution.stale.push(item),
            }
        }
        resolution
    }

    pub fn items(&self) -> &[ResolvedLineItem] {
        &self.resolved
    }

    /// References that failed to resolve, as read, in mapping order.
    pub fn stale(&self) -> &[LineItemRef] {
        &self.stale
    }

    pub fn needs_repair(&self) -> bool {
        !self.stale.is_empty()
    }

    /// Drops stale references from the mapping. Returns whether anything
    /// changed (i.e. whether the caller must persist the mapping).
    pub fn repair(&self, items: &mut LineItems) -> bool {
        self.needs_repair() && items.purge(&self.stale) > 0
    }

    /// Prices the resolved items into a cart snapshot.
    pub fn into_cart(self, policy: &DiscountPolicy, currency: &str) -> Cart {
        let totals = calculate_totals(&self.resolved, policy, currency);
        Cart {
            items: self.resolved,
            totals,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
