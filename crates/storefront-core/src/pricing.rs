//! # Pricing Engine
//!
//! Computes cart totals from resolved line items and a threshold discount.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      calculate_totals                                   │
//! │                                                                         │
//! │   raw_subtotal = Σ line_total            (exact, no rounding)           │
//! │         │                                                               │
//! │         ├──► has_discount = raw_subtotal ≥ threshold   (inclusive)      │
//! │         │                                                               │
//! │         ├──► raw_discount = has_discount ? raw_subtotal × rate : 0      │
//! │         │                                                               │
//! │         └──► raw_total    = raw_subtotal − raw_discount                 │
//! │                                                                         │
//! │   subtotal = round2(raw_subtotal)                                       │
//! │   discount = round2(raw_discount)      each rounded independently,      │
//! │   total    = round2(raw_total)         never from a rounded value       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Chaining rounded values (discount from the rounded subtotal, total from
//! the rounded discount) drifts by a cent near `.xx5` boundaries. Keep the
//! order above.

use crate::money::{DiscountRate, Money};
use crate::types::{CartTotals, ResolvedLineItem};

// =============================================================================
// Discount Policy
// =============================================================================

/// Threshold discount applied once the subtotal reaches a minimum.
///
/// Negative thresholds or rates are accepted and produce defined (if
/// meaningless) totals; the configuration loader is where they get rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountPolicy {
    pub threshold: Money,
    pub rate: DiscountRate,
}

impl DiscountPolicy {
    pub fn new(threshold: Money, rate: DiscountRate) -> Self {
        DiscountPolicy { threshold, rate }
    }

    /// Whether a raw subtotal qualifies. Exactly-at-threshold qualifies.
    #[inline]
    pub fn qualifies(&self, raw_subtotal: Money) -> bool {
        raw_subtotal >= self.threshold
    }
}

impl Default for DiscountPolicy {
    /// 10% off from 200.00.
    fn default() -> Self {
        DiscountPolicy {
            threshold: Money::from_major(200),
            rate: DiscountRate::from_percent(10),
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Computes subtotal, discount and total for a list of priced line items.
///
/// An empty list yields all-zero totals without a discount, whatever the
/// policy says.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::pricing::{calculate_totals, DiscountPolicy};
/// use storefront_core::types::{ProductId, ResolvedLineItem};
///
/// let item = ResolvedLineItem {
///     product_id: ProductId::new(1),
///     title: "Backpack".to_string(),
///     unit_price: Money::from_major(100),
///     currency: "EUR".to_string(),
///     quantity: 2,
///     image: String::new(),
///     line_total: Money::from_major(200),
/// };
///
/// let totals = calculate_totals(&[item], &DiscountPolicy::default(), "EUR");
/// assert!(totals.has_discount);
/// assert_eq!(totals.discount, Money::from_major(20));
/// assert_eq!(totals.total, Money::from_major(180));
/// ```
pub fn calculate_totals(
    items: &[ResolvedLineItem],
    policy: &DiscountPolicy,
    currency: &str,
) -> CartTotals {
    if items.is_empty() {
        return CartTotals::zero(currency);
    }

    let raw_subtotal: Money = items.iter().map(|item| item.line_total).sum();
    let has_discount = policy.qualifies(raw_subtotal);
    let raw_discount = if has_discount {
        raw_subtotal.apply_rate(policy.rate)
    } else {
        Money::zero()
    };
    let raw_total = raw_subtotal - raw_discount;

    CartTotals {
        subtotal: raw_subtotal.round2(),
        discount: raw_discount.round2(),
        total: raw_total.round2(),
        has_discount,
        currency: currency.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;
    use std::str::FromStr;

    fn line(id: u32, unit_price: Money, quantity: u32) -> ResolvedLineItem {
        ResolvedLineItem {
            product_id: ProductId::new(id),
            title: format!("Item {}", id),
            unit_price,
            currency: "EUR".to_string(),
            quantity,
            image: String::new(),
            line_total: unit_price.multiply_quantity(quantity),
        }
    }

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_exactly_at_threshold_gets_discount() {
        let items = vec![line(1, Money::from_major(100), 2)];
        let totals = calculate_totals(&items, &DiscountPolicy::default(), "EUR");

        assert!(totals.has_discount);
        assert_eq!(totals.subtotal, Money::from_major(200));
        assert_eq!(totals.discount, Money::from_major(20));
        assert_eq!(totals.total, Money::from_major(180));
    }

    #[test]
    fn test_below_threshold_no_discount() {
        let items = vec![
            line(1, Money::from_major(50), 2),
            line(2, Money::from_major(30), 1),
        ];
        let totals = calculate_totals(&items, &DiscountPolicy::default(), "EUR");

        assert!(!totals.has_discount);
        assert_eq!(totals.subtotal, Money::from_major(130));
        assert!(totals.discount.is_zero());
        assert_eq!(totals.total, Money::from_major(130));
    }

    #[test]
    fn test_above_threshold_multiple_items() {
        let items = vec![
            line(1, Money::from_major(150), 2),
            line(2, Money::from_major(75), 2),
        ];
        let totals = calculate_totals(&items, &DiscountPolicy::default(), "EUR");

        assert!(totals.has_discount);
        assert_eq!(totals.subtotal, Money::from_major(450));
        assert_eq!(totals.discount, Money::from_major(45));
        assert_eq!(totals.total, Money::from_major(405));
    }

    #[test]
    fn test_empty_cart_ignores_policy() {
        let policy = DiscountPolicy::new(Money::from_major(-1), DiscountRate::from_percent(50));
        let totals = calculate_totals(&[], &policy, "USD");

        assert!(!totals.has_discount);
        assert!(totals.subtotal.is_zero());
        assert!(totals.discount.is_zero());
        assert!(totals.total.is_zero());
        assert_eq!(totals.currency, "USD");
    }

    #[test]
    fn test_just_below_threshold() {
        let items = vec![line(1, money("199.99"), 1)];
        let totals = calculate_totals(&items, &DiscountPolicy::default(), "EUR");
        assert!(!totals.has_discount);
        assert_eq!(totals.total, money("199.99"));
    }

    #[test]
    fn test_discount_uses_unrounded_subtotal() {
        // 66.6675 × 3 = 200.0025: subtotal rounds to 200.00,
        // discount 20.00025 rounds to 20.00, total 180.00225 rounds to 180.00.
        let items = vec![line(1, money("66.6675"), 3)];
        let totals = calculate_totals(&items, &DiscountPolicy::default(), "EUR");

        assert_eq!(totals.subtotal, money("200.00"));
        assert_eq!(totals.discount, money("20.00"));
        assert_eq!(totals.total, money("180.00"));
    }

    #[test]
    fn test_independent_rounding_differs_from_chained() {
        // raw subtotal 200.045 → 200.05, discount 20.0045 → 20.00,
        // total 180.0405 → 180.04. A discount taken from the rounded
        // subtotal would be 20.005 → 20.01.
        let items = vec![line(1, money("200.045"), 1)];
        let totals = calculate_totals(&items, &DiscountPolicy::default(), "EUR");

        assert_eq!(totals.subtotal, money("200.05"));
        assert_eq!(totals.discount, money("20.00"));
        assert_eq!(totals.total, money("180.04"));
    }

    #[test]
    fn test_subtotal_sums_exactly() {
        let items = vec![
            line(1, money("109.95"), 3),
            line(2, money("22.3"), 1),
        ];
        let totals = calculate_totals(&items, &DiscountPolicy::default(), "EUR");

        // 329.85 + 22.30 = 352.15; 10% = 35.215 → 35.22; total 316.935 → 316.94
        assert_eq!(totals.subtotal, money("352.15"));
        assert_eq!(totals.discount, money("35.22"));
        assert_eq!(totals.total, money("316.94"));
    }

    #[test]
    fn test_discount_zero_iff_no_discount() {
        let policy = DiscountPolicy::new(Money::from_major(10), DiscountRate::from_percent(10));
        let totals = calculate_totals(&[line(1, Money::from_major(10), 1)], &policy, "EUR");
        assert!(totals.has_discount);
        assert!(!totals.discount.is_zero());
        assert!(totals.total <= totals.subtotal);
    }

    #[test]
    fn test_policy_qualifies_inclusive() {
        let policy = DiscountPolicy::default();
        assert!(policy.qualifies(Money::from_major(200)));
        assert!(!policy.qualifies(money("199.999")));
    }
}
