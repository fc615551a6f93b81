//! Order totals.
//!
//! Totals are derived from the cart lines every time they are needed and are
//! never stored, so they cannot drift from the cart.
//!
//! - `subtotal = Σ price × quantity`
//! - `shipping = 0` when `subtotal > free_shipping_threshold` (strictly
//!   greater), otherwise `flat_shipping_fee`
//! - `tax = round2(subtotal × tax_rate)`, half away from zero
//! - `total = subtotal + shipping + tax`
//!
//! [`PricingRules::compute_totals`] saturates at the `Decimal` range. Input
//! that did not come from a validated cart goes through
//! [`PricingRules::checked_totals`] instead.

use rust_decimal::Decimal;
use satwa_core::{CartLineItem, Price};
use serde::{Deserialize, Serialize};

/// Subtotal/shipping/tax/total for a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsBreakdown {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl TotalsBreakdown {
    /// Whether shipping was waived.
    #[must_use]
    pub fn has_free_shipping(&self) -> bool {
        self.shipping == Price::ZERO
    }
}

/// Pricing constants. Defaults: $10.00 flat shipping, free above $100.00, 8% tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRules {
    pub flat_shipping_fee: Price,
    pub free_shipping_threshold: Price,
    pub tax_rate: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            flat_shipping_fee: Price::from_cents(1_000),
            free_shipping_threshold: Price::from_cents(10_000),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

impl PricingRules {
    /// Compute the totals for `lines`.
    #[must_use]
    pub fn compute_totals(&self, lines: &[CartLineItem]) -> TotalsBreakdown {
        let subtotal: Price = lines.iter().map(CartLineItem::line_total).sum();
        let shipping = self.shipping_for(subtotal);
        let tax = subtotal.scale(self.tax_rate).round_currency();

        TotalsBreakdown {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Like [`compute_totals`](Self::compute_totals), but `None` if any step overflows.
    #[must_use]
    pub fn checked_totals(&self, lines: &[CartLineItem]) -> Option<TotalsBreakdown> {
        let subtotal = checked_subtotal(lines)?;
        let shipping = self.shipping_for(subtotal);
        let tax = subtotal.checked_scale(self.tax_rate)?.round_currency();

        Some(TotalsBreakdown {
            subtotal,
            shipping,
            tax,
            total: subtotal.checked_add(shipping)?.checked_add(tax)?,
        })
    }

    /// Shipping charged on `subtotal`.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Price) -> Price {
        if subtotal > self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Smallest extra spend (in whole cents) that makes shipping free.
    ///
    /// `None` when shipping is already free.
    #[must_use]
    pub fn amount_until_free_shipping(&self, subtotal: Price) -> Option<Price> {
        if subtotal > self.free_shipping_threshold {
            return None;
        }
        let gap = (self.free_shipping_threshold - subtotal).round_currency();
        Some(gap + Price::from_cents(1))
    }
}

/// `Σ price × quantity`, or `None` on overflow.
#[must_use]
pub fn checked_subtotal(lines: &[CartLineItem]) -> Option<Price> {
    lines.iter().try_fold(Price::ZERO, |acc, line| {
        acc.checked_add(line.checked_line_total()?)
    })
}

/// Totals under the default [`PricingRules`].
#[must_use]
pub fn compute_totals(lines: &[CartLineItem]) -> TotalsBreakdown {
    PricingRules::default().compute_totals(lines)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use satwa_core::ProductId;

    use super::*;

    fn line(id: i32, price: Decimal, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Price::new(price),
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn test_shipping_boundary_exactly_threshold_is_charged() {
        let totals = compute_totals(&[line(1, dec!(100.00), 1)]);
        assert_eq!(totals.subtotal.amount(), dec!(100.00));
        assert_eq!(totals.shipping.amount(), dec!(10.00));
        assert!(!totals.has_free_shipping());
    }

    #[test]
    fn test_shipping_boundary_one_cent_over_is_free() {
        let totals = compute_totals(&[line(1, dec!(100.01), 1)]);
        assert_eq!(totals.shipping, Price::ZERO);
        assert!(totals.has_free_shipping());
    }

    #[test]
    fn test_tax_and_total() {
        let totals = compute_totals(&[line(1, dec!(125.00), 2)]);
        assert_eq!(totals.subtotal.amount(), dec!(250.00));
        assert_eq!(totals.shipping, Price::ZERO);
        assert_eq!(totals.tax.amount(), dec!(20.00));
        assert_eq!(totals.total.amount(), dec!(270.00));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let totals = compute_totals(&[line(1, dec!(6.31), 1)]);
        assert_eq!(totals.tax.amount(), dec!(0.50));

        let totals = compute_totals(&[line(1, dec!(6.25), 1), line(2, dec!(0.31), 1)]);
        assert_eq!(totals.subtotal.amount(), dec!(6.56));
        assert_eq!(totals.tax.amount(), dec!(0.52));
    }

    #[test]
    fn test_tax_midpoint_rounds_away_from_zero() {
        // 3.0625 × 0.08 = 0.245; banker's rounding would give 0.24
        let totals = compute_totals(&[line(1, dec!(3.0625), 1)]);
        assert_eq!(totals.tax.amount(), dec!(0.25));
    }

    #[test]
    fn test_empty_cart() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, Price::ZERO);
        assert_eq!(totals.shipping.amount(), dec!(10.00));
        assert_eq!(totals.tax, Price::ZERO);
        assert_eq!(totals.total.amount(), dec!(10.00));
    }

    #[test]
    fn test_custom_rules() {
        let rules = PricingRules {
            flat_shipping_fee: Price::new(dec!(15)),
            free_shipping_threshold: Price::new(dec!(50)),
            tax_rate: dec!(0.10),
        };
        let totals = rules.compute_totals(&[line(1, dec!(40), 1)]);
        assert_eq!(totals.shipping.amount(), dec!(15));
        assert_eq!(totals.tax.amount(), dec!(4.00));
        assert_eq!(totals.total.amount(), dec!(59.00));
    }

    #[test]
    fn test_checked_totals() {
        let rules = PricingRules::default();
        let lines = [line(1, dec!(125.00), 2)];
        assert_eq!(rules.checked_totals(&lines), Some(rules.compute_totals(&lines)));

        assert_eq!(rules.checked_totals(&[line(1, Decimal::MAX, 2)]), None);
        assert_eq!(
            rules.checked_totals(&[line(1, Decimal::MAX, 1), line(2, dec!(1), 1)]),
            None
        );
        // subtotal fits, tax on top does not
        assert_eq!(rules.checked_totals(&[line(1, Decimal::MAX, 1)]), None);
        assert_eq!(checked_subtotal(&[line(1, Decimal::MAX, 1)]), Some(Price::new(Decimal::MAX)));
    }

    #[test]
    fn test_amount_until_free_shipping() {
        let rules = PricingRules::default();
        assert_eq!(
            rules.amount_until_free_shipping(Price::new(dec!(60))),
            Some(Price::new(dec!(40.01)))
        );
        assert_eq!(
            rules.amount_until_free_shipping(Price::new(dec!(100))),
            Some(Price::new(dec!(0.01)))
        );
        assert_eq!(rules.amount_until_free_shipping(Price::new(dec!(100.01))), None);
    }
}
