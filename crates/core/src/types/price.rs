//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront money is USD, so a `Price` is a plain decimal amount in
//! dollars. Rounding to cents always uses half-away-from-zero, which for the
//! non-negative amounts a store deals with is the familiar "round half up".

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A USD amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Number of decimal places money is rounded to.
    pub const CURRENCY_SCALE: u32 = 2;

    /// Create a new price from a dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, Self::CURRENCY_SCALE))
    }

    /// The dollar amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Round to whole cents, half away from zero.
    #[must_use]
    pub fn round_currency(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(Self::CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Price of `quantity` units, saturating at the decimal range.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Price of `quantity` units, or `None` if it does not fit a `Decimal`.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Multiply by a rate (e.g. a tax rate), saturating. The result is not rounded.
    #[must_use]
    pub fn scale(self, rate: Decimal) -> Self {
        Self(self.0.saturating_mul(rate))
    }

    /// Multiply by a rate, or `None` on overflow.
    #[must_use]
    pub fn checked_scale(self, rate: Decimal) -> Option<Self> {
        self.0.checked_mul(rate).map(Self)
    }

    /// Format for display (e.g., "$1,299.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.round_currency().0.abs();
        let text = format!("{rounded:.2}");
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        format!("{sign}${grouped}.{cents}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturating; use [`Price::checked_add`] where overflow must be reported.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl core::str::FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('$').parse::<Decimal>().map(Self)
    }
}
