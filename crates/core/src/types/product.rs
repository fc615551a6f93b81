//! Catalog product records.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Product category.
///
/// The storefront sells a fixed set of jewellery categories; the wire form is
/// the lowercase plural (`"necklaces"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Necklaces,
    Earrings,
    Rings,
    Bracelets,
}

impl Category {
    /// Every category, in storefront navigation order.
    pub const ALL: [Self; 4] = [Self::Necklaces, Self::Earrings, Self::Rings, Self::Bracelets];

    /// Wire identifier (`"necklaces"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Necklaces => "necklaces",
            Self::Earrings => "earrings",
            Self::Rings => "rings",
            Self::Bracelets => "bracelets",
        }
    }

    /// Human-readable name (`"Necklaces"`).
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Necklaces => "Necklaces",
            Self::Earrings => "Earrings",
            Self::Rings => "Rings",
            Self::Bracelets => "Bracelets",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(wanted.to_string()))
    }
}

/// Reasons a product record is rejected when a catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidProduct {
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {0} has an original price below its price")]
    OriginalPriceBelowPrice(ProductId),
    #[error("product {0} has a rating outside 0-5")]
    RatingOutOfRange(ProductId),
    #[error("product {0} has no images")]
    NoImages(ProductId),
}

/// A catalog product. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub category: Category,
    pub material: String,
    #[serde(default)]
    pub description: String,
    pub images: Vec<String>,
    pub rating: f32,
    pub reviews: u32,
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub best_seller: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// Highest allowed rating.
    pub const MAX_RATING: f32 = 5.0;

    /// First image, used for cart lines and thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    /// Whole-number discount off the original price, e.g. 25 for 299.99/399.99.
    ///
    /// Zero when there is no original price or it is not above the price.
    #[must_use]
    pub fn discount_percentage(&self) -> u32 {
        let Some(original) = self.original_price else {
            return 0;
        };
        if original <= self.price || original.amount().is_zero() {
            return 0;
        }

        original
            .amount()
            .checked_sub(self.price.amount())
            .and_then(|off| off.checked_div(original.amount()))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(0, |percent| {
                percent
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .try_into()
                    .unwrap_or(0)
            })
    }

    /// Check the record invariants a catalog relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), InvalidProduct> {
        if self.price.is_negative() {
            return Err(InvalidProduct::NegativePrice(self.id));
        }
        if self.original_price.is_some_and(|original| original < self.price) {
            return Err(InvalidProduct::OriginalPriceBelowPrice(self.id));
        }
        if !(0.0..=Self::MAX_RATING).contains(&self.rating) {
            return Err(InvalidProduct::RatingOutOfRange(self.id));
        }
        if self.images.is_empty() {
            return Err(InvalidProduct::NoImages(self.id));
        }
        Ok(())
    }
}
