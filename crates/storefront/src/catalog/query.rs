//! Catalog search, filter and sort.
//!
//! [`query`] is a pure function of the product slice and a [`CatalogQuery`].
//! Filters narrow the result in a fixed order (search, single category,
//! category set, material set, price range) and the sort is stable, so equal
//! keys keep catalog order. An empty result is a normal outcome.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use satwa_core::{Category, ParseCategoryError, Price, Product};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order, unchanged.
    #[default]
    Featured,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Alphabetical by name, ignoring case.
    ///
    /// Compares lowercased code points, not a locale collation: accented
    /// letters sort after `z` rather than next to their base letter.
    Name,
    /// Best rated first.
    Rating,
    /// Highest id first.
    Newest,
}

impl SortKey {
    /// Every key, in the order the shop's sort menu lists them.
    pub const ALL: [Self; 6] = [
        Self::Featured,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Name,
        Self::Rating,
        Self::Newest,
    ];

    /// Wire identifier (`"price-low"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised sort key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key: {0}")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseSortKeyError(wanted.to_string()))
    }
}

/// Single-category filter. `"all"` (or an empty string) disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Sentinel meaning "no category filter".
    pub const ALL_SENTINEL: &'static str = "all";

    /// Whether `category` passes the filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(Self::ALL_SENTINEL) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Price::ZERO,
            max: Price::new(Decimal::MAX),
        }
    }
}

impl PriceRange {
    /// `[min, max]`.
    #[must_use]
    pub const fn new(min: Price, max: Price) -> Self {
        Self { min, max }
    }

    /// `min <= price <= max`.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Search, filter and sort parameters for a catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against name, description and tags.
    pub search: String,
    pub category: CategoryFilter,
    /// Empty means every category.
    pub selected_categories: BTreeSet<Category>,
    /// Exact material names; empty means every material.
    pub selected_materials: BTreeSet<String>,
    pub price_range: PriceRange,
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Query that returns the whole catalog in catalog order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    #[must_use]
    pub fn category(mut self, filter: impl Into<CategoryFilter>) -> Self {
        self.category = filter.into();
        self
    }

    #[must_use]
    pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.selected_categories = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn materials<S: Into<String>>(mut self, materials: impl IntoIterator<Item = S>) -> Self {
        self.selected_materials = materials.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn price_range(mut self, min: Price, max: Price) -> Self {
        self.price_range = PriceRange::new(min, max);
        self
    }

    #[must_use]
    pub const fn sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    /// Whether `product` passes every filter stage.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_with_needle(product, &self.needle())
    }

    fn needle(&self) -> String {
        self.search.trim().to_lowercase()
    }

    fn matches_with_needle(&self, product: &Product, needle: &str) -> bool {
        matches_search(product, needle)
            && self.category.matches(product.category)
            && (self.selected_categories.is_empty()
                || self.selected_categories.contains(&product.category))
            && (self.selected_materials.is_empty()
                || self.selected_materials.contains(&product.material))
            && self.price_range.contains(product.price)
    }
}

/// Run `criteria` over `products`.
///
/// Filtering keeps catalog order; the sort is stable.
#[must_use]
pub fn query(products: &[Product], criteria: &CatalogQuery) -> Vec<Product> {
    let needle = criteria.needle();

    let mut results: Vec<Product> = products
        .iter()
        .filter(|p| criteria.matches_with_needle(p, &needle))
        .cloned()
        .collect();

    sort_products(&mut results, criteria.sort);
    results
}

/// Stable in-place sort by `key`.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Featured => {}
        SortKey::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Name => products.sort_by(|a, b| collate(&a.name, &b.name)),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
    }
}

/// Caseless comparison, falling back to code-point order between strings
/// that differ only in case.
fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// `needle` must already be lowercased; empty matches everything.
fn matches_search(product: &Product, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || product
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use satwa_core::ProductId;

    use super::*;
    use crate::catalog::Catalog;

    fn catalog() -> Vec<Product> {
        Catalog::seed().unwrap().products().to_vec()
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_featured_preserves_input_order() {
        let products = catalog();
        let results = query(&products, &CatalogQuery::new());
        assert_eq!(results, products);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_description_tags() {
        let products = catalog();
        let lower = query(&products, &CatalogQuery::new().search("gold"));
        let upper = query(&products, &CatalogQuery::new().search("GOLD"));

        assert_eq!(ids(&lower), vec![1, 2, 3, 12]);
        assert_eq!(lower, upper);
        for p in &lower {
            let hit = p.name.to_lowercase().contains("gold")
                || p.description.to_lowercase().contains("gold")
                || p.tags.iter().any(|t| t.to_lowercase().contains("gold"));
            assert!(hit, "{} should mention gold", p.name);
        }
    }

    #[test]
    fn test_query_is_deterministic() {
        let products = catalog();
        let criteria = CatalogQuery::new().search("diamond").sort(SortKey::PriceHigh);
        assert_eq!(query(&products, &criteria), query(&products, &criteria));
    }

    #[test]
    fn test_whitespace_search_is_no_filter() {
        let products = catalog();
        assert_eq!(query(&products, &CatalogQuery::new().search("   ")).len(), 12);
    }

    #[test]
    fn test_single_category_filter() {
        let products = catalog();
        let rings = query(&products, &CatalogQuery::new().category(Category::Rings));
        assert_eq!(ids(&rings), vec![4, 8, 12]);

        let all = query(
            &products,
            &CatalogQuery::new().category("all".parse::<CategoryFilter>().unwrap()),
        );
        assert_eq!(all.len(), 12);
    }

    #[test]
    fn test_multi_category_and_material_filters() {
        let products = catalog();
        let criteria = CatalogQuery::new()
            .categories([Category::Earrings, Category::Rings])
            .materials(["18K White Gold", "14K Gold"]);
        assert_eq!(ids(&query(&products, &criteria)), vec![8, 11, 12]);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let products = catalog();
        let criteria = CatalogQuery::new().price_range(
            Price::new(dec!(179.99)),
            Price::new(dec!(299.99)),
        );
        assert_eq!(ids(&query(&products, &criteria)), vec![1, 3, 5, 10]);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let products = catalog();
        let criteria = CatalogQuery::new()
            .search("pearl")
            .category(Category::Rings);
        assert!(query(&products, &criteria).is_empty());
    }

    #[test]
    fn test_sort_price_low_and_high() {
        let products = catalog();
        let low = query(&products, &CatalogQuery::new().sort(SortKey::PriceLow));
        assert_eq!(ids(&low)[..3], [11, 9, 5]);
        let high = query(&products, &CatalogQuery::new().sort(SortKey::PriceHigh));
        assert_eq!(ids(&high)[..3], [7, 12, 2]);
    }

    #[test]
    fn test_sort_name() {
        let products = catalog();
        let sorted = query(&products, &CatalogQuery::new().sort(SortKey::Name));
        let names: Vec<&str> = sorted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"Charm Bracelet"));
        assert_eq!(names.last(), Some(&"Wedding Band"));
    }

    #[test]
    fn test_sort_name_ignores_case() {
        let mut products = catalog();
        products.truncate(2);
        products[0].name = "b".to_string();
        products[1].name = "A".to_string();
        sort_products(&mut products, SortKey::Name);
        assert_eq!(products[0].name, "A");
    }

    #[test]
    fn test_sort_rating_is_stable() {
        let products = catalog();
        let sorted = query(&products, &CatalogQuery::new().sort(SortKey::Rating));
        // 4.9-rated products in catalog order, then the 4.8s in catalog order
        assert_eq!(ids(&sorted)[..6], [2, 7, 12, 1, 4, 8]);
    }

    #[test]
    fn test_sort_newest() {
        let products = catalog();
        let sorted = query(&products, &CatalogQuery::new().sort(SortKey::Newest));
        assert_eq!(sorted.first().map(|p| p.id), Some(ProductId::new(12)));
        assert_eq!(sorted.last().map(|p| p.id), Some(ProductId::new(1)));
    }

    #[test]
    fn test_matches_each_stage() {
        let products = catalog();
        let necklace = products.iter().find(|p| p.id == ProductId::new(1)).unwrap();

        assert!(CatalogQuery::new().matches(necklace));
        assert!(CatalogQuery::new().search("  GOLD ").matches(necklace));
        assert!(!CatalogQuery::new().search("pearl").matches(necklace));
        assert!(!CatalogQuery::new().category(Category::Rings).matches(necklace));
        assert!(!CatalogQuery::new().categories([Category::Rings]).matches(necklace));
        assert!(!CatalogQuery::new().materials(["14K Gold"]).matches(necklace));
        assert!(
            CatalogQuery::new()
                .price_range(Price::new(dec!(299.99)), Price::new(dec!(299.99)))
                .matches(necklace)
        );
        assert!(
            !CatalogQuery::new()
                .price_range(Price::ZERO, Price::new(dec!(299.98)))
                .matches(necklace)
        );
    }

    #[test]
    fn test_name_sort_is_code_point_order_after_case_folding() {
        let mut products = catalog();
        products.truncate(3);
        for (product, name) in products.iter_mut().zip(["Zircon", "Émeraude", "emerald"]) {
            product.name = name.to_string();
        }
        sort_products(&mut products, SortKey::Name);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["emerald", "Zircon", "Émeraude"]);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("price-low".parse::<SortKey>().unwrap(), SortKey::PriceLow);
        assert_eq!("Newest".parse::<SortKey>().unwrap(), SortKey::Newest);
        assert!("cheapest".parse::<SortKey>().is_err());
        assert_eq!(
            serde_json::to_string(&SortKey::PriceHigh).unwrap(),
            "\"price-high\""
        );
    }
}
