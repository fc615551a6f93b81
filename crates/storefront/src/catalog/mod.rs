//! Product catalog.
//!
//! The catalog is a read-only list of [`Product`]s, loaded once at startup
//! from the bundled seed data (or any JSON array of products) and validated
//! before use. Listings go through [`query`]; lookups by id, category and
//! merchandising flag live on [`Catalog`].

mod query;

pub use query::{
    CatalogQuery, CategoryFilter, ParseSortKeyError, PriceRange, SortKey, query, sort_products,
};

use std::collections::HashSet;
use std::sync::Arc;

use satwa_core::{Category, InvalidProduct, Product, ProductId};
use serde::Serialize;
use thiserror::Error;

/// Bundled catalog data.
const SEED: &str = include_str!("seed.json");

/// Default number of related products shown on a product page.
pub const RELATED_LIMIT: usize = 4;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidProduct(#[from] InvalidProduct),

    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// One entry of the category menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// `"all"` or a [`Category`] identifier.
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Immutable product list. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog, rejecting invalid products and repeated ids.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidProduct`] or duplicate id found.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self {
            products: products.into(),
        })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any product is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// The bundled twelve-product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data is corrupt.
    pub fn seed() -> Result<Self, CatalogError> {
        Self::from_json(SEED)
    }

    /// Every product, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Run a search/filter/sort over the catalog.
    #[must_use]
    pub fn query(&self, criteria: &CatalogQuery) -> Vec<Product> {
        query(&self.products, criteria)
    }

    /// Products in `category`, catalog order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Products flagged for the home page.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    pub fn best_sellers(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.best_seller)
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.by_category(product.category)
            .filter(|p| p.id != product.id)
            .take(limit)
            .collect()
    }

    /// Category menu: `"all"` first, then each category with its product count.
    #[must_use]
    pub fn categories(&self) -> Vec<CategorySummary> {
        let all = CategorySummary {
            id: CategoryFilter::ALL_SENTINEL.to_string(),
            name: "All Products".to_string(),
            count: self.len(),
        };
        std::iter::once(all)
            .chain(Category::ALL.into_iter().map(|category| CategorySummary {
                id: category.as_str().to_string(),
                name: category.display_name().to_string(),
                count: self.by_category(category).count(),
            }))
            .collect()
    }

    /// Distinct materials in first-seen order.
    #[must_use]
    pub fn materials(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.material.as_str())
            .filter(|m| seen.insert(*m))
            .collect()
    }
}
