//! Product and category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use satwa_core::{Category, Price, Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{CatalogQuery, CategoryFilter, CategorySummary, RELATED_LIMIT, SortKey};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Listing query parameters. List-valued parameters are comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub categories: Option<String>,
    pub materials: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub sort: Option<String>,
}

impl ProductsQuery {
    /// Convert raw parameters into a catalog query.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first unparseable parameter.
    pub fn to_catalog_query(&self) -> Result<CatalogQuery> {
        let mut query = CatalogQuery::new();

        if let Some(search) = &self.search {
            query = query.search(search.as_str());
        }
        if let Some(category) = &self.category {
            query = query.category(
                category
                    .parse::<CategoryFilter>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            );
        }
        if let Some(categories) = &self.categories {
            let parsed = split_list(categories)
                .map(str::parse::<Category>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            query = query.categories(parsed);
        }
        if let Some(materials) = &self.materials {
            query = query.materials(split_list(materials));
        }

        let defaults = query.price_range;
        let min = parse_price("min", self.min.as_deref())?.unwrap_or(defaults.min);
        let max = parse_price("max", self.max.as_deref())?.unwrap_or(defaults.max);
        query = query.price_range(min, max);

        if let Some(sort) = &self.sort {
            query = query.sort(
                sort.parse::<SortKey>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            );
        }

        Ok(query)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_price(name: &str, raw: Option<&str>) -> Result<Option<Price>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Price>()
            .map(Some)
            .map_err(|e| AppError::BadRequest(format!("Invalid {name} price: {e}"))),
    }
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid product id: {raw}")))
}

/// List products.
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let query = params.to_catalog_query()?;
    let products = state.catalog().query(&query);
    tracing::debug!(results = products.len(), "Catalog query");
    Ok(Json(products))
}

/// Product detail.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;
    state
        .catalog()
        .product(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Up to four products from the same category.
///
/// GET /api/products/{id}/related
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let id = parse_product_id(&id)?;
    let catalog = state.catalog();
    let product = catalog
        .product(id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(
        catalog
            .related(product, RELATED_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
    ))
}

/// Category menu with counts.
///
/// GET /api/categories
pub async fn categories(State(state): State<AppState>) -> Json<Vec<CategorySummary>> {
    Json(state.catalog().categories())
}
