//! Catalog browsing commands.
//!
//! ```bash
//! satwa products --search gold --sort price-low
//! satwa products --category rings --material "18K White Gold" --max 500
//! satwa product 4
//! ```

use std::fmt::Write as _;

use clap::Args;
use satwa_core::{Category, Price, Product, ProductId};
use satwa_storefront::catalog::{CatalogQuery, CategoryFilter, RELATED_LIMIT, SortKey};

use super::{CommandError, Session};

/// Filters for `satwa products`.
#[derive(Debug, Default, Args)]
pub struct ProductsArgs {
    /// Case-insensitive text matched against name, description and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Single category, or "all"
    #[arg(short, long)]
    pub category: Option<CategoryFilter>,

    /// Restrict to these categories (repeatable)
    #[arg(long = "in", value_name = "CATEGORY")]
    pub categories: Vec<Category>,

    /// Restrict to these materials (repeatable, exact match)
    #[arg(short, long = "material")]
    pub materials: Vec<String>,

    /// Lowest price, inclusive
    #[arg(long)]
    pub min: Option<Price>,

    /// Highest price, inclusive
    #[arg(long)]
    pub max: Option<Price>,

    /// featured, price-low, price-high, name, rating or newest
    #[arg(long, default_value_t = SortKey::Featured)]
    pub sort: SortKey,
}

impl ProductsArgs {
    fn to_query(&self) -> CatalogQuery {
        let defaults = CatalogQuery::new().price_range;
        CatalogQuery::new()
            .search(self.search.clone().unwrap_or_default())
            .category(self.category.unwrap_or_default())
            .categories(self.categories.iter().copied())
            .materials(self.materials.iter().cloned())
            .price_range(
                self.min.unwrap_or(defaults.min),
                self.max.unwrap_or(defaults.max),
            )
            .sort(self.sort)
    }
}

/// List products matching `args`.
///
/// # Errors
///
/// Infallible today; returns `Result` for symmetry with the other commands.
pub fn products(session: &Session, args: &ProductsArgs) -> Result<String, CommandError> {
    let results = session.catalog.query(&args.to_query());
    tracing::debug!(results = results.len(), "Catalog query");

    if results.is_empty() {
        return Ok("No products match your filters.".to_string());
    }

    let mut out = String::new();
    for product in &results {
        let _ = writeln!(out, "{}", product_line(product));
    }
    let _ = write!(out, "{} product(s)", results.len());
    Ok(out)
}

/// Show one product with its related products.
///
/// # Errors
///
/// Returns `CommandError::ProductNotFound` for unknown ids.
pub fn product(session: &Session, id: ProductId) -> Result<String, CommandError> {
    let product = session.product(id)?;
    let wishlisted = session.wishlist().is_in_wishlist(id);

    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "{}", price_label(product));
    let _ = writeln!(
        out,
        "{} | {} | rating {:.1} ({} reviews) | {}",
        product.category.display_name(),
        product.material,
        product.rating,
        product.reviews,
        if product.in_stock { "in stock" } else { "out of stock" },
    );
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    if !product.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", product.tags.join(", "));
    }
    if wishlisted {
        let _ = writeln!(out, "In your wishlist");
    }

    let related = session.catalog.related(product, RELATED_LIMIT);
    if !related.is_empty() {
        let _ = writeln!(out, "\nYou may also like:");
        for other in related {
            let _ = writeln!(out, "{}", product_line(other));
        }
    }
    Ok(out.trim_end().to_string())
}

fn price_label(product: &Product) -> String {
    match product.original_price {
        Some(original) if product.discount_percentage() > 0 => format!(
            "{} (was {}, {}% off)",
            product.price.display(),
            original.display(),
            product.discount_percentage()
        ),
        _ => product.price.display(),
    }
}

fn product_line(product: &Product) -> String {
    format!(
        "#{:<3} {:<28} {:>10}  {:<10} {:.1}",
        product.id.as_i32(),
        product.name,
        product.price.display(),
        product.category.as_str(),
        product.rating,
    )
}
