//! Cart commands.
//!
//! ```bash
//! satwa cart add 1 -q 2
//! satwa cart update 1 3
//! satwa cart show
//! ```

use std::fmt::Write as _;

use clap::Subcommand;
use satwa_core::ProductId;
use satwa_storefront::pricing::PricingRules;
use satwa_storefront::store::CartStore;

use super::{CommandError, Session};

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product (merges with an existing line)
    Add {
        id: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity; zero or less removes it
    Update {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
}

/// Run a cart action and render the resulting cart.
///
/// # Errors
///
/// Returns `CommandError::ProductNotFound` when adding an unknown product.
pub fn run(session: &Session, action: &CartAction) -> Result<String, CommandError> {
    let cart = session.cart();
    match *action {
        CartAction::Show => {}
        CartAction::Add { id, quantity } => {
            let product = session.product(id)?;
            cart.add_item(product, quantity);
            tracing::info!(product_id = %id, quantity, "Added to cart");
        }
        CartAction::Update { id, quantity } => cart.update_quantity(id, quantity),
        CartAction::Remove { id } => cart.remove_item(id),
        CartAction::Clear => cart.clear_cart(),
    }
    Ok(render(&cart, &session.config.pricing))
}

/// Cart lines followed by the totals breakdown.
#[must_use]
pub fn render(cart: &CartStore, pricing: &PricingRules) -> String {
    let items = cart.items();
    if items.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    for line in &items {
        let _ = writeln!(
            out,
            "#{:<3} {:<28} {:>10} x {:<3} {:>10}",
            line.product_id.as_i32(),
            line.name,
            line.price.display(),
            line.quantity,
            line.line_total().display(),
        );
    }

    let totals = pricing.compute_totals(&items);
    let _ = writeln!(out, "{} item(s)", cart.cart_count());
    let _ = writeln!(out, "Subtotal: {}", totals.subtotal.display());
    if totals.has_free_shipping() {
        let _ = writeln!(out, "Shipping: Free");
    } else {
        let _ = writeln!(out, "Shipping: {}", totals.shipping.display());
    }
    let _ = writeln!(out, "Tax:      {}", totals.tax.display());
    let _ = write!(out, "Total:    {}", totals.total.display());
    if let Some(gap) = pricing.amount_until_free_shipping(totals.subtotal) {
        let _ = write!(out, "\nAdd {} more for free shipping.", gap.display());
    }
    out
}
