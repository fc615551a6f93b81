//! Wishlist commands.

use std::fmt::Write as _;

use clap::Subcommand;
use satwa_core::ProductId;
use satwa_storefront::store::WishlistStore;

use super::{CommandError, Session};

#[derive(Debug, Subcommand)]
pub enum WishlistAction {
    /// List saved products
    Show,
    /// Save a product
    Add { id: ProductId },
    /// Unsave a product
    Remove { id: ProductId },
    /// Save if not saved, unsave otherwise
    Toggle { id: ProductId },
    /// Unsave everything
    Clear,
}

/// Run a wishlist action.
///
/// # Errors
///
/// Returns `CommandError::ProductNotFound` when saving an unknown product.
pub fn run(session: &Session, action: &WishlistAction) -> Result<String, CommandError> {
    let wishlist = session.wishlist();
    match *action {
        WishlistAction::Show => {}
        WishlistAction::Add { id } => wishlist.add_to_wishlist(session.product(id)?),
        WishlistAction::Remove { id } => wishlist.remove_from_wishlist(id),
        WishlistAction::Toggle { id } => {
            let product = session.product(id)?;
            let saved = wishlist.toggle(product);
            let verb = if saved { "Saved" } else { "Removed" };
            return Ok(format!("{verb} {}\n{}", product.name, render(&wishlist)));
        }
        WishlistAction::Clear => wishlist.clear_wishlist(),
    }
    Ok(render(&wishlist))
}

#[must_use]
pub fn render(wishlist: &WishlistStore) -> String {
    let items = wishlist.items();
    if items.is_empty() {
        return "Your wishlist is empty.".to_string();
    }
    let mut out = String::new();
    for product in &items {
        let _ = writeln!(
            out,
            "#{:<3} {:<28} {:>10}",
            product.id.as_i32(),
            product.name,
            product.price.display()
        );
    }
    let _ = write!(out, "{} saved", wishlist.wishlist_count());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::session;

    #[test]
    fn test_toggle_twice() {
        let session = session();
        let id = ProductId::new(5);

        let out = run(&session, &WishlistAction::Toggle { id }).unwrap();
        assert!(out.starts_with("Saved Pearl Necklace"));
        assert!(out.ends_with("1 saved"));

        let out = run(&session, &WishlistAction::Toggle { id }).unwrap();
        assert!(out.starts_with("Removed Pearl Necklace"));
        assert!(out.ends_with("Your wishlist is empty."));
    }

    #[test]
    fn test_add_is_idempotent() {
        let session = session();
        let id = ProductId::new(2);
        run(&session, &WishlistAction::Add { id }).unwrap();
        let out = run(&session, &WishlistAction::Add { id }).unwrap();
        assert!(out.ends_with("1 saved"));
    }

    #[test]
    fn test_remove_absent_and_clear() {
        let session = session();
        run(&session, &WishlistAction::Add { id: ProductId::new(2) }).unwrap();
        let out = run(&session, &WishlistAction::Remove { id: ProductId::new(9) }).unwrap();
        assert!(out.contains("Diamond Stud Earrings"));
        assert_eq!(run(&session, &WishlistAction::Clear).unwrap(), "Your wishlist is empty.");
    }
}
