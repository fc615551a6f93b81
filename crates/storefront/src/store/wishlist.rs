//! Wishlist reducer and store operations.
//!
//! The wishlist is a set of saved products keyed by id, kept in the order the
//! products were saved.

use satwa_core::{Product, ProductId};
use serde::Serialize;

use super::{Reducer, Store};
use crate::persistence::WISHLIST_NAMESPACE;

/// Saved products, no duplicate ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WishlistState {
    items: Vec<Product>,
}

impl WishlistState {
    /// Saved products in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Whether `product_id` is saved.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Wishlist mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistAction {
    Add(Box<Product>),
    Remove(ProductId),
    Clear,
}

/// Reducer for [`WishlistState`].
#[derive(Debug)]
pub enum WishlistReducer {}

impl Reducer for WishlistReducer {
    type State = WishlistState;
    type Action = WishlistAction;
    type Snapshot = Vec<Product>;

    const NAMESPACE: &'static str = WISHLIST_NAMESPACE;

    fn reduce(state: &WishlistState, action: WishlistAction) -> Option<WishlistState> {
        match action {
            WishlistAction::Add(product) => {
                if state.contains(product.id) {
                    return None;
                }
                let mut next = state.clone();
                next.items.push(*product);
                Some(next)
            }
            WishlistAction::Remove(product_id) => {
                if !state.contains(product_id) {
                    return None;
                }
                let items = state
                    .items
                    .iter()
                    .filter(|p| p.id != product_id)
                    .cloned()
                    .collect();
                Some(WishlistState { items })
            }
            WishlistAction::Clear => (!state.is_empty()).then(WishlistState::default),
        }
    }

    fn restore(snapshot: Vec<Product>) -> WishlistState {
        let mut state = WishlistState::default();
        for product in snapshot {
            if state.contains(product.id) {
                tracing::warn!(product_id = %product.id, "Dropping duplicate wishlist entry");
                continue;
            }
            state.items.push(product);
        }
        state
    }
}

/// Saved-for-later products.
pub type WishlistStore = Store<WishlistReducer>;

impl Store<WishlistReducer> {
    /// Save `product`; no-op if already saved.
    pub fn add_to_wishlist(&self, product: &Product) {
        self.dispatch(WishlistAction::Add(Box::new(product.clone())));
    }

    /// Unsave a product; unknown ids are ignored.
    pub fn remove_from_wishlist(&self, product_id: ProductId) {
        self.dispatch(WishlistAction::Remove(product_id));
    }

    /// Unsave everything.
    pub fn clear_wishlist(&self) {
        self.dispatch(WishlistAction::Clear);
    }

    /// Remove `product` if saved, save it otherwise. Returns whether it is now saved.
    pub fn toggle(&self, product: &Product) -> bool {
        if self.is_in_wishlist(product.id) {
            self.remove_from_wishlist(product.id);
            false
        } else {
            self.add_to_wishlist(product);
            true
        }
    }

    /// Whether `product_id` is saved.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.state().contains(product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.state().len()
    }

    /// Saved products (cloned snapshot).
    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.state().items().to_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use satwa_core::{Category, Price};

    use super::*;
    use crate::persistence::{MemoryStore, PersistenceAdapter, SnapshotStore};

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Bracelet {id}"),
            price: Price::new(dec!(199.99)),
            original_price: None,
            category: Category::Bracelets,
            material: "14K Rose Gold".to_string(),
            description: String::new(),
            images: vec!["https://img.example/b.jpg".to_string()],
            rating: 4.7,
            reviews: 156,
            in_stock: true,
            featured: false,
            best_seller: true,
            tags: vec!["rose gold".to_string()],
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let wishlist = WishlistStore::default();
        let p = product(3);

        wishlist.add_to_wishlist(&p);
        wishlist.add_to_wishlist(&p);

        assert_eq!(wishlist.wishlist_count(), 1);
        assert!(wishlist.is_in_wishlist(p.id));
    }

    #[test]
    fn test_add_remove_round_trip() {
        let wishlist = WishlistStore::default();
        let p = product(3);

        assert!(!wishlist.is_in_wishlist(p.id));
        wishlist.add_to_wishlist(&p);
        assert!(wishlist.is_in_wishlist(p.id));
        wishlist.remove_from_wishlist(p.id);
        assert!(!wishlist.is_in_wishlist(p.id));
        assert_eq!(wishlist.wishlist_count(), 0);
    }

    #[test]
    fn test_remove_absent_is_no_op() {
        let wishlist = WishlistStore::default();
        wishlist.add_to_wishlist(&product(1));
        assert!(!wishlist.dispatch(WishlistAction::Remove(ProductId::new(42))));
        assert_eq!(wishlist.wishlist_count(), 1);
    }

    #[test]
    fn test_toggle() {
        let wishlist = WishlistStore::default();
        let p = product(5);
        assert!(wishlist.toggle(&p));
        assert!(wishlist.is_in_wishlist(p.id));
        assert!(!wishlist.toggle(&p));
        assert!(!wishlist.is_in_wishlist(p.id));
    }

    #[test]
    fn test_items_keep_insertion_order_then_clear() {
        let wishlist = WishlistStore::default();
        for id in [3, 1, 2] {
            wishlist.add_to_wishlist(&product(id));
        }
        let ids: Vec<i32> = wishlist.items().iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        wishlist.clear_wishlist();
        assert_eq!(wishlist.wishlist_count(), 0);
    }

    #[test]
    fn test_independent_namespace_write_through() {
        let persistence = PersistenceAdapter::in_memory();
        let wishlist = WishlistStore::load(persistence.clone());
        wishlist.add_to_wishlist(&product(8));

        let saved: Vec<Product> = persistence.load(WISHLIST_NAMESPACE).unwrap();
        assert_eq!(saved.len(), 1);
        let cart: Option<Vec<serde_json::Value>> =
            persistence.load(crate::persistence::CART_NAMESPACE);
        assert!(cart.is_none());
    }

    #[test]
    fn test_restore_drops_duplicates() {
        let store = MemoryStore::new();
        let snapshot = serde_json::to_string(&vec![product(1), product(2), product(1)]).unwrap();
        store.write(WISHLIST_NAMESPACE, &snapshot).unwrap();

        let wishlist = WishlistStore::load(PersistenceAdapter::new(store));
        assert_eq!(wishlist.wishlist_count(), 2);
    }
}
