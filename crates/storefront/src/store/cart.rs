//! Cart reducer and store operations.
//!
//! Invariants held by every reachable [`CartState`]:
//! - every line has `quantity >= 1`
//! - at most one line per product id
//! - the subtotal fits a `Decimal`, so totals never overflow

use satwa_core::{CartLineItem, Price, Product, ProductId};
use serde::Serialize;

use super::{Reducer, Store};
use crate::persistence::CART_NAMESPACE;
use crate::pricing::checked_subtotal;

/// Ordered cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CartState {
    lines: Vec<CartLineItem>,
}

impl CartState {
    /// Build a state from arbitrary lines, enforcing the cart invariants.
    ///
    /// Lines with a zero quantity or negative price are dropped; repeated
    /// product ids are merged into the first occurrence. A line that would
    /// push the subtotal past the `Decimal` range is dropped as well.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut state = Self::default();
        for line in lines {
            if line.quantity == 0 || line.price.is_negative() {
                tracing::warn!(product_id = %line.product_id, "Dropping invalid cart line");
                continue;
            }
            let product_id = line.product_id;
            match state.merged(line) {
                Some(next) => state = next,
                None => {
                    tracing::warn!(%product_id, "Dropping cart line, total out of range");
                }
            }
        }
        state
    }

    /// `self` plus `line`, or `None` if the subtotal would overflow.
    fn merged(&self, line: CartLineItem) -> Option<Self> {
        let mut next = self.clone();
        match next.position(line.product_id) {
            Some(i) => {
                let existing = next.lines.get_mut(i)?;
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => next.lines.push(line),
        }
        next.in_range()
    }

    fn in_range(self) -> Option<Self> {
        checked_subtotal(&self.lines).map(|_| self)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `Σ price × quantity`, recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Total units across all lines (badge count), not the number of lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

/// Cart mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add `line.quantity` units, merging into an existing line for the product.
    AddItem(CartLineItem),
    /// Overwrite a line's quantity; below 1 removes the line.
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    /// Delete a line.
    RemoveItem(ProductId),
    /// Empty the cart.
    Clear,
}

/// Reducer for [`CartState`].
#[derive(Debug)]
pub enum CartReducer {}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Snapshot = Vec<CartLineItem>;

    const NAMESPACE: &'static str = CART_NAMESPACE;

    fn reduce(state: &CartState, action: CartAction) -> Option<CartState> {
        match action {
            CartAction::AddItem(mut line) => {
                line.quantity = line.quantity.max(1);
                state.merged(line)
            }
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => {
                if quantity < 1 {
                    return Self::reduce(state, CartAction::RemoveItem(product_id));
                }
                let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                let i = state.position(product_id)?;
                if state.lines.get(i)?.quantity == quantity {
                    return None;
                }
                let mut next = state.clone();
                next.lines.get_mut(i)?.quantity = quantity;
                next.in_range()
            }
            CartAction::RemoveItem(product_id) => {
                let i = state.position(product_id)?;
                let mut next = state.clone();
                next.lines.remove(i);
                Some(next)
            }
            CartAction::Clear => {
                if state.is_empty() {
                    None
                } else {
                    Some(CartState::default())
                }
            }
        }
    }

    fn restore(snapshot: Vec<CartLineItem>) -> CartState {
        CartState::from_lines(snapshot)
    }
}

/// The shopping cart.
pub type CartStore = Store<CartReducer>;

impl Store<CartReducer> {
    /// Add `quantity` units of `product`; 0 is treated as 1.
    ///
    /// The line copies the product's name, price and first image now; an
    /// existing line keeps its original snapshot and only gains quantity.
    pub fn add_item(&self, product: &Product, quantity: u32) {
        let line = CartLineItem::from_product(product, quantity.max(1));
        tracing::debug!(product_id = %product.id, quantity = line.quantity, "Add to cart");
        self.dispatch(CartAction::AddItem(line));
    }

    /// Set a line's quantity. `quantity < 1` removes the line; unknown ids are ignored.
    pub fn update_quantity(&self, product_id: ProductId, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity {
            product_id,
            quantity,
        });
    }

    /// Remove a line; unknown ids are ignored.
    pub fn remove_item(&self, product_id: ProductId) {
        self.dispatch(CartAction::RemoveItem(product_id));
    }

    /// Remove every line.
    pub fn clear_cart(&self) {
        self.dispatch(CartAction::Clear);
    }

    /// Current lines (cloned snapshot).
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.state().lines().to_vec()
    }

    /// `Σ price × quantity`.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.state().total()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.state().count()
    }
}
