//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::routes::orders::OrderRecord;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, configuration and the in-memory order book.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: RwLock<HashMap<Uuid, OrderRecord>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Record a placed order.
    pub fn insert_order(&self, order: OrderRecord) {
        self.inner
            .orders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order.order_id, order);
    }

    /// Look up a placed order.
    #[must_use]
    pub fn order(&self, order_id: Uuid) -> Option<OrderRecord> {
        self.inner
            .orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&order_id)
            .cloned()
    }
}
