//! Command implementations.
//!
//! Every command works against a [`Session`] and returns the text to print,
//! so `main` owns all terminal output.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use satwa_core::{Product, ProductId};
use satwa_storefront::catalog::{Catalog, CatalogError};
use satwa_storefront::checkout::{CheckoutErrors, OrderServiceError};
use satwa_storefront::config::{ConfigError, StorefrontConfig};
use satwa_storefront::persistence::{FileStore, PersistenceAdapter, PersistenceError};
use satwa_storefront::store::{CartStore, WishlistStore};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Order service error: {0}")]
    OrderService(#[from] OrderServiceError),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Please fix the checkout form: {0}")]
    InvalidForm(CheckoutErrors),

    #[error("{0}")]
    CheckoutFailed(String),
}

/// Configuration, catalog and file-backed stores for one invocation.
pub struct Session {
    pub config: StorefrontConfig,
    pub catalog: Catalog,
    persistence: PersistenceAdapter,
}

impl Session {
    /// Load configuration from the environment and open the data directory.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the data directory
    /// cannot be created.
    pub fn open() -> Result<Self, CommandError> {
        let config = StorefrontConfig::from_env()?;
        let store = FileStore::open(&config.data_dir)?;
        tracing::debug!(dir = %store.dir().display(), "Opened data directory");
        Ok(Self::new(config, Catalog::seed()?, PersistenceAdapter::new(store)))
    }

    #[must_use]
    pub const fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        persistence: PersistenceAdapter,
    ) -> Self {
        Self {
            config,
            catalog,
            persistence,
        }
    }

    /// Cart restored from the data directory.
    #[must_use]
    pub fn cart(&self) -> CartStore {
        CartStore::load(self.persistence.clone())
    }

    /// Wishlist restored from the data directory.
    #[must_use]
    pub fn wishlist(&self) -> WishlistStore {
        WishlistStore::load(self.persistence.clone())
    }

    /// Catalog product by id.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ProductNotFound` for unknown ids.
    pub fn product(&self, id: ProductId) -> Result<&Product, CommandError> {
        self.catalog
            .product(id)
            .ok_or(CommandError::ProductNotFound(id))
    }
}
