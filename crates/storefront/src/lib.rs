//! Satwa storefront library.
//!
//! Client-side state and rules for the Satwa jewellery shop, plus the mock
//! HTTP API that serves the catalog and accepts orders:
//!
//! - [`store`]: cart and wishlist reducers with write-through persistence
//! - [`persistence`]: namespaced JSON snapshots (file or in-memory)
//! - [`pricing`]: subtotal, shipping, tax and total
//! - [`catalog`]: seed catalog and the search/filter/sort engine
//! - [`checkout`]: form validation and the order submission state machine
//! - [`routes`]: axum handlers for `/api`
//! - [`middleware`]: request IDs and HTTP tracing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod persistence;
pub mod pricing;
pub mod routes;
pub mod state;
pub mod store;
