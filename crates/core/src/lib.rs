//! Satwa Core - Shared types library.
//!
//! This crate provides the domain records used across all Satwa components:
//! - `storefront` - Cart/wishlist stores, pricing, catalog queries, checkout, mock API
//! - `cli` - Command-line front end over the same stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, emails, products and cart lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
