//! Terp Haus Core - Domain types, cart and checkout rules.
//!
//! This crate provides the pieces shared by every Terp Haus component:
//! - `storefront` - JSON API in front of the Flowhub point-of-sale platform
//! - `cli` - Command-line tools for inventory and order management
//!
//! # Architecture
//!
//! The core crate contains types, pure business rules and storage traits -
//! no HTTP clients and no network access. Anything that talks to Flowhub
//! lives in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, statuses, products and orders
//! - [`cart`] - Cart line items, aggregates, versioned snapshots and the
//!   persisting [`cart::CartStore`]
//! - [`checkout`] - Checkout submission validation (identity, legal age)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod types;

pub use types::*;
