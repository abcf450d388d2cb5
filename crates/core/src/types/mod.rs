//! Core types for Terp Haus.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use category::{ConsumptionMethod, ProductCategory};
pub use id::*;
pub use order::{CustomerInfo, Order, OrderLine, Special};
pub use price::{Price, PriceError};
pub use product::{Product, ProductImage, TerpeneProfile};
pub use status::OrderStatus;
