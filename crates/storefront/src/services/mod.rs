//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Products, inventory and order lookups (Flowhub)
//! - `cart` - Session-backed cart storage
//! - `checkout` - Order validation and submission
//! - `customers` - Customer lookup and registration (Flowhub)
//! - `reports` - Sales reports (Flowhub)
//! - `specials` - Published specials list
//!
//! Services that talk to Flowhub are generic over
//! [`Gateway`](crate::flowhub::Gateway) so they can run against a mock.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customers;
pub mod reports;
pub mod specials;
