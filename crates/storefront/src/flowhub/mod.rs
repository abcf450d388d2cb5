//! Flowhub point-of-sale API gateway.
//!
//! # Architecture
//!
//! - Flowhub is the source of truth for products, inventory and orders.
//!   Nothing is cached or stored locally; every call goes upstream.
//! - Every gateway call resolves to an [`ApiResponse`] envelope. Transport
//!   failures (non-success status, network error, timeout, malformed body)
//!   become `success: false` with a message; nothing panics.
//! - [`Gateway`] is the seam between services and the HTTP client, so
//!   services can be exercised without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use terp_haus_storefront::flowhub::{FlowhubClient, Gateway, ProductQuery};
//!
//! let client = FlowhubClient::new(&config.flowhub)?;
//! let response = client.list_products(&ProductQuery::default()).await;
//! if response.success {
//!     println!("{} products", response.data.unwrap_or_default().len());
//! }
//! ```

mod client;
pub mod conversions;
#[cfg(test)]
pub mod mock;
pub mod types;

use std::future::Future;

pub use client::FlowhubClient;
pub use types::*;

use serde::{Deserialize, Serialize};
use terp_haus_core::{CustomerId, OrderId, OrderStatus, ProductId};
use thiserror::Error;

/// Errors that can occur when talking to Flowhub.
#[derive(Debug, Error)]
pub enum FlowhubError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Flowhub answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Client construction failed.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl FlowhubError {
    /// Upstream status code, if Flowhub answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Uniform result envelope for gateway calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Upstream status of a failed call; not part of the wire shape.
    #[serde(skip)]
    pub upstream_status: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// Successful call; `data` is `None` when Flowhub returned an empty body.
    #[must_use]
    pub const fn ok(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            upstream_status: None,
        }
    }

    /// Failed call.
    #[must_use]
    pub fn failure(message: impl Into<String>, upstream_status: Option<u16>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            upstream_status,
        }
    }

    /// Collapse a client result into the envelope.
    #[must_use]
    pub fn from_result(result: Result<Option<T>, FlowhubError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(err.to_string(), err.status()),
        }
    }

    /// Whether the upstream reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        if self.success {
            self.data.is_none()
        } else {
            self.upstream_status == Some(404)
        }
    }

    /// Error message of a failed call.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

/// Operations the storefront needs from Flowhub.
///
/// Implemented by [`FlowhubClient`] for real traffic and by the in-crate mock
/// for service tests.
pub trait Gateway: Send + Sync {
    /// `GET /products`
    fn list_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = ApiResponse<Vec<FlowhubProduct>>> + Send;

    /// `GET /products/{id}`
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = ApiResponse<FlowhubProduct>> + Send;

    /// `GET /products/categories`
    fn product_categories(&self) -> impl Future<Output = ApiResponse<Vec<String>>> + Send;

    /// `GET /inventory` or `GET /inventory/{productId}`
    fn get_inventory(
        &self,
        product_id: Option<&ProductId>,
    ) -> impl Future<Output = ApiResponse<Inventory>> + Send;

    /// `PUT /inventory/{productId}`
    fn update_inventory(
        &self,
        product_id: &ProductId,
        quantity: f64,
    ) -> impl Future<Output = ApiResponse<InventoryUpdate>> + Send;

    /// `POST /orders`
    fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = ApiResponse<FlowhubOrder>> + Send;

    /// `GET /orders/{id}`
    fn get_order(&self, id: &OrderId) -> impl Future<Output = ApiResponse<FlowhubOrder>> + Send;

    /// `GET /orders`
    fn list_orders(
        &self,
        query: &OrderQuery,
    ) -> impl Future<Output = ApiResponse<Vec<FlowhubOrder>>> + Send;

    /// `PATCH /orders/{id}`
    fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> impl Future<Output = ApiResponse<FlowhubOrder>> + Send;

    /// `GET /customers/{id}`
    fn get_customer(&self, id: &CustomerId) -> impl Future<Output = ApiResponse<CustomerRecord>> + Send;

    /// `POST /customers`
    fn create_customer(
        &self,
        customer: &FlowhubCustomer,
    ) -> impl Future<Output = ApiResponse<CustomerCreated>> + Send;

    /// `GET /reports/sales`
    fn sales_report(
        &self,
        query: &SalesReportQuery,
    ) -> impl Future<Output = ApiResponse<SalesReport>> + Send;

    /// `GET /health`
    fn health_check(&self) -> impl Future<Output = ApiResponse<HealthStatus>> + Send;
}
