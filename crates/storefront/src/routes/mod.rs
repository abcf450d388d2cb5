//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness
//! GET    /health/ready                        - Readiness (Flowhub health)
//!
//! # Catalog
//! GET    /api/products                        - Product listing (category, search, limit, offset)
//! GET    /api/products/categories             - Vendor category names
//! GET    /api/products/{id}                   - Product detail
//! GET    /api/inventory                       - Stock levels (?productId)
//! PUT    /api/inventory                       - Set stock level
//!
//! # Orders
//! GET    /api/orders                          - One order (?orderId) or a listing
//! POST   /api/orders                          - Submit an order (strict rate limit)
//! PATCH  /api/orders                          - Request a status change
//!
//! # Cart (session)
//! GET    /api/cart                            - Cart view
//! DELETE /api/cart                            - Clear cart
//! POST   /api/cart/items                      - Add a product at its catalog price
//! GET    /api/cart/items/{productId}          - Quantity of one product
//! PUT    /api/cart/items/{productId}          - Set quantity (<= 0 removes)
//! DELETE /api/cart/items/{productId}          - Remove a line
//! POST   /api/cart/items/{productId}/increment
//! POST   /api/cart/items/{productId}/decrement
//! POST   /api/cart/checkout                   - Submit the cart (strict rate limit)
//!
//! # Specials
//! GET    /api/specials                        - Current list
//! POST   /api/specials                        - Replace the list
//! GET    /api/specials/rotation               - Rotation step (?index)
//! ```

pub mod cart;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod specials;

use axum::{
    Json, Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::middleware::{api_rate_limiter, order_rate_limiter};
use crate::services::catalog::{Page, Pagination};
use crate::state::AppState;

/// Success body shared by every JSON endpoint.
///
/// Errors use the same shape with `success: false` (see
/// [`AppError`](crate::error::AppError)).
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn page(page: Page<T>) -> Self {
        Self {
            success: true,
            data: page.items,
            pagination: Some(page.pagination),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Create the product routes router.
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/categories", get(products::categories))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
///
/// `/checkout` is registered separately by [`api_routes`] so it can carry
/// the order rate limiter.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{product_id}",
            get(cart::item)
                .put(cart::update_item)
                .delete(cart::remove_item),
        )
        .route("/items/{product_id}/increment", post(cart::increment))
        .route("/items/{product_id}/decrement", post(cart::decrement))
}

/// Create the specials routes router.
pub fn specials_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(specials::list).post(specials::publish))
        .route("/rotation", get(specials::rotation))
}

/// Create the `/api` router.
///
/// Every route gets the relaxed limiter; order submission and cart checkout
/// additionally get the strict one.
pub fn api_routes() -> Router<AppState> {
    let strict = order_rate_limiter();

    Router::new()
        .nest("/products", products_routes())
        .route("/inventory", get(inventory::show).put(inventory::update))
        .route(
            "/orders",
            get(orders::index)
                .patch(orders::update_status)
                .merge(post(orders::submit).layer(strict.clone())),
        )
        .route("/cart/checkout", post(cart::checkout).layer(strict))
        .nest("/cart", cart_routes())
        .nest("/specials", specials_routes())
        .layer(api_rate_limiter())
}
