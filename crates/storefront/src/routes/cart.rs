//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Prices are taken from the
//! catalog when a product is added and stay locked on that line.

use std::num::NonZeroU32;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use terp_haus_core::cart::Cart;
use terp_haus_core::checkout::{CustomerSubmission, OrderSubmission};
use terp_haus_core::{Order, ProductId};
use tower_sessions::Session;
use tracing::{info, instrument};

use super::Envelope;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::cart::open_cart;
use crate::services::{catalog, checkout as order_checkout};
use crate::state::AppState;

/// Body for adding a product.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemBody {
    pub product_id: Option<ProductId>,
    /// Defaults to 1.
    pub quantity: Option<i64>,
}

/// Body for setting a line's quantity.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemBody {
    pub quantity: Option<i64>,
}

/// Body for checking out the session cart.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    #[serde(default)]
    pub customer: Option<CustomerSubmission>,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Quantity of one product in the cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuantity {
    pub quantity: u32,
    pub in_cart: bool,
}

fn product_id(path: std::result::Result<Path<String>, PathRejection>) -> Result<ProductId> {
    let Path(raw) = path?;
    let id = ProductId::new(raw);
    if id.is_blank() {
        return Err(AppError::Validation("product id required".to_string()));
    }
    Ok(id)
}

fn quantity_from(raw: i64) -> Result<u32> {
    u32::try_from(raw).map_err(|_| AppError::Validation("quantity is too large".to_string()))
}

/// Cart view.
#[instrument(skip_all)]
pub async fn show(session: Session) -> Result<Envelope<Cart>> {
    let cart = open_cart(session).await?;
    Ok(Envelope::ok(cart.into_cart()))
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(session: Session) -> Result<Envelope<Cart>> {
    let mut cart = open_cart(session).await?;
    cart.clear().await?;
    add_breadcrumb("cart", "Cart cleared", None);
    Ok(Envelope::ok(cart.into_cart()))
}

/// Add a product at its current catalog price.
#[instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    body: std::result::Result<Json<AddItemBody>, JsonRejection>,
) -> Result<Envelope<Cart>> {
    let Json(body) = body?;
    let product_id = body
        .product_id
        .filter(|id| !id.is_blank())
        .ok_or_else(|| AppError::Validation("product id required".to_string()))?;
    let quantity = NonZeroU32::new(quantity_from(body.quantity.unwrap_or(1).max(0))?)
        .ok_or_else(|| AppError::Validation("quantity must be at least 1".to_string()))?;

    let product = catalog::get_product(state.flowhub(), &product_id).await?;

    let mut cart = open_cart(session).await?;
    cart.add_item(product, quantity).await?;

    let quantity = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Item added",
        Some(&[("product_id", product_id.as_str()), ("quantity", quantity.as_str())]),
    );
    Ok(Envelope::ok(cart.into_cart()))
}

/// Quantity of one product.
#[instrument(skip(session))]
pub async fn item(
    session: Session,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Envelope<ItemQuantity>> {
    let product_id = product_id(path)?;
    let cart = open_cart(session).await?;
    Ok(Envelope::ok(ItemQuantity {
        quantity: cart.item_quantity(&product_id),
        in_cart: cart.is_in_cart(&product_id),
    }))
}

/// Set a line's quantity; zero or less removes the line.
#[instrument(skip(session))]
pub async fn update_item(
    session: Session,
    path: std::result::Result<Path<String>, PathRejection>,
    body: std::result::Result<Json<UpdateItemBody>, JsonRejection>,
) -> Result<Envelope<Cart>> {
    let product_id = product_id(path)?;
    let Json(body) = body?;
    let quantity = body
        .quantity
        .ok_or_else(|| AppError::Validation("quantity required".to_string()))?;

    let mut cart = open_cart(session).await?;
    cart.update_quantity(&product_id, quantity_from(quantity.max(0))?)
        .await?;
    Ok(Envelope::ok(cart.into_cart()))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove_item(
    session: Session,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Envelope<Cart>> {
    let product_id = product_id(path)?;
    let mut cart = open_cart(session).await?;
    cart.remove_item(&product_id).await?;
    add_breadcrumb(
        "cart",
        "Item removed",
        Some(&[("product_id", product_id.as_str())]),
    );
    Ok(Envelope::ok(cart.into_cart()))
}

/// Add one unit to an existing line.
#[instrument(skip(session))]
pub async fn increment(
    session: Session,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Envelope<Cart>> {
    let product_id = product_id(path)?;
    let mut cart = open_cart(session).await?;
    cart.increment_quantity(&product_id).await?;
    Ok(Envelope::ok(cart.into_cart()))
}

/// Take one unit off a line, removing it at zero.
#[instrument(skip(session))]
pub async fn decrement(
    session: Session,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Envelope<Cart>> {
    let product_id = product_id(path)?;
    let mut cart = open_cart(session).await?;
    cart.decrement_quantity(&product_id).await?;
    Ok(Envelope::ok(cart.into_cart()))
}

/// Submit the session cart as an order.
///
/// The cart is cleared only after Flowhub accepts the order.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    body: std::result::Result<Json<CheckoutBody>, JsonRejection>,
) -> Result<Envelope<Order>> {
    let Json(body) = body?;
    let mut cart = open_cart(session).await?;

    let submission =
        OrderSubmission::from_cart(cart.cart(), body.customer, body.pickup_time, body.notes);
    let today = chrono::Local::now().date_naive();
    let order = order_checkout::submit_order(state.flowhub(), submission, today).await?;

    cart.clear().await?;
    info!(order_id = %order.id, "Cart checked out");
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));
    Ok(Envelope::ok(order))
}
