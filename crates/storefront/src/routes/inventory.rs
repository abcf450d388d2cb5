//! Inventory route handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::Deserialize;
use terp_haus_core::ProductId;
use tracing::instrument;

use super::Envelope;
use crate::error::{AppError, Result};
use crate::flowhub::{Inventory, InventoryUpdate};
use crate::services::catalog;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub product_id: Option<ProductId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdateBody {
    pub product_id: Option<ProductId>,
    pub quantity: Option<f64>,
}

/// Stock for one product (`?productId=`) or for the whole location.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    query: std::result::Result<Query<InventoryQuery>, QueryRejection>,
) -> Result<Envelope<Inventory>> {
    let Query(query) = query?;
    let inventory = catalog::get_inventory(state.flowhub(), query.product_id.as_ref()).await?;
    Ok(Envelope::ok(inventory))
}

/// Set the stock level of a product.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    body: std::result::Result<Json<InventoryUpdateBody>, JsonRejection>,
) -> Result<Envelope<InventoryUpdate>> {
    let Json(body) = body?;
    let (Some(product_id), Some(quantity)) = (body.product_id, body.quantity) else {
        return Err(AppError::Validation(
            "product id and quantity are required".to_string(),
        ));
    };

    let update = catalog::update_inventory(state.flowhub(), &product_id, quantity).await?;
    Ok(Envelope::ok(update))
}
