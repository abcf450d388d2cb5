//! Order route handlers.
//!
//! `POST /api/orders` trusts the line prices sent by the client; Flowhub
//! reprices on its side. Cart checkout (`/api/cart/checkout`) uses the
//! prices locked in the session cart instead.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use terp_haus_core::checkout::OrderSubmission;
use terp_haus_core::{Order, OrderId};
use tracing::instrument;

use super::Envelope;
use crate::error::Result;
use crate::services::catalog::{self, OrderFilter, PageParams};
use crate::services::checkout;
use crate::state::AppState;

/// Query parameters for order lookups.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub order_id: Option<OrderId>,
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateBody {
    pub order_id: Option<OrderId>,
    pub status: Option<String>,
}

/// One order when `orderId` is given, otherwise a filtered listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<OrderListQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query?;

    if let Some(order_id) = query.order_id.filter(|id| !id.is_blank()) {
        let order = catalog::get_order(state.flowhub(), &order_id).await?;
        return Ok(Envelope::ok(order).into_response());
    }

    let filter = OrderFilter {
        status: query.status,
        page: PageParams {
            limit: query.limit,
            offset: query.offset,
        },
    };
    let page = catalog::list_orders(state.flowhub(), filter).await?;
    Ok(Envelope::page(page).into_response())
}

/// Submit an order.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    body: std::result::Result<Json<OrderSubmission>, JsonRejection>,
) -> Result<Envelope<Order>> {
    let Json(submission) = body?;
    let today = chrono::Local::now().date_naive();
    let order = checkout::submit_order(state.flowhub(), submission, today).await?;
    Ok(Envelope::ok(order))
}

/// Ask Flowhub to change an order's status.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    body: std::result::Result<Json<StatusUpdateBody>, JsonRejection>,
) -> Result<Envelope<Order>> {
    let Json(body) = body?;
    let order_id = body.order_id.unwrap_or_else(|| OrderId::new(""));
    let order = catalog::update_order_status(
        state.flowhub(),
        &order_id,
        body.status.as_deref().unwrap_or_default(),
    )
    .await?;
    Ok(Envelope::ok(order))
}
