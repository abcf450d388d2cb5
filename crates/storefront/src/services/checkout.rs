//! Order submission.
//!
//! Validation runs entirely before the network: a rejected submission never
//! reaches Flowhub. There are no retries.

use chrono::NaiveDate;
use terp_haus_core::Order;
use terp_haus_core::checkout::{OrderSubmission, validate};
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::flowhub::conversions::convert_order;
use crate::flowhub::{CreateOrderRequest, Gateway};

/// Validate a submission against `today` and create the order in Flowhub.
///
/// # Errors
///
/// Returns `Validation` with the first failed rule, or `Gateway` with
/// `order creation failed: <upstream message>` if Flowhub rejects the order.
#[instrument(skip_all)]
pub async fn submit_order<G: Gateway>(
    gateway: &G,
    submission: OrderSubmission,
    today: NaiveDate,
) -> Result<Order> {
    let draft = validate(submission, today)?;
    let request = CreateOrderRequest::from(draft);

    let response = gateway.create_order(&request).await;
    if !response.success {
        warn!(error = response.error_message(), "Flowhub rejected order");
        return Err(AppError::Gateway(format!(
            "order creation failed: {}",
            response.error_message()
        )));
    }

    let order = response.data.map(convert_order).ok_or_else(|| {
        AppError::Gateway("order creation failed: empty response".to_string())
    })?;

    info!(
        order_id = %order.id,
        order_number = %order.order_number,
        lines = order.items.len(),
        "Order created"
    );
    Ok(order)
}
