//! Order commands.

use terp_haus_core::OrderId;
use terp_haus_storefront::services::catalog::{self, OrderFilter, PageParams};

use super::{CliError, flowhub_client, print_json};

/// List orders, optionally filtered by status.
pub async fn list(
    status: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let filter = OrderFilter {
        status,
        page: PageParams { limit, offset },
    };

    let page = catalog::list_orders(&client, filter).await?;
    print_json(&page.items)
}

/// Show one order.
pub async fn get(id: &str) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let order = catalog::get_order(&client, &OrderId::new(id)).await?;
    print_json(&order)
}

/// Ask Flowhub to move an order to `status`.
pub async fn status(id: &str, status: &str) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let order = catalog::update_order_status(&client, &OrderId::new(id), status).await?;
    tracing::info!(order_id = id, status = %order.status, "Order status updated");
    print_json(&order)
}
