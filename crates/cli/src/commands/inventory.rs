//! Inventory commands.

use terp_haus_core::ProductId;
use terp_haus_storefront::services::catalog;

use super::{CliError, flowhub_client, print_json};

/// Show stock for one product, or for the whole location.
pub async fn get(product_id: Option<&str>) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let product_id = product_id.map(ProductId::new);
    let inventory = catalog::get_inventory(&client, product_id.as_ref()).await?;
    print_json(&inventory)
}

/// Set the stock level of a product.
pub async fn set(product_id: &str, quantity: f64) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let update = catalog::update_inventory(&client, &ProductId::new(product_id), quantity).await?;
    tracing::info!(product_id, quantity, "Inventory updated");
    print_json(&update)
}
