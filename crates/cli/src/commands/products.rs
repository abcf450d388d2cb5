//! Product catalog commands.

use terp_haus_core::ProductId;
use terp_haus_storefront::services::catalog::{self, PageParams, ProductFilter};

use super::{CliError, flowhub_client, print_json};

/// List products, printing the page and its pagination block.
pub async fn list(
    category: Option<String>,
    search: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let filter = ProductFilter {
        category,
        search,
        page: PageParams { limit, offset },
    };

    let page = catalog::list_products(&client, filter).await?;
    tracing::info!(
        page = page.pagination.page,
        returned = page.pagination.total,
        "Fetched products"
    );
    print_json(&page.items)
}

/// Show one product.
pub async fn get(id: &str) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let product = catalog::get_product(&client, &ProductId::new(id)).await?;
    print_json(&product)
}
