//! Product route handlers.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use terp_haus_core::{Product, ProductId};
use tracing::instrument;

use super::Envelope;
use crate::error::Result;
use crate::services::catalog::{self, PageParams, ProductFilter};
use crate::state::AppState;

/// Query parameters for product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<ProductListQuery> for ProductFilter {
    fn from(query: ProductListQuery) -> Self {
        Self {
            category: query.category,
            search: query.search,
            page: PageParams {
                limit: query.limit,
                offset: query.offset,
            },
        }
    }
}

/// Product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<Envelope<Vec<Product>>> {
    let Query(query) = query?;
    let page = catalog::list_products(state.flowhub(), query.into()).await?;
    Ok(Envelope::page(page))
}

/// Vendor category names.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Envelope<Vec<String>>> {
    Ok(Envelope::ok(catalog::product_categories(state.flowhub()).await?))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
) -> Result<Envelope<Product>> {
    let Path(id) = id?;
    let product = catalog::get_product(state.flowhub(), &ProductId::new(id)).await?;
    Ok(Envelope::ok(product))
}
