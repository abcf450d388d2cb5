//! Catalog, inventory and order lookups through the Flowhub gateway.
//!
//! Each function turns a gateway [`ApiResponse`] into a domain value or an
//! [`AppError`]:
//!
//! - failed call with upstream 404, or success with an empty body: `NotFound`
//! - any other failed call: `Gateway` with the upstream message
//! - failed list calls never degrade to an empty list

use serde::{Deserialize, Serialize};
use terp_haus_core::{Order, OrderId, OrderStatus, Product, ProductId};
use tracing::{instrument, warn};

use crate::error::{AppError, Result};
use crate::flowhub::conversions::{convert_order, convert_product};
use crate::flowhub::{
    ApiResponse, DEFAULT_LIMIT, Gateway, HealthStatus, Inventory, InventoryUpdate, OrderQuery,
    ProductQuery,
};

/// Pagination block attached to list responses.
///
/// Flowhub does not report a total count, so `total` is the number of
/// records returned for this page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// `limit` must be non-zero; callers validate it first.
    #[must_use]
    pub fn new(offset: u32, limit: u32, returned: usize) -> Self {
        let limit = limit.max(1);
        let total = u32::try_from(returned).unwrap_or(u32::MAX);
        Self {
            page: (offset / limit).saturating_add(1),
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Raw paging parameters as received on the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageParams {
    /// Resolve defaults and reject a zero limit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when `limit` is 0.
    pub fn resolve(self) -> Result<(u32, u32)> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(AppError::Validation("limit must be at least 1".to_string()));
        }
        Ok((limit, self.offset.unwrap_or(0)))
    }
}

/// Filters for product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: PageParams,
}

/// Filters for order listing.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub page: PageParams,
}

/// Unwrap a single-record response.
pub(crate) fn require<T>(response: ApiResponse<T>, missing: &str) -> Result<T> {
    if response.is_not_found() {
        return Err(AppError::NotFound(missing.to_string()));
    }
    if !response.success {
        return Err(AppError::Gateway(response.error_message().to_string()));
    }
    response
        .data
        .ok_or_else(|| AppError::NotFound(missing.to_string()))
}

/// Unwrap a list response; an empty body is an empty list.
fn require_list<T>(response: ApiResponse<Vec<T>>) -> Result<Vec<T>> {
    if !response.success {
        return Err(AppError::Gateway(response.error_message().to_string()));
    }
    Ok(response.data.unwrap_or_default())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// List products with optional category and search filters.
///
/// # Errors
///
/// Returns `Validation` for a zero limit and `Gateway` if Flowhub fails.
#[instrument(skip(gateway))]
pub async fn list_products<G: Gateway>(gateway: &G, filter: ProductFilter) -> Result<Page<Product>> {
    let (limit, offset) = filter.page.resolve()?;
    let query = ProductQuery {
        category: non_blank(filter.category),
        limit,
        offset,
        search: non_blank(filter.search),
    };

    let items: Vec<Product> = require_list(gateway.list_products(&query).await)?
        .into_iter()
        .map(convert_product)
        .collect();
    let pagination = Pagination::new(offset, limit, items.len());

    Ok(Page { items, pagination })
}

/// Fetch one product.
///
/// # Errors
///
/// Returns `Validation` for a blank id, `NotFound` if Flowhub has no such
/// product and `Gateway` for other failures.
#[instrument(skip(gateway))]
pub async fn get_product<G: Gateway>(gateway: &G, id: &ProductId) -> Result<Product> {
    if id.is_blank() {
        return Err(AppError::Validation("product id required".to_string()));
    }
    require(gateway.get_product(id).await, "product not found").map(convert_product)
}

/// Vendor category names, passed through as-is.
///
/// # Errors
///
/// Returns `Gateway` if Flowhub fails.
pub async fn product_categories<G: Gateway>(gateway: &G) -> Result<Vec<String>> {
    require_list(gateway.product_categories().await)
}

/// Stock for one product, or for all products.
///
/// # Errors
///
/// Returns `NotFound` for an unknown product and `Gateway` for other failures.
#[instrument(skip(gateway))]
pub async fn get_inventory<G: Gateway>(gateway: &G, product_id: Option<&ProductId>) -> Result<Inventory> {
    let product_id = product_id.filter(|id| !id.is_blank());
    let response = gateway.get_inventory(product_id).await;
    match product_id {
        Some(_) => require(response, "inventory not found"),
        None if !response.success => Err(AppError::Gateway(response.error_message().to_string())),
        None => Ok(response.data.unwrap_or(Inventory::Many(Vec::new()))),
    }
}

/// Set the stock level of a product.
///
/// # Errors
///
/// Returns `Validation` for a blank id or a negative or non-finite quantity,
/// and `Gateway` if Flowhub fails.
#[instrument(skip(gateway))]
pub async fn update_inventory<G: Gateway>(
    gateway: &G,
    product_id: &ProductId,
    quantity: f64,
) -> Result<InventoryUpdate> {
    if product_id.is_blank() {
        return Err(AppError::Validation("product id required".to_string()));
    }
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(AppError::Validation(
            "quantity must be a non-negative number".to_string(),
        ));
    }

    let response = gateway.update_inventory(product_id, quantity).await;
    if !response.success {
        return Err(AppError::Gateway(response.error_message().to_string()));
    }
    Ok(response.data.unwrap_or(InventoryUpdate { success: true }))
}

/// List orders, optionally filtered by status.
///
/// # Errors
///
/// Returns `Validation` for a zero limit or unknown status and `Gateway` if
/// Flowhub fails.
#[instrument(skip(gateway))]
pub async fn list_orders<G: Gateway>(gateway: &G, filter: OrderFilter) -> Result<Page<Order>> {
    let (limit, offset) = filter.page.resolve()?;
    let status = non_blank(filter.status)
        .map(|raw| parse_status(&raw))
        .transpose()?;
    let query = OrderQuery {
        status,
        limit,
        offset,
    };

    let items: Vec<Order> = require_list(gateway.list_orders(&query).await)?
        .into_iter()
        .map(convert_order)
        .collect();
    let pagination = Pagination::new(offset, limit, items.len());

    Ok(Page { items, pagination })
}

/// Fetch one order.
///
/// # Errors
///
/// Returns `NotFound` if Flowhub has no such order and `Gateway` for other
/// failures.
#[instrument(skip(gateway))]
pub async fn get_order<G: Gateway>(gateway: &G, id: &OrderId) -> Result<Order> {
    if id.is_blank() {
        return Err(AppError::Validation("order id required".to_string()));
    }
    require(gateway.get_order(id).await, "order not found").map(convert_order)
}

/// Ask Flowhub to move an order to `status`.
///
/// Only known statuses may be requested; Flowhub decides whether the
/// transition is allowed.
///
/// # Errors
///
/// Returns `Validation` for a blank id or unknown status, `NotFound` for an
/// unknown order and `Gateway` for other failures.
#[instrument(skip(gateway))]
pub async fn update_order_status<G: Gateway>(gateway: &G, id: &OrderId, status: &str) -> Result<Order> {
    if id.is_blank() || status.trim().is_empty() {
        return Err(AppError::Validation(
            "order id and status are required".to_string(),
        ));
    }
    let status = parse_status(status)?;
    require(gateway.update_order_status(id, &status).await, "order not found").map(convert_order)
}

/// Flowhub health, for the readiness probe.
///
/// # Errors
///
/// Returns `Gateway` if Flowhub is unreachable or unhealthy.
pub async fn health<G: Gateway>(gateway: &G) -> Result<HealthStatus> {
    let response = gateway.health_check().await;
    if !response.success {
        warn!(error = response.error_message(), "Flowhub health check failed");
        return Err(AppError::Gateway(response.error_message().to_string()));
    }
    Ok(response.data.unwrap_or(HealthStatus {
        status: "ok".to_string(),
        timestamp: None,
    }))
}

fn parse_status(raw: &str) -> Result<OrderStatus> {
    raw.trim().parse::<OrderStatus>().map_err(AppError::Validation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flowhub::mock::{MockGateway, flowhub_order, flowhub_product};

    fn page(limit: u32, offset: u32) -> PageParams {
        PageParams {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(20, 10, 10);
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 10);
        assert_eq!(p.total, 10);
        assert_eq!(p.total_pages, 1);

        let p = Pagination::new(0, 20, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);

        let p = Pagination::new(5, 4, 7);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn test_pagination_at_max_offset_saturates() {
        let p = Pagination::new(u32::MAX, 1, 0);
        assert_eq!(p.page, u32::MAX);
        assert_eq!(p.total_pages, 0);

        let p = Pagination::new(u32::MAX, 20, 0);
        assert_eq!(p.page, u32::MAX / 20 + 1);
    }

    #[test]
    fn test_page_params_defaults_and_zero_limit() {
        assert_eq!(PageParams::default().resolve().unwrap(), (20, 0));
        assert!(matches!(
            page(0, 0).resolve(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_products_paginates() {
        let products = (0..30)
            .map(|i| flowhub_product(&format!("p{i}"), "flower", 1000))
            .collect();
        let gateway = MockGateway::new().with_products(products);

        let filter = ProductFilter {
            page: page(10, 20),
            ..ProductFilter::default()
        };
        let result = list_products(&gateway, filter).await.unwrap();

        assert_eq!(result.items.len(), 10);
        assert_eq!(result.items[0].id.as_str(), "p20");
        assert_eq!(result.pagination.page, 3);
        assert_eq!(result.pagination.total, 10);
    }

    #[tokio::test]
    async fn test_list_products_gateway_failure() {
        let gateway = MockGateway::new().failing("HTTP 500: upstream down", Some(500));

        let result = list_products(&gateway, ProductFilter::default()).await;

        match result {
            Err(AppError::Gateway(msg)) => assert_eq!(msg, "HTTP 500: upstream down"),
            other => panic!("expected gateway error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_call() {
        let gateway = MockGateway::new();
        let filter = ProductFilter {
            page: page(0, 0),
            ..ProductFilter::default()
        };

        assert!(list_products(&gateway, filter).await.is_err());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let gateway = MockGateway::new().with_products(vec![flowhub_product("p1", "flower", 100)]);

        let found = get_product(&gateway, &ProductId::new("p1")).await.unwrap();
        assert_eq!(found.name, "Product p1");

        let missing = get_product(&gateway, &ProductId::new("nope")).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_order_empty_body_is_not_found() {
        let gateway = MockGateway::new();
        let result = get_order(&gateway, &OrderId::new("o-404")).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "order not found"));
    }

    #[tokio::test]
    async fn test_update_inventory_validates_quantity() {
        let gateway = MockGateway::new();
        let id = ProductId::new("p1");

        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                update_inventory(&gateway, &id, bad).await,
                Err(AppError::Validation(_))
            ));
        }
        assert_eq!(gateway.call_count(), 0);

        let ok = update_inventory(&gateway, &id, 12.0).await.unwrap();
        assert!(ok.success);
        assert_eq!(gateway.calls(), vec!["update_inventory"]);
    }

    #[tokio::test]
    async fn test_update_order_status_rejects_unknown_status() {
        let gateway = MockGateway::new().with_orders(vec![flowhub_order("o1", "pending")]);

        let result = update_order_status(&gateway, &OrderId::new("o1"), "shipped").await;
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("shipped")));
        assert_eq!(gateway.call_count(), 0);

        let order = update_order_status(&gateway, &OrderId::new("o1"), "ready")
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[tokio::test]
    async fn test_list_orders_filters_by_status() {
        let gateway = MockGateway::new().with_orders(vec![
            flowhub_order("o1", "pending"),
            flowhub_order("o2", "ready"),
            flowhub_order("o3", "ready"),
        ]);

        let filter = OrderFilter {
            status: Some("ready".to_string()),
            page: PageParams::default(),
        };
        let result = list_orders(&gateway, filter).await.unwrap();

        assert_eq!(result.items.len(), 2);
        assert!(result.items.iter().all(|o| o.status == OrderStatus::Ready));
        assert_eq!(result.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn test_inventory_single_product() {
        let gateway = MockGateway::new().with_products(vec![flowhub_product("p1", "flower", 100)]);

        let inventory = get_inventory(&gateway, Some(&ProductId::new("p1"))).await.unwrap();
        assert!(matches!(inventory, Inventory::One(level) if level.in_stock));

        let missing = get_inventory(&gateway, Some(&ProductId::new("zz"))).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
