//! Flowhub wire types.
//!
//! These mirror Flowhub's JSON exactly (camelCase, loose optionals). Domain
//! types live in `terp-haus-core`; see [`super::conversions`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use terp_haus_core::checkout::{OrderDraft, VerifiedCustomer};
use terp_haus_core::{CustomerId, ImageId, OrderId, OrderStatus, Price, ProductId};

/// Default page size for list calls.
pub const DEFAULT_LIMIT: u32 = 20;

// =============================================================================
// Products
// =============================================================================

/// A product record from `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowhubProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub price: Price,
    pub unit: String,
    #[serde(default)]
    pub thc: Option<f64>,
    #[serde(default)]
    pub cbd: Option<f64>,
    #[serde(default)]
    pub terpenes: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub images: Option<Vec<FlowhubImage>>,
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowhubImage {
    pub id: ImageId,
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Query for `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub search: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            search: None,
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock level for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub quantity: f64,
    pub in_stock: bool,
}

/// `GET /inventory/{id}` answers with one level, `GET /inventory` with many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inventory {
    One(InventoryLevel),
    Many(Vec<InventoryLevel>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateInventoryRequest {
    pub quantity: f64,
}

/// Acknowledgement of `PUT /inventory/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    #[serde(default)]
    pub success: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// An order record from `GET /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowhubOrder {
    pub id: OrderId,
    pub order_number: String,
    pub items: Vec<FlowhubOrderItem>,
    pub customer: FlowhubCustomer,
    pub status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowhubOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

/// Customer details on an order; also the body of `POST /customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowhubCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<FlowhubOrderItem>,
    pub customer: FlowhubCustomer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<OrderDraft> for CreateOrderRequest {
    fn from(draft: OrderDraft) -> Self {
        Self {
            items: draft
                .lines
                .into_iter()
                .map(|line| FlowhubOrderItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
            customer: draft.customer.into(),
            pickup_time: draft.pickup_time,
            notes: draft.notes,
        }
    }
}

impl From<VerifiedCustomer> for FlowhubCustomer {
    fn from(customer: VerifiedCustomer) -> Self {
        Self {
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone: customer.phone,
            date_of_birth: customer.date_of_birth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Query for `GET /orders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

// =============================================================================
// Customers
// =============================================================================

/// A customer record from `GET /customers/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Acknowledgement of `POST /customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCreated {
    pub id: CustomerId,
    #[serde(default)]
    pub success: bool,
}

// =============================================================================
// Reports
// =============================================================================

/// Query for `GET /reports/sales`. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
}

/// Sales totals for a date range.
///
/// `report_data` rows are passed through untouched; their shape is up to
/// Flowhub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    pub total_orders: u64,
    #[serde(default)]
    pub report_data: Vec<Value>,
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_minimal_fields() {
        let product: FlowhubProduct = serde_json::from_value(json!({
            "id": "p1",
            "name": "Blue Dream",
            "category": "flower",
            "price": 35,
            "unit": "eighth",
            "inStock": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "p1");
        assert!(product.description.is_none());
        assert!(product.images.is_none());
        assert_eq!(product.price.amount(), Decimal::new(35, 0));
    }

    #[test]
    fn test_negative_price_is_malformed() {
        let result = serde_json::from_value::<FlowhubProduct>(json!({
            "id": "p1",
            "name": "Bad",
            "category": "flower",
            "price": -1,
            "unit": "g",
            "inStock": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_inventory_single_and_many() {
        let one: Inventory = serde_json::from_value(json!({ "quantity": 4, "inStock": true })).unwrap();
        assert!(matches!(one, Inventory::One(InventoryLevel { in_stock: true, .. })));

        let many: Inventory = serde_json::from_value(json!([
            { "productId": "a", "quantity": 0, "inStock": false },
            { "productId": "b", "quantity": 12.5, "inStock": true }
        ]))
        .unwrap();
        let Inventory::Many(levels) = many else {
            panic!("expected a list");
        };
        assert_eq!(levels.len(), 2);
        assert!((levels[1].quantity - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_create_order_request_wire_shape() {
        let request = CreateOrderRequest {
            items: vec![FlowhubOrderItem {
                product_id: ProductId::new("p1"),
                quantity: 2,
                price: Price::new(Decimal::new(4500, 2)).unwrap(),
            }],
            customer: FlowhubCustomer {
                first_name: "Mary".to_string(),
                last_name: "Jane".to_string(),
                email: "mary@example.com".to_string(),
                phone: "555-0100".to_string(),
                date_of_birth: "1990-04-20".to_string(),
            },
            pickup_time: None,
            notes: Some("side door".to_string()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["items"][0], json!({ "productId": "p1", "quantity": 2, "price": 45.0 }));
        assert_eq!(value["customer"]["dateOfBirth"], "1990-04-20");
        assert!(value.get("pickupTime").is_none());
        assert_eq!(value["notes"], "side door");
    }

    #[test]
    fn test_customer_record_tolerates_missing_contact() {
        let record: CustomerRecord = serde_json::from_value(json!({
            "id": "c-9",
            "firstName": "Mary",
            "lastName": "Jane"
        }))
        .unwrap();
        assert_eq!(record.id.as_str(), "c-9");
        assert!(record.email.is_empty());
    }

    #[test]
    fn test_sales_report_keeps_rows() {
        let report: SalesReport = serde_json::from_value(json!({
            "totalSales": 1234.5,
            "totalOrders": 17,
            "reportData": [{ "day": "2024-06-01", "sales": 300 }]
        }))
        .unwrap();
        assert_eq!(report.total_sales, Decimal::new(12345, 1));
        assert_eq!(report.total_orders, 17);
        assert_eq!(report.report_data[0]["day"], "2024-06-01");
    }

    #[test]
    fn test_status_request_uses_wire_names() {
        let value = serde_json::to_value(UpdateOrderStatusRequest {
            status: OrderStatus::PickedUp,
        })
        .unwrap();
        assert_eq!(value, json!({ "status": "picked-up" }));
    }
}
