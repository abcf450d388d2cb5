//! In-memory [`Gateway`] for service tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use terp_haus_core::{CustomerId, OrderId, OrderStatus, Price, ProductId};

use super::types::{
    CreateOrderRequest, CustomerCreated, CustomerRecord, FlowhubCustomer, FlowhubOrder,
    FlowhubOrderItem, FlowhubProduct, HealthStatus, Inventory, InventoryLevel, InventoryUpdate,
    OrderQuery, ProductQuery, SalesReport, SalesReportQuery,
};
use super::{ApiResponse, Gateway};

/// Scripted gateway that records every call.
#[derive(Debug, Default)]
pub struct MockGateway {
    pub products: Vec<FlowhubProduct>,
    pub orders: Vec<FlowhubOrder>,
    pub customers: Vec<CustomerRecord>,
    /// When set, every call fails with this message.
    pub fail_with: Option<(String, Option<u16>)>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<CreateOrderRequest>>,
    registered: Mutex<Vec<FlowhubCustomer>>,
    report_queries: Mutex<Vec<SalesReportQuery>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(mut self, products: Vec<FlowhubProduct>) -> Self {
        self.products = products;
        self
    }

    pub fn with_orders(mut self, orders: Vec<FlowhubOrder>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_customers(mut self, customers: Vec<CustomerRecord>) -> Self {
        self.customers = customers;
        self
    }

    pub fn failing(mut self, message: &str, status: Option<u16>) -> Self {
        self.fail_with = Some((message.to_string(), status));
        self
    }

    /// Names of the calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Bodies received by `create_order`.
    pub fn created_orders(&self) -> Vec<CreateOrderRequest> {
        self.created.lock().unwrap().clone()
    }

    /// Bodies received by `create_customer`.
    pub fn registered_customers(&self) -> Vec<FlowhubCustomer> {
        self.registered.lock().unwrap().clone()
    }

    /// Queries received by `sales_report`.
    pub fn report_queries(&self) -> Vec<SalesReportQuery> {
        self.report_queries.lock().unwrap().clone()
    }

    fn record<T>(&self, call: &str) -> Option<ApiResponse<T>> {
        self.calls.lock().unwrap().push(call.to_string());
        self.fail_with
            .as_ref()
            .map(|(message, status)| ApiResponse::failure(message.clone(), *status))
    }
}

impl Gateway for MockGateway {
    async fn list_products(&self, query: &ProductQuery) -> ApiResponse<Vec<FlowhubProduct>> {
        if let Some(failure) = self.record("list_products") {
            return failure;
        }
        let matching = self
            .products
            .iter()
            .filter(|p| query.category.as_deref().is_none_or(|c| p.category == c))
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        ApiResponse::ok(Some(matching))
    }

    async fn get_product(&self, id: &ProductId) -> ApiResponse<FlowhubProduct> {
        if let Some(failure) = self.record("get_product") {
            return failure;
        }
        match self.products.iter().find(|p| &p.id == id) {
            Some(product) => ApiResponse::ok(Some(product.clone())),
            None => ApiResponse::failure("HTTP 404: Not Found", Some(404)),
        }
    }

    async fn product_categories(&self) -> ApiResponse<Vec<String>> {
        if let Some(failure) = self.record("product_categories") {
            return failure;
        }
        let mut categories: Vec<String> = self.products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        ApiResponse::ok(Some(categories))
    }

    async fn get_inventory(&self, product_id: Option<&ProductId>) -> ApiResponse<Inventory> {
        if let Some(failure) = self.record("get_inventory") {
            return failure;
        }
        #[allow(clippy::cast_precision_loss)]
        let level = |p: &FlowhubProduct| InventoryLevel {
            product_id: Some(p.id.clone()),
            quantity: p.stock_quantity.unwrap_or_default() as f64,
            in_stock: p.in_stock,
        };
        match product_id {
            Some(id) => match self.products.iter().find(|p| &p.id == id) {
                Some(product) => ApiResponse::ok(Some(Inventory::One(level(product)))),
                None => ApiResponse::failure("HTTP 404: Not Found", Some(404)),
            },
            None => ApiResponse::ok(Some(Inventory::Many(self.products.iter().map(level).collect()))),
        }
    }

    async fn update_inventory(&self, _product_id: &ProductId, _quantity: f64) -> ApiResponse<InventoryUpdate> {
        if let Some(failure) = self.record("update_inventory") {
            return failure;
        }
        ApiResponse::ok(Some(InventoryUpdate { success: true }))
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ApiResponse<FlowhubOrder> {
        if let Some(failure) = self.record("create_order") {
            return failure;
        }
        self.created.lock().unwrap().push(request.clone());
        ApiResponse::ok(Some(order_from_request("o-new", request)))
    }

    async fn get_order(&self, id: &OrderId) -> ApiResponse<FlowhubOrder> {
        if let Some(failure) = self.record("get_order") {
            return failure;
        }
        ApiResponse::ok(self.orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn list_orders(&self, query: &OrderQuery) -> ApiResponse<Vec<FlowhubOrder>> {
        if let Some(failure) = self.record("list_orders") {
            return failure;
        }
        let matching = self
            .orders
            .iter()
            .filter(|o| query.status.as_ref().is_none_or(|s| o.status == s.as_str()))
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        ApiResponse::ok(Some(matching))
    }

    async fn update_order_status(&self, id: &OrderId, status: &OrderStatus) -> ApiResponse<FlowhubOrder> {
        if let Some(failure) = self.record("update_order_status") {
            return failure;
        }
        match self.orders.iter().find(|o| &o.id == id) {
            Some(order) => {
                let mut order = order.clone();
                order.status = status.to_string();
                ApiResponse::ok(Some(order))
            }
            None => ApiResponse::failure("HTTP 404: Not Found", Some(404)),
        }
    }

    async fn get_customer(&self, id: &CustomerId) -> ApiResponse<CustomerRecord> {
        if let Some(failure) = self.record("get_customer") {
            return failure;
        }
        match self.customers.iter().find(|c| &c.id == id) {
            Some(customer) => ApiResponse::ok(Some(customer.clone())),
            None => ApiResponse::failure("HTTP 404: Not Found", Some(404)),
        }
    }

    async fn create_customer(&self, customer: &FlowhubCustomer) -> ApiResponse<CustomerCreated> {
        if let Some(failure) = self.record("create_customer") {
            return failure;
        }
        let mut registered = self.registered.lock().unwrap();
        registered.push(customer.clone());
        ApiResponse::ok(Some(CustomerCreated {
            id: CustomerId::new(format!("c-{}", registered.len())),
            success: true,
        }))
    }

    /// Totals over every scripted order, ignoring the filters.
    async fn sales_report(&self, query: &SalesReportQuery) -> ApiResponse<SalesReport> {
        if let Some(failure) = self.record("sales_report") {
            return failure;
        }
        self.report_queries.lock().unwrap().push(query.clone());
        ApiResponse::ok(Some(SalesReport {
            total_sales: self.orders.iter().map(|o| o.total).sum(),
            total_orders: self.orders.len() as u64,
            report_data: Vec::new(),
        }))
    }

    async fn health_check(&self) -> ApiResponse<HealthStatus> {
        if let Some(failure) = self.record("health_check") {
            return failure;
        }
        ApiResponse::ok(Some(HealthStatus {
            status: "ok".to_string(),
            timestamp: None,
        }))
    }
}

/// A customer record with the given ID.
pub fn customer_record(id: &str) -> CustomerRecord {
    CustomerRecord {
        id: CustomerId::new(id),
        first_name: "Mary".to_string(),
        last_name: "Jane".to_string(),
        email: "mary@example.com".to_string(),
        phone: "555-0100".to_string(),
    }
}

/// A wire product priced in cents.
pub fn flowhub_product(id: &str, category: &str, cents: i64) -> FlowhubProduct {
    let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    FlowhubProduct {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: None,
        category: category.to_string(),
        subcategory: None,
        price: Price::new(Decimal::new(cents, 2)).unwrap(),
        unit: "3.5g".to_string(),
        thc: Some(22.5),
        cbd: None,
        terpenes: None,
        images: None,
        in_stock: true,
        stock_quantity: Some(10),
        created_at: stamp,
        updated_at: stamp,
    }
}

/// A wire order echoing a create request.
pub fn order_from_request(id: &str, request: &CreateOrderRequest) -> FlowhubOrder {
    let stamp = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let total = request
        .items
        .iter()
        .map(|item| item.price.line_total(item.quantity))
        .sum();
    FlowhubOrder {
        id: OrderId::new(id),
        order_number: format!("TH-{id}"),
        items: request.items.clone(),
        customer: request.customer.clone(),
        status: "pending".to_string(),
        total,
        tax: Decimal::ZERO,
        pickup_time: request.pickup_time.clone(),
        notes: request.notes.clone(),
        created_at: stamp,
        updated_at: stamp,
    }
}

/// A wire order with one line.
pub fn flowhub_order(id: &str, status: &str) -> FlowhubOrder {
    let request = CreateOrderRequest {
        items: vec![FlowhubOrderItem {
            product_id: ProductId::new("p1"),
            quantity: 1,
            price: Price::new(Decimal::new(2000, 2)).unwrap(),
        }],
        customer: FlowhubCustomer {
            first_name: "Mary".to_string(),
            last_name: "Jane".to_string(),
            email: "mary@example.com".to_string(),
            phone: "555-0100".to_string(),
            date_of_birth: "1990-04-20".to_string(),
        },
        pickup_time: None,
        notes: None,
    };
    let mut order = order_from_request(id, &request);
    order.status = status.to_string();
    order
}
