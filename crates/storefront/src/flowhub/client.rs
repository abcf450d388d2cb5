//! Flowhub REST client.
//!
//! Uses `reqwest` with default headers for authentication. Every call is
//! bounded by the configured timeout and resolves to an [`ApiResponse`].

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use terp_haus_core::{CustomerId, OrderId, OrderStatus, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::types::{
    CreateOrderRequest, CustomerCreated, CustomerRecord, FlowhubCustomer, FlowhubOrder,
    FlowhubProduct, HealthStatus, Inventory, InventoryUpdate, OrderQuery, ProductQuery,
    SalesReport, SalesReportQuery, UpdateInventoryRequest, UpdateOrderStatusRequest,
};
use super::{ApiResponse, FlowhubError, Gateway};
use crate::config::FlowhubConfig;

/// Client for the Flowhub REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct FlowhubClient {
    inner: Arc<FlowhubClientInner>,
}

struct FlowhubClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for FlowhubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowhubClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl FlowhubClient {
    /// Create a new Flowhub client.
    ///
    /// # Errors
    ///
    /// Returns error if a credential is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &FlowhubConfig) -> Result<Self, FlowhubError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(AUTHORIZATION, header_value(&auth_value, "API key")?);
        headers.insert("X-Client-ID", header_value(&config.client_id, "client id")?);
        headers.insert("X-Location-ID", header_value(&config.location_id, "location id")?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(FlowhubClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Build an endpoint URL from percent-encoded path segments.
    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, FlowhubError> {
        let mut raw = self.inner.base_url.clone();
        for segment in segments {
            raw.push('/');
            raw.push_str(&urlencoding::encode(segment));
        }
        let mut url = Url::parse(&raw)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send a request and decode the body.
    ///
    /// An empty or `null` body decodes to `None`.
    async fn request<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Option<T>, FlowhubError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let mut builder = self.inner.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.inspect_err(|e| {
            tracing::error!(error = %e, %method, path = url.path(), "Flowhub request failed");
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            tracing::error!(
                status = %status,
                %method,
                path = url.path(),
                body = %body.chars().take(500).collect::<String>(),
                "Flowhub API returned non-success status"
            );
            return Err(FlowhubError::Status {
                status: status.as_u16(),
                message: status_message(status, &body),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!(%method, path = url.path(), "Flowhub returned an empty body");
            return Ok(None);
        }

        serde_json::from_slice::<Option<T>>(&bytes).map_err(|e| {
            tracing::error!(
                error = %e,
                path = url.path(),
                body = %String::from_utf8_lossy(&bytes).chars().take(500).collect::<String>(),
                "Failed to parse Flowhub response"
            );
            FlowhubError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Option<T>, FlowhubError> {
        let url = self.url(segments, query)?;
        self.request::<T, ()>(Method::GET, url, None).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Option<T>, FlowhubError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let url = self.url(segments, &[])?;
        self.request(method, url, Some(body)).await
    }
}

impl Gateway for FlowhubClient {
    #[instrument(skip(self))]
    async fn list_products(&self, query: &ProductQuery) -> ApiResponse<Vec<FlowhubProduct>> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        ApiResponse::from_result(self.get(&["products"], &params).await)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> ApiResponse<FlowhubProduct> {
        ApiResponse::from_result(self.get(&["products", id.as_str()], &[]).await)
    }

    #[instrument(skip(self))]
    async fn product_categories(&self) -> ApiResponse<Vec<String>> {
        ApiResponse::from_result(self.get(&["products", "categories"], &[]).await)
    }

    #[instrument(skip(self))]
    async fn get_inventory(&self, product_id: Option<&ProductId>) -> ApiResponse<Inventory> {
        let result = match product_id {
            Some(id) => self.get(&["inventory", id.as_str()], &[]).await,
            None => self.get(&["inventory"], &[]).await,
        };
        ApiResponse::from_result(result)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn update_inventory(
        &self,
        product_id: &ProductId,
        quantity: f64,
    ) -> ApiResponse<InventoryUpdate> {
        let body = UpdateInventoryRequest { quantity };
        ApiResponse::from_result(
            self.send(Method::PUT, &["inventory", product_id.as_str()], &body)
                .await,
        )
    }

    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    async fn create_order(&self, request: &CreateOrderRequest) -> ApiResponse<FlowhubOrder> {
        ApiResponse::from_result(self.send(Method::POST, &["orders"], request).await)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn get_order(&self, id: &OrderId) -> ApiResponse<FlowhubOrder> {
        ApiResponse::from_result(self.get(&["orders", id.as_str()], &[]).await)
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, query: &OrderQuery) -> ApiResponse<Vec<FlowhubOrder>> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(status) = &query.status {
            params.push(("status", status.to_string()));
        }
        ApiResponse::from_result(self.get(&["orders"], &params).await)
    }

    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> ApiResponse<FlowhubOrder> {
        let body = UpdateOrderStatusRequest {
            status: status.clone(),
        };
        ApiResponse::from_result(self.send(Method::PATCH, &["orders", id.as_str()], &body).await)
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn get_customer(&self, id: &CustomerId) -> ApiResponse<CustomerRecord> {
        ApiResponse::from_result(self.get(&["customers", id.as_str()], &[]).await)
    }

    #[instrument(skip_all)]
    async fn create_customer(&self, customer: &FlowhubCustomer) -> ApiResponse<CustomerCreated> {
        ApiResponse::from_result(self.send(Method::POST, &["customers"], customer).await)
    }

    #[instrument(skip(self))]
    async fn sales_report(&self, query: &SalesReportQuery) -> ApiResponse<SalesReport> {
        let mut params = Vec::new();
        if let Some(start) = query.start_date {
            params.push(("startDate", start.to_string()));
        }
        if let Some(end) = query.end_date {
            params.push(("endDate", end.to_string()));
        }
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        ApiResponse::from_result(self.get(&["reports", "sales"], &params).await)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> ApiResponse<HealthStatus> {
        ApiResponse::from_result(self.get(&["health"], &[]).await)
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, FlowhubError> {
    HeaderValue::from_str(value)
        .map_err(|e| FlowhubError::Config(format!("invalid {what} header: {e}")))
}

/// Upstream error text, falling back to the canonical reason.
fn status_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status.canonical_reason().unwrap_or("error").to_string();
    }
    body.chars().take(200).collect()
}
