//! Integration tests for Terp Haus.
//!
//! Each test starts its own storefront on `127.0.0.1:0`, wired to a stub
//! Flowhub server that also binds an ephemeral port. Nothing external is
//! needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p terp-haus-integration-tests
//! ```
//!
//! # Stub Flowhub
//!
//! - `GET /products` returns `limit` products starting at `offset`
//! - `GET /products/missing` returns 404
//! - every product costs 35.00
//! - `POST /orders` echoes the order back as `pending` and records it
//! - [`FlowhubMode::Down`] answers every request with 500 `flowhub down`

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use terp_haus_storefront::config::{FlowhubConfig, SentryConfig, StorefrontConfig};
use terp_haus_storefront::services::specials::SpecialsStore;
use terp_haus_storefront::state::AppState;
use tokio::net::TcpListener;
use url::Url;

const TIMESTAMP: &str = "2024-06-01T12:00:00Z";

/// How the stub Flowhub behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowhubMode {
    Healthy,
    Down,
}

/// A running stub Flowhub.
#[derive(Clone)]
pub struct StubFlowhub {
    pub url: String,
    created: Arc<Mutex<Vec<Value>>>,
}

impl StubFlowhub {
    /// Bodies received on `POST /orders`.
    #[must_use]
    pub fn created_orders(&self) -> Vec<Value> {
        self.created
            .lock()
            .map(|orders| orders.clone())
            .unwrap_or_default()
    }
}

/// Product record as Flowhub sends it.
#[must_use]
pub fn stub_product(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "category": "flower",
        "price": 35.0,
        "unit": "3.5g",
        "thc": 24.5,
        "images": [{ "id": format!("img-{id}"), "url": format!("https://cdn.example.com/{id}.jpg") }],
        "inStock": true,
        "stockQuantity": 12,
        "createdAt": TIMESTAMP,
        "updatedAt": TIMESTAMP,
    })
}

async fn list_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let number = |key: &str, default: usize| {
        params
            .get(key)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(default)
    };
    let limit = number("limit", 20).min(50);
    let offset = number("offset", 0);

    let products: Vec<Value> = (offset..offset + limit)
        .map(|n| stub_product(&format!("p{n}")))
        .collect();
    Json(Value::Array(products))
}

async fn get_product(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, "product not found").into_response();
    }
    Json(stub_product(&id)).into_response()
}

async fn categories() -> Json<Value> {
    Json(json!(["flower", "edibles", "vape"]))
}

async fn create_order(
    State(created): State<Arc<Mutex<Vec<Value>>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let total: f64 = body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| item["price"].as_f64().unwrap_or(0.0) * item["quantity"].as_f64().unwrap_or(0.0))
                .sum()
        })
        .unwrap_or(0.0);

    let number = created.lock().map_or(0, |mut orders| {
        orders.push(body.clone());
        orders.len()
    });

    Json(json!({
        "id": format!("ord_{number}"),
        "orderNumber": format!("TH-{}", 1000 + number),
        "items": body["items"],
        "customer": body["customer"],
        "status": "pending",
        "total": total,
        "tax": 0.0,
        "pickupTime": body.get("pickupTime"),
        "notes": body.get("notes"),
        "createdAt": TIMESTAMP,
        "updatedAt": TIMESTAMP,
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": TIMESTAMP }))
}

/// Bind a router on an ephemeral local port and serve it in the background.
async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });
    addr
}

/// Start a stub Flowhub.
pub async fn spawn_flowhub(mode: FlowhubMode) -> StubFlowhub {
    let created = Arc::new(Mutex::new(Vec::new()));

    let router = match mode {
        FlowhubMode::Healthy => Router::new()
            .route("/products", get(list_products))
            .route("/products/categories", get(categories))
            .route("/products/{id}", get(get_product))
            .route("/orders", post(create_order))
            .route("/health", get(health))
            .with_state(Arc::clone(&created)),
        FlowhubMode::Down => Router::new()
            .fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "flowhub down") }),
    };

    let addr = serve(router).await;
    StubFlowhub {
        url: format!("http://{addr}"),
        created,
    }
}

/// A storefront wired to a stub Flowhub, plus a cookie-keeping client.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub flowhub: StubFlowhub,
    pub specials: SpecialsStore,
}

impl TestContext {
    /// Storefront backed by a healthy stub Flowhub.
    pub async fn new() -> Self {
        Self::with_mode(FlowhubMode::Healthy).await
    }

    /// Storefront backed by a stub Flowhub in `mode`.
    pub async fn with_mode(mode: FlowhubMode) -> Self {
        let flowhub = spawn_flowhub(mode).await;

        let config = StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            flowhub: FlowhubConfig {
                api_url: Url::parse(&flowhub.url).expect("Stub URL is valid"),
                api_key: SecretString::from("fh_test_9Qz2LmXv7RkT4pWn".to_string()),
                client_id: "client-test".to_string(),
                location_id: "location-test".to_string(),
                timeout: Duration::from_secs(2),
            },
            specials_seed_path: None,
            sentry: SentryConfig::default(),
        };

        let specials = SpecialsStore::default();
        let state = AppState::with_specials(config, specials.clone())
            .expect("Failed to build storefront state");
        let addr = serve(terp_haus_storefront::app(state)).await;

        Self {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: format!("http://{addr}"),
            flowhub,
            specials,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A valid customer block for checkout bodies.
    #[must_use]
    pub fn customer(date_of_birth: &str) -> Value {
        json!({
            "firstName": "Mary",
            "lastName": "Jane",
            "email": "mary@example.com",
            "phone": "555-0100",
            "dateOfBirth": date_of_birth,
        })
    }
}
