//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (recorded on the span)
//! 4. Session layer (tower-sessions, in-memory store)
//! 5. Rate limiting (governor), per route group

pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use rate_limit::{api_rate_limiter, order_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
