//! Session-resident cart.
//!
//! The cart snapshot is stored as one JSON value in the visitor's
//! tower-sessions record. A snapshot that can no longer be read is replaced
//! by an empty cart rather than failing every cart request.

use serde_json::Value;
use terp_haus_core::cart::{CartStorage, CartStore, CartStoreError};
use tower_sessions::Session;
use tracing::warn;

use crate::error::Result;

/// [`CartStorage`] backed by the request's session.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn load(&self, key: &str) -> std::result::Result<Option<Value>, CartStoreError> {
        self.session
            .get::<Value>(key)
            .await
            .map_err(CartStoreError::storage)
    }

    async fn save(&self, key: &str, value: Value) -> std::result::Result<(), CartStoreError> {
        self.session
            .insert(key, value)
            .await
            .map_err(CartStoreError::storage)
    }
}

/// Cart store for this session's cart.
pub type SessionCart = CartStore<SessionCartStorage>;

/// Open the session cart, resetting it if the stored snapshot is unreadable.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn open_cart(session: Session) -> Result<SessionCart> {
    let (store, discarded) = CartStore::open_or_reset(SessionCartStorage::new(session)).await?;
    if let Some(error) = discarded {
        warn!(%error, "Discarded unreadable session cart");
    }
    Ok(store)
}
