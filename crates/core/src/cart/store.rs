//! Persisting cart store.
//!
//! [`CartStore`] owns a [`Cart`] and a [`CartStorage`] backend. Every
//! mutating call updates the cart and then writes a full
//! [`CartSnapshot`] under [`CART_STORAGE_KEY`]. Concurrent writers to the same
//! backend key are last-writer-wins.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use thiserror::Error;

use super::snapshot::{CART_STORAGE_KEY, CartSnapshot, CartStateError};
use super::Cart;
use crate::types::{Product, ProductId};

/// Errors from loading or persisting a cart.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The stored cart could not be decoded.
    #[error(transparent)]
    State(#[from] CartStateError),

    /// The storage backend failed.
    #[error("cart storage error: {0}")]
    Storage(String),
}

impl CartStoreError {
    /// Wrap a backend error.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}

/// A key-value backend for cart snapshots.
///
/// Implementations only move JSON values in and out; versioning and
/// migration are handled by [`CartStore`].
pub trait CartStorage: Send + Sync {
    /// Read the raw value stored under `key`.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<Value>, CartStoreError>> + Send;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: Value) -> impl Future<Output = Result<(), CartStoreError>> + Send;
}

/// In-process storage backed by a shared map.
///
/// Clones share the same map, which makes it convenient for tests and for
/// single-process tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value currently stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Store a raw value, bypassing the snapshot schema.
    pub fn insert_raw(&self, key: &str, value: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), value);
        }
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self, key: &str) -> Result<Option<Value>, CartStoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CartStoreError::Storage("memory storage lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> Result<(), CartStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CartStoreError::Storage("memory storage lock poisoned".to_string()))?;
        entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// A cart bound to a storage backend.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
}

impl<S: CartStorage> CartStore<S> {
    /// Start with an empty cart without reading storage.
    pub fn empty(storage: S) -> Self {
        Self {
            storage,
            cart: Cart::new(),
        }
    }

    /// Load the stored cart, or an empty one if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::State`] if the stored value cannot be
    /// migrated, or [`CartStoreError::Storage`] if the backend fails.
    pub async fn open(storage: S) -> Result<Self, CartStoreError> {
        let cart = match storage.load(CART_STORAGE_KEY).await? {
            Some(raw) => CartSnapshot::migrate(raw)?.restore(),
            None => Cart::new(),
        };
        Ok(Self { storage, cart })
    }

    /// Like [`open`](Self::open), but an unreadable stored cart is replaced
    /// by an empty one. The decode error is handed back for logging.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Storage`] if the backend fails.
    pub async fn open_or_reset(storage: S) -> Result<(Self, Option<CartStateError>), CartStoreError> {
        let Some(raw) = storage.load(CART_STORAGE_KEY).await? else {
            return Ok((Self::empty(storage), None));
        };

        match CartSnapshot::migrate(raw) {
            Ok(snapshot) => Ok((
                Self {
                    storage,
                    cart: snapshot.restore(),
                },
                None,
            )),
            Err(err) => {
                let store = Self::empty(storage);
                store.persist().await?;
                Ok((store, Some(err)))
            }
        }
    }

    /// The current cart.
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Consume the store, returning the cart.
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    pub fn item_quantity(&self, product_id: &ProductId) -> u32 {
        self.cart.item_quantity(product_id)
    }

    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.cart.is_in_cart(product_id)
    }

    /// See [`Cart::add_item`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub async fn add_item(
        &mut self,
        product: Product,
        quantity: NonZeroU32,
    ) -> Result<&Cart, CartStoreError> {
        self.cart.add_item(product, quantity);
        self.persist().await?;
        Ok(&self.cart)
    }

    /// See [`Cart::remove_item`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub async fn remove_item(&mut self, product_id: &ProductId) -> Result<bool, CartStoreError> {
        let removed = self.cart.remove_item(product_id);
        self.persist().await?;
        Ok(removed)
    }

    /// See [`Cart::update_quantity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub async fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CartStoreError> {
        let touched = self.cart.update_quantity(product_id, quantity);
        self.persist().await?;
        Ok(touched)
    }

    /// See [`Cart::increment_quantity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub async fn increment_quantity(&mut self, product_id: &ProductId) -> Result<bool, CartStoreError> {
        let touched = self.cart.increment_quantity(product_id);
        self.persist().await?;
        Ok(touched)
    }

    /// See [`Cart::decrement_quantity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub async fn decrement_quantity(&mut self, product_id: &ProductId) -> Result<bool, CartStoreError> {
        let touched = self.cart.decrement_quantity(product_id);
        self.persist().await?;
        Ok(touched)
    }

    /// See [`Cart::clear`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub async fn clear(&mut self) -> Result<(), CartStoreError> {
        self.cart.clear();
        self.persist().await
    }

    async fn persist(&self) -> Result<(), CartStoreError> {
        let value = CartSnapshot::capture(&self.cart).to_value()?;
        self.storage.save(CART_STORAGE_KEY, value).await
    }
}
