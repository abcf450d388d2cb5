//! Versioned, serialized cart state.
//!
//! The stored shape is
//!
//! ```json
//! { "version": 1, "state": { "items": [...], "total": 45.0, "itemCount": 1 } }
//! ```
//!
//! Loading always goes through [`CartSnapshot::migrate`], which upgrades
//! older shapes and rejects newer or unreadable ones with a typed error.
//! Stored aggregates are informational only: [`CartSnapshot::restore`]
//! rebuilds them from the lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{Cart, CartItem};

/// Storage key for the persisted cart.
pub const CART_STORAGE_KEY: &str = "terp-haus-cart";

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors from decoding a stored cart.
#[derive(Debug, Error)]
pub enum CartStateError {
    /// The stored value is not valid cart JSON.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The stored value has the wrong overall shape.
    #[error("stored cart has an invalid shape: {0}")]
    InvalidShape(&'static str),

    /// The stored value was written by a newer schema.
    #[error("stored cart version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },
}

/// Cart lines plus the aggregates at the time of writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartItem>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub item_count: u32,
}

/// A versioned cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub version: u32,
    pub state: CartState,
}

impl CartSnapshot {
    /// Capture the current state of a cart.
    #[must_use]
    pub fn capture(cart: &Cart) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            state: CartState {
                items: cart.items().to_vec(),
                total: cart.total(),
                item_count: cart.item_count(),
            },
        }
    }

    /// Serialize to a JSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be represented as JSON.
    pub fn to_value(&self) -> Result<Value, CartStateError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode a stored value, upgrading older schema versions.
    ///
    /// - no `version` field, or `version: 0`: the pre-versioned layout, where
    ///   the cart state sits at the top level (or under `state`)
    /// - `version: 1`: current layout
    ///
    /// # Errors
    ///
    /// Returns [`CartStateError`] for newer versions, non-object values or
    /// lines that fail to decode.
    pub fn migrate(raw: Value) -> Result<Self, CartStateError> {
        let Value::Object(mut object) = raw else {
            return Err(CartStateError::InvalidShape("expected a JSON object"));
        };

        let version = match object.get("version") {
            None => 0,
            Some(value) => value
                .as_u64()
                .ok_or(CartStateError::InvalidShape("version must be an integer"))?,
        };

        if version > u64::from(SNAPSHOT_VERSION) {
            return Err(CartStateError::UnsupportedVersion {
                found: version,
                supported: SNAPSHOT_VERSION,
            });
        }

        if version == 0 {
            let state_value = object
                .remove("state")
                .unwrap_or_else(|| Value::Object(object));
            let state: CartState = serde_json::from_value(state_value)?;
            return Ok(Self {
                version: SNAPSHOT_VERSION,
                state,
            });
        }

        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Rebuild a cart from this snapshot, recomputing aggregates.
    #[must_use]
    pub fn restore(self) -> Cart {
        Cart::from_items(self.state.items)
    }
}
