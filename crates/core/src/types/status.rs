//! Order status enum.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order pickup status.
///
/// Flowhub owns the status transitions; this type only decodes what it
/// reports. Values outside the known set are kept as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Ready,
    PickedUp,
    Cancelled,
    /// A status Flowhub sent that is not part of the known set.
    Unknown(String),
}

impl OrderStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Ready => "ready",
            Self::PickedUp => "picked-up",
            Self::Cancelled => "cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns `true` for statuses outside the known set.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "ready" => Self::Ready,
            "picked-up" => Self::PickedUp,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse for statuses this system is allowed to request.
impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from(s.to_owned()) {
            Self::Unknown(raw) => Err(format!("invalid order status: {raw}")),
            known => Ok(known),
        }
    }
}
