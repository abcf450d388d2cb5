//! Product catalog types.
//!
//! These are a read-only projection of Flowhub's product records. Flowhub is
//! the source of truth; a `Product` held here may be stale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConsumptionMethod, ImageId, Price, ProductCategory, ProductId};

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub price: Price,
    /// Sale unit, e.g. "3.5g" or "each".
    pub unit: String,
    /// THC percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thc: Option<f64>,
    /// CBD percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbd: Option<f64>,
    #[serde(default)]
    pub terpenes: TerpeneProfile,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub consumption_methods: Vec<ConsumptionMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The image flagged as primary, falling back to the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: ImageId,
    pub url: String,
    pub alt: String,
    /// At most one image should be primary; this is not enforced.
    pub is_primary: bool,
}

/// Terpene name to concentration (percent by weight).
///
/// The key set is open: Flowhub reports whatever the lab tested for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerpeneProfile(BTreeMap<String, f64>);

impl TerpeneProfile {
    /// Create an empty profile.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Concentration of a single terpene.
    #[must_use]
    pub fn get(&self, terpene: &str) -> Option<f64> {
        self.0.get(terpene).copied()
    }

    /// Set the concentration of a terpene.
    pub fn insert(&mut self, terpene: impl Into<String>, concentration: f64) {
        self.0.insert(terpene.into(), concentration);
    }

    /// The terpene with the highest concentration.
    #[must_use]
    pub fn dominant(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate terpenes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl From<BTreeMap<String, f64>> for TerpeneProfile {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, f64)> for TerpeneProfile {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
