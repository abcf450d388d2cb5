//! Product category and consumption method enums.
//!
//! Flowhub sends categories as free-form strings. They are decoded into a
//! closed set of known variants; anything else lands in `Unknown` with the
//! raw value preserved so data-quality problems stay visible.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Product category.
///
/// ```
/// use terp_haus_core::ProductCategory;
///
/// assert_eq!(ProductCategory::from("pre-rolls"), ProductCategory::PreRolls);
/// assert_eq!(
///     ProductCategory::from("tinctures"),
///     ProductCategory::Unknown("tinctures".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    Flower,
    Concentrates,
    Edibles,
    Topicals,
    Accessories,
    Vape,
    PreRolls,
    /// A category Flowhub sent that is not part of the known set.
    Unknown(String),
}

impl ProductCategory {
    /// Wire representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Flower => "flower",
            Self::Concentrates => "concentrates",
            Self::Edibles => "edibles",
            Self::Topicals => "topicals",
            Self::Accessories => "accessories",
            Self::Vape => "vape",
            Self::PreRolls => "pre-rolls",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns `true` for categories outside the known set.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<String> for ProductCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "flower" => Self::Flower,
            "concentrates" => Self::Concentrates,
            "edibles" => Self::Edibles,
            "topicals" => Self::Topicals,
            "accessories" => Self::Accessories,
            "vape" => Self::Vape,
            "pre-rolls" => Self::PreRolls,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<&str> for ProductCategory {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<ProductCategory> for String {
    fn from(category: ProductCategory) -> Self {
        match category {
            ProductCategory::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a product is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionMethod {
    Smoking,
    Vaping,
    Edible,
    Topical,
    Tincture,
    Concentrate,
}
