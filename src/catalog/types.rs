//! Category and product records as the catalog backend lists them.
//!
//! `RawProduct` is the pre-presentation shape: what a direct category listing
//! or the search provider returns before the presenter normalizes it for the
//! template layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A store category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,

    /// Parent category, `None` for roots.
    pub parent: Option<CategoryId>,

    /// Display name.
    pub name: String,

    /// Description, may contain markup.
    #[serde(default)]
    pub description: String,

    /// URL slug.
    #[serde(default)]
    pub link_rewrite: String,

    /// Inactive categories are excluded from listings and child walks.
    #[serde(default = "default_true")]
    pub active: bool,

    /// Category image URL, if one is set.
    #[serde(default)]
    pub image: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A product as listed by the catalog, before presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProduct {
    /// Product ID.
    pub id: ProductId,

    /// Category the product is directly assigned to.
    pub category: CategoryId,

    /// Display name.
    pub name: String,

    /// Unit price in shop currency.
    pub price: f64,

    /// Stock quantity.
    #[serde(default)]
    pub quantity: i64,

    /// Availability flag from the stock subsystem.
    #[serde(default = "default_true")]
    pub available: bool,

    /// When the product was added to the catalog.
    pub date_add: DateTime<Utc>,

    /// Manual position within its category.
    #[serde(default)]
    pub position: u32,

    /// URL slug.
    #[serde(default)]
    pub link_rewrite: String,

    /// Cover image URL, if one is set.
    #[serde(default)]
    pub cover: Option<String>,

    /// Canonical product URL when the listing already carries one.
    #[serde(default)]
    pub url: Option<String>,

    /// Short description for block display.
    #[serde(default)]
    pub description_short: String,
}
