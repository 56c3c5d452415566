//! Catalog domain types and platform collaborator seams.
//!
//! - [`types`]: category/product identifiers and raw listing records
//! - [`sort`]: admin sort key parsing and listing order
//! - [`search`]: the structured search provider seam
//! - [`store`]: in-memory catalog backend seeded from a JSON snapshot

pub mod search;
pub mod sort;
pub mod store;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use sort::SortOrder;
use types::{Category, CategoryId, RawProduct};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error reading catalog snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// The host catalog: category tree and direct product listings.
///
/// The production backend is [`store::InMemoryCatalog`]; tests substitute
/// their own implementations to exercise fallback paths.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a category by ID. Unknown IDs yield `None`, not an error.
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, CatalogError>;

    /// List up to `fetch_limit` active products directly assigned to a
    /// category, in the given order. Unknown or inactive categories list
    /// as empty.
    async fn category_products(
        &self,
        id: CategoryId,
        sort: SortOrder,
        fetch_limit: usize,
    ) -> Result<Vec<RawProduct>, CatalogError>;

    /// Active child categories of a category, in tree order.
    async fn child_categories(&self, id: CategoryId) -> Result<Vec<Category>, CatalogError>;
}
