//! Structured search provider seam.
//!
//! The search provider is the first tier of the fetch pipeline. A provider
//! error or empty result is never fatal: the fetcher falls back to direct
//! category listings.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::sort::SortOrder;
use crate::catalog::types::{CategoryId, RawProduct};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search provider unavailable: {0}")]
    Unavailable(String),

    #[error("search query failed: {0}")]
    Query(String),
}

/// A category-scoped product search query.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Category to search within.
    pub category: CategoryId,

    /// Result order.
    pub sort: SortOrder,

    /// Maximum number of results to return.
    pub results_per_page: usize,
}

/// Results from the search provider.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Matching products, already ordered.
    pub products: Vec<RawProduct>,
}

/// The structured search provider the fetch pipeline tries first.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a category product query.
    async fn run_query(&self, query: &SearchQuery) -> Result<SearchResult, SearchError>;
}
