//! In-memory catalog backend seeded from a JSON snapshot.
//!
//! Stands in for the host platform's database-backed catalog: categories with
//! a parent tree, products assigned to categories, and a search provider view
//! over the same data.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::search::{SearchError, SearchProvider, SearchQuery, SearchResult};
use crate::catalog::sort::{self, SortOrder};
use crate::catalog::types::{Category, CategoryId, ProductId, RawProduct};
use crate::catalog::{Catalog, CatalogError};

/// On-disk catalog snapshot shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub products: Vec<RawProduct>,
}

/// In-memory catalog: the concrete [`Catalog`] and [`SearchProvider`] backend.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    categories: HashMap<CategoryId, Category>,
    children: HashMap<CategoryId, Vec<CategoryId>>,
    by_category: HashMap<CategoryId, Vec<ProductId>>,
    products: HashMap<ProductId, RawProduct>,
}

impl InMemoryCatalog {
    /// An empty catalog. Every listing is empty; useful before a snapshot
    /// has been provisioned.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path)?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&data)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Build the catalog indexes from a snapshot.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut catalog = Self::default();

        for category in snapshot.categories {
            if let Some(parent) = category.parent {
                catalog.children.entry(parent).or_default().push(category.id);
            }
            catalog.categories.insert(category.id, category);
        }

        // Deterministic child order.
        for child_ids in catalog.children.values_mut() {
            child_ids.sort_unstable();
        }

        for product in snapshot.products {
            catalog
                .by_category
                .entry(product.category)
                .or_default()
                .push(product.id);
            catalog.products.insert(product.id, product);
        }

        debug!(
            categories = catalog.categories.len(),
            products = catalog.products.len(),
            "Catalog snapshot indexed"
        );

        catalog
    }

    /// Number of categories in the snapshot.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of products in the snapshot.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    fn list(&self, id: CategoryId, sort: SortOrder, fetch_limit: usize) -> Vec<RawProduct> {
        let active = self
            .categories
            .get(&id)
            .map(|c| c.active)
            .unwrap_or(false);
        if !active {
            return Vec::new();
        }

        let mut listed: Vec<RawProduct> = self
            .by_category
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|pid| self.products.get(pid).cloned())
            .collect();

        sort::apply(&mut listed, sort);
        listed.truncate(fetch_limit);
        listed
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, CatalogError> {
        Ok(self.categories.get(&id).cloned())
    }

    async fn category_products(
        &self,
        id: CategoryId,
        sort: SortOrder,
        fetch_limit: usize,
    ) -> Result<Vec<RawProduct>, CatalogError> {
        Ok(self.list(id, sort, fetch_limit))
    }

    async fn child_categories(&self, id: CategoryId) -> Result<Vec<Category>, CatalogError> {
        let children = self
            .children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|cid| self.categories.get(cid))
            .filter(|c| c.active)
            .cloned()
            .collect();
        Ok(children)
    }
}

#[async_trait]
impl SearchProvider for InMemoryCatalog {
    async fn run_query(&self, query: &SearchQuery) -> Result<SearchResult, SearchError> {
        Ok(SearchResult {
            products: self.list(query.category, query.sort, query.results_per_page),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn category(id: u64, parent: Option<u64>, active: bool) -> Category {
        Category {
            id: CategoryId(id),
            parent: parent.map(CategoryId),
            name: format!("Category {id}"),
            description: String::new(),
            link_rewrite: format!("category-{id}"),
            active,
            image: None,
        }
    }

    fn product(id: u64, category: u64, day: u32) -> RawProduct {
        RawProduct {
            id: ProductId(id),
            category: CategoryId(category),
            name: format!("Product {id}"),
            price: id as f64,
            quantity: 5,
            available: true,
            date_add: chrono::Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            position: 0,
            link_rewrite: format!("product-{id}"),
            cover: None,
            url: None,
            description_short: String::new(),
        }
    }

    fn test_catalog() -> InMemoryCatalog {
        InMemoryCatalog::from_snapshot(CatalogSnapshot {
            categories: vec![
                category(1, None, true),
                category(2, Some(1), true),
                category(3, Some(1), false),
            ],
            products: vec![product(10, 1, 1), product(11, 1, 2), product(20, 2, 1)],
        })
    }

    #[tokio::test]
    async fn test_listing_sorted_and_truncated() {
        let catalog = test_catalog();
        let listed = catalog
            .category_products(CategoryId(1), SortOrder::parse("date_desc"), 1)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ProductId(11));
    }

    #[tokio::test]
    async fn test_unknown_category_lists_empty() {
        let catalog = test_catalog();
        let listed = catalog
            .category_products(CategoryId(99), SortOrder::parse("date_desc"), 10)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_category_lists_empty() {
        let catalog = test_catalog();
        let listed = catalog
            .category_products(CategoryId(3), SortOrder::parse("date_desc"), 10)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_children_exclude_inactive() {
        let catalog = test_catalog();
        let children = catalog.child_categories(CategoryId(1)).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, CategoryId(2));
    }

    #[tokio::test]
    async fn test_load_missing_file_errors() {
        let err = InMemoryCatalog::load(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(err, Err(CatalogError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_snapshot_file() {
        use std::io::Write;

        let snapshot = CatalogSnapshot {
            categories: vec![category(1, None, true)],
            products: vec![product(10, 1, 1)],
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&snapshot).unwrap()).unwrap();

        let catalog = InMemoryCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.category_count(), 1);
        assert_eq!(catalog.product_count(), 1);
    }
}
