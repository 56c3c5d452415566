//! Integration tests for fetch memoization and version-stamped invalidation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeZone;

use home_shelf::catalog::sort::SortOrder;
use home_shelf::catalog::store::{CatalogSnapshot, InMemoryCatalog};
use home_shelf::catalog::types::{Category, CategoryId, ProductId, RawProduct};
use home_shelf::config::ShopConfig;
use home_shelf::fetch::cache::MemoCache;
use home_shelf::fetch::fetcher::{FetchOptions, ProductFetcher};

fn test_catalog() -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::from_snapshot(CatalogSnapshot {
        categories: vec![Category {
            id: CategoryId(1),
            parent: None,
            name: "Category 1".to_string(),
            description: String::new(),
            link_rewrite: "category-1".to_string(),
            active: true,
            image: None,
        }],
        products: vec![RawProduct {
            id: ProductId(10),
            category: CategoryId(1),
            name: "Product 10".to_string(),
            price: 10.0,
            quantity: 5,
            available: true,
            date_add: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            position: 0,
            link_rewrite: "product-10".to_string(),
            cover: None,
            url: None,
            description_short: String::new(),
        }],
    }))
}

fn fetcher(ttl: Duration, version: Arc<AtomicU64>) -> ProductFetcher {
    let catalog = test_catalog();
    ProductFetcher::new(
        catalog.clone(),
        catalog,
        ShopConfig::default(),
        MemoCache::new(ttl),
        version,
    )
}

const OPTIONS: FetchOptions = FetchOptions {
    include_children: false,
    children_depth: 0,
    in_stock_only: false,
};

#[tokio::test]
async fn test_repeat_fetch_memoized() {
    let fetcher = fetcher(Duration::from_secs(300), Arc::new(AtomicU64::new(1)));
    let sort = SortOrder::parse("date_desc");

    let first = fetcher
        .products_for_category(CategoryId(1), sort, 8, OPTIONS)
        .await
        .unwrap();
    let second = fetcher
        .products_for_category(CategoryId(1), sort, 8, OPTIONS)
        .await
        .unwrap();

    assert_eq!(first, second);
    let counters = fetcher.cache().counters();
    assert_eq!(counters.misses, 1);
    assert_eq!(counters.hits, 1);
    assert_eq!(fetcher.cache().len().await, 1);
}

#[tokio::test]
async fn test_different_parameters_miss() {
    let fetcher = fetcher(Duration::from_secs(300), Arc::new(AtomicU64::new(1)));

    for (sort, limit) in [("date_desc", 8), ("date_desc", 4), ("price_asc", 8)] {
        fetcher
            .products_for_category(CategoryId(1), SortOrder::parse(sort), limit, OPTIONS)
            .await
            .unwrap();
    }

    let counters = fetcher.cache().counters();
    assert_eq!(counters.misses, 3);
    assert_eq!(counters.hits, 0);
}

#[tokio::test]
async fn test_version_bump_invalidates() {
    let version = Arc::new(AtomicU64::new(1));
    let fetcher = fetcher(Duration::from_secs(300), version.clone());
    let sort = SortOrder::parse("date_desc");

    fetcher
        .products_for_category(CategoryId(1), sort, 8, OPTIONS)
        .await
        .unwrap();
    fetcher
        .products_for_category(CategoryId(1), sort, 8, OPTIONS)
        .await
        .unwrap();
    assert_eq!(fetcher.cache().counters().hits, 1);

    // A settings change bumps the version; the same query misses again.
    version.fetch_add(1, Ordering::SeqCst);
    fetcher
        .products_for_category(CategoryId(1), sort, 8, OPTIONS)
        .await
        .unwrap();

    let counters = fetcher.cache().counters();
    assert_eq!(counters.hits, 1);
    assert_eq!(counters.misses, 2);
    // The stranded pre-bump entry is still held until TTL or purge.
    assert_eq!(fetcher.cache().len().await, 2);
}

#[tokio::test]
async fn test_expired_entry_recomputed() {
    let fetcher = fetcher(Duration::ZERO, Arc::new(AtomicU64::new(1)));
    let sort = SortOrder::parse("date_desc");

    fetcher
        .products_for_category(CategoryId(1), sort, 8, OPTIONS)
        .await
        .unwrap();
    fetcher
        .products_for_category(CategoryId(1), sort, 8, OPTIONS)
        .await
        .unwrap();

    let counters = fetcher.cache().counters();
    assert_eq!(counters.hits, 0);
    assert_eq!(counters.misses, 2);
}
