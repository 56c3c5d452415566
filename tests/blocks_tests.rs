//! Integration tests for home page block assembly and application state.

use std::sync::Arc;

use chrono::TimeZone;

use home_shelf::blocks::assemble_home_blocks;
use home_shelf::catalog::search::SearchProvider;
use home_shelf::catalog::store::{CatalogSnapshot, InMemoryCatalog};
use home_shelf::catalog::types::{Category, CategoryId, ProductId, RawProduct};
use home_shelf::catalog::Catalog;
use home_shelf::config::{BlocksConfig, Config};
use home_shelf::server::api::AppState;

fn category(id: u64, description: &str, image: Option<&str>) -> Category {
    Category {
        id: CategoryId(id),
        parent: None,
        name: format!("Category {id}"),
        description: description.to_string(),
        link_rewrite: format!("category-{id}"),
        active: true,
        image: image.map(String::from),
    }
}

fn product(id: u64, category: u64) -> RawProduct {
    RawProduct {
        id: ProductId(id),
        category: CategoryId(category),
        name: format!("Product {id}"),
        price: 9.99,
        quantity: 3,
        available: true,
        date_add: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        position: 0,
        link_rewrite: format!("product-{id}"),
        cover: None,
        url: None,
        description_short: String::new(),
    }
}

fn app_state(blocks: BlocksConfig) -> Arc<AppState> {
    let mut config = Config::default();
    config.blocks = blocks;
    let config = Arc::new(config);

    let catalog = Arc::new(InMemoryCatalog::from_snapshot(CatalogSnapshot {
        categories: vec![
            category(1, "<p>Fresh <b>arrivals</b></p>", None),
            category(2, "", Some("/img/c/2.jpg")),
            category(3, "", None), // no products
        ],
        products: vec![product(10, 1), product(11, 1), product(20, 2)],
    }));

    let catalog_seam: Arc<dyn Catalog> = catalog.clone();
    let search_seam: Arc<dyn SearchProvider> = catalog;
    Arc::new(AppState::new(config, catalog_seam, search_seam))
}

async fn assemble(state: &AppState) -> Vec<home_shelf::blocks::CategoryBlock> {
    let settings = state.settings.read().await.clone();
    assemble_home_blocks(
        state.catalog.as_ref(),
        &state.fetcher,
        &settings,
        &state.config.catalog.placeholder_image,
        &state.config.shop.base_url,
    )
    .await
}

#[tokio::test]
async fn test_blocks_follow_configured_order() {
    let state = app_state(BlocksConfig {
        category_ids: vec![CategoryId(2), CategoryId(1)],
        ..Default::default()
    });

    let blocks = assemble(&state).await;
    let ids: Vec<u64> = blocks.iter().map(|b| b.id.0).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_empty_and_unknown_categories_skipped() {
    let state = app_state(BlocksConfig {
        category_ids: vec![CategoryId(3), CategoryId(99), CategoryId(1)],
        ..Default::default()
    });

    let blocks = assemble(&state).await;
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].id, CategoryId(1));
}

#[tokio::test]
async fn test_no_configured_categories_yields_no_blocks() {
    let state = app_state(BlocksConfig {
        category_ids: Vec::new(),
        ..Default::default()
    });

    assert!(assemble(&state).await.is_empty());
}

#[tokio::test]
async fn test_block_metadata() {
    let state = app_state(BlocksConfig {
        category_ids: vec![CategoryId(1), CategoryId(2)],
        ..Default::default()
    });

    let blocks = assemble(&state).await;

    // Description is tag-stripped, image falls back to the placeholder.
    assert_eq!(blocks[0].name, "Category 1");
    assert_eq!(blocks[0].description, "Fresh arrivals");
    assert_eq!(blocks[0].image, "/img/no-picture.jpg");
    assert_eq!(blocks[0].link, "http://localhost:8080/category/1-category-1");
    assert_eq!(blocks[0].products.len(), 2);

    // A category with its own image keeps it.
    assert_eq!(blocks[1].image, "/img/c/2.jpg");
}

#[tokio::test]
async fn test_per_block_limit_respected() {
    let state = app_state(BlocksConfig {
        category_ids: vec![CategoryId(1)],
        products_per_block: 1,
        ..Default::default()
    });

    let blocks = assemble(&state).await;
    assert_eq!(blocks[0].products.len(), 1);
}

#[tokio::test]
async fn test_settings_update_bumps_version() {
    let state = app_state(BlocksConfig::default());

    assert_eq!(
        state
            .cache_version
            .load(std::sync::atomic::Ordering::Relaxed),
        1
    );
    assert_eq!(state.bump_cache_version(), 2);
    assert_eq!(state.bump_cache_version(), 3);
}
