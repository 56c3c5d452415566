//! JSON HTTP API.
//!
//! Template-facing routes:
//! - GET /home/blocks
//! - GET /categories/{id}/products
//!
//! Admin routes:
//! - GET /admin/settings, PUT /admin/settings
//! - POST /admin/cache/clear
//!
//! Operational routes:
//! - GET /health
//! - GET /cache/stats

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::blocks::{assemble_home_blocks, CategoryBlock};
use crate::catalog::search::SearchProvider;
use crate::catalog::sort::SortOrder;
use crate::catalog::types::CategoryId;
use crate::catalog::Catalog;
use crate::config::{BlocksConfig, Config};
use crate::fetch::cache::MemoCache;
use crate::fetch::fetcher::{FetchOptions, ProductFetcher};
use crate::fetch::present::PresentedProduct;

/// Application state shared across handlers.
pub struct AppState {
    pub fetcher: ProductFetcher,
    pub catalog: Arc<dyn Catalog>,
    pub settings: RwLock<BlocksConfig>,
    pub cache_version: Arc<AtomicU64>,
    pub config: Arc<Config>,
    pub start_time: Instant,
}

impl AppState {
    /// Wire up the fetcher and shared state from configuration and the
    /// collaborator seams.
    pub fn new(
        config: Arc<Config>,
        catalog: Arc<dyn Catalog>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        let cache_version = Arc::new(AtomicU64::new(config.cache.version));
        let cache = MemoCache::new(Duration::from_secs(config.cache.ttl_secs));
        let fetcher = ProductFetcher::new(
            catalog.clone(),
            search,
            config.shop.clone(),
            cache,
            cache_version.clone(),
        );

        Self {
            fetcher,
            catalog,
            settings: RwLock::new(config.blocks.clone()),
            cache_version,
            config,
            start_time: Instant::now(),
        }
    }

    /// Bump the cache version, invalidating all memoized fetch results.
    pub fn bump_cache_version(&self) -> u64 {
        self.cache_version.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/home/blocks", get(home_blocks))
        .route("/categories/{id}/products", get(category_products))
        .route("/admin/settings", get(get_settings).put(update_settings))
        .route("/admin/cache/clear", post(clear_cache))
        .route("/health", get(health))
        .route("/cache/stats", get(cache_stats))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Request/Response Types ────────────────────────────────────────────────

/// Home page blocks response.
#[derive(Debug, Serialize)]
pub struct HomeBlocksResponse {
    pub blocks: Vec<CategoryBlock>,
}

/// Query parameters for a single-category fetch. Anything omitted defaults
/// from the stored block settings.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub sort: Option<String>,
    pub limit: Option<usize>,
    pub include_children: Option<bool>,
    pub children_depth: Option<u32>,
    pub in_stock_only: Option<bool>,
}

/// Single-category fetch response.
#[derive(Debug, Serialize)]
pub struct CategoryProductsResponse {
    pub category: CategoryId,
    pub sort: String,
    pub limit: usize,
    pub count: usize,
    pub products: Vec<PresentedProduct>,
}

/// Settings update response.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: BlocksConfig,
    pub cache_version: u64,
}

/// Cache clear response.
#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub cache_version: u64,
    pub purged_entries: usize,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStatsResponse,
}

/// Cache statistics response.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub version: u64,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn home_blocks(State(state): State<Arc<AppState>>) -> Json<HomeBlocksResponse> {
    let request_id = Uuid::new_v4().to_string();
    let settings = state.settings.read().await.clone();

    info!(
        request_id,
        categories = settings.category_ids.len(),
        "Home blocks request"
    );

    let blocks = assemble_home_blocks(
        state.catalog.as_ref(),
        &state.fetcher,
        &settings,
        &state.config.catalog.placeholder_image,
        &state.config.shop.base_url,
    )
    .await;

    Json(HomeBlocksResponse { blocks })
}

async fn category_products(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<CategoryProductsResponse>, StatusCode> {
    let request_id = Uuid::new_v4().to_string();
    let settings = state.settings.read().await.clone();

    let category = CategoryId(id);
    let sort = SortOrder::parse(query.sort.as_deref().unwrap_or(&settings.sort_order));
    let limit = query.limit.unwrap_or(settings.products_per_block).max(1);
    let options = FetchOptions {
        include_children: query.include_children.unwrap_or(settings.include_children),
        children_depth: query.children_depth.unwrap_or(settings.children_depth),
        in_stock_only: query.in_stock_only.unwrap_or(settings.in_stock_only),
    };

    info!(request_id, %category, %sort, limit, "Category products request");

    let products = state
        .fetcher
        .products_for_category(category, sort, limit, options)
        .await
        .map_err(|e| {
            error!(request_id, %category, error = %e, "Category fetch failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(CategoryProductsResponse {
        category,
        sort: sort.key(),
        limit,
        count: products.len(),
        products,
    }))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<BlocksConfig> {
    Json(state.settings.read().await.clone())
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(mut submitted): Json<BlocksConfig>,
) -> Json<SettingsResponse> {
    submitted.sanitize();
    *state.settings.write().await = submitted.clone();

    let cache_version = state.bump_cache_version();
    info!(
        cache_version,
        categories = submitted.category_ids.len(),
        sort = submitted.sort_order,
        per_block = submitted.products_per_block,
        "Settings updated"
    );

    Json(SettingsResponse {
        settings: submitted,
        cache_version,
    })
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<CacheClearResponse> {
    let cache_version = state.bump_cache_version();
    let purged_entries = state.fetcher.cache().purge_expired().await;
    info!(cache_version, purged_entries, "Cache cleared");

    Json(CacheClearResponse {
        cache_version,
        purged_entries,
    })
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        cache: cache_stats_body(&state).await,
    })
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    Json(cache_stats_body(&state).await)
}

async fn cache_stats_body(state: &AppState) -> CacheStatsResponse {
    let cache = state.fetcher.cache();
    let counters = cache.counters();
    CacheStatsResponse {
        entries: cache.len().await,
        hits: counters.hits,
        misses: counters.misses,
        version: state.cache_version.load(Ordering::Relaxed),
    }
}
