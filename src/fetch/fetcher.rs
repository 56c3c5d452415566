//! Tiered product fetch with fallback, child top-up, and memoization.
//!
//! For each category the fetcher:
//! 1. Tries the structured search provider
//! 2. Falls back to the direct category listing when the provider errors or
//!    yields nothing
//! 3. Tops up from child categories (bounded depth) when results come up short
//! 4. Deduplicates product IDs across all tiers
//! 5. Applies in-stock filtering by over-fetching and trimming
//! 6. Memoizes the presented result behind a version-stamped cache key

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::search::{SearchProvider, SearchQuery};
use crate::catalog::sort::SortOrder;
use crate::catalog::types::{CategoryId, ProductId, RawProduct};
use crate::catalog::{Catalog, CatalogError};
use crate::config::ShopConfig;
use crate::fetch::cache::MemoCache;
use crate::fetch::present::{PresentedProduct, Presenter};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Per-fetch options derived from the block settings.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Pull from child categories when the parent comes up short.
    pub include_children: bool,

    /// How many levels of subcategory to search (0 = disabled).
    pub children_depth: u32,

    /// Filter out products that are out of stock.
    pub in_stock_only: bool,
}

impl FetchOptions {
    fn children_enabled(&self) -> bool {
        self.include_children && self.children_depth > 0
    }
}

impl From<&crate::config::BlocksConfig> for FetchOptions {
    fn from(blocks: &crate::config::BlocksConfig) -> Self {
        Self {
            include_children: blocks.include_children,
            children_depth: blocks.children_depth,
            in_stock_only: blocks.in_stock_only,
        }
    }
}

/// How many products to request when `limit` results must survive the stock
/// filter: double the limit with a floor of `limit + 4`, capped at 60.
pub fn over_fetch_limit(limit: usize, in_stock_only: bool) -> usize {
    if in_stock_only {
        (limit * 2).max(limit + 4).min(60)
    } else {
        limit
    }
}

/// The tiered product fetcher.
pub struct ProductFetcher {
    catalog: Arc<dyn Catalog>,
    search: Arc<dyn SearchProvider>,
    presenter: Presenter,
    cache: MemoCache,
    shop: ShopConfig,

    /// Shared cache version; bumped externally on settings changes.
    version: Arc<AtomicU64>,
}

impl ProductFetcher {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        search: Arc<dyn SearchProvider>,
        shop: ShopConfig,
        cache: MemoCache,
        version: Arc<AtomicU64>,
    ) -> Self {
        Self {
            catalog,
            search,
            presenter: Presenter::new(shop.clone()),
            cache,
            shop,
            version,
        }
    }

    /// The memo cache, for stats and explicit purges.
    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    /// Fetch up to `limit` presented products for a category.
    ///
    /// Results are memoized per (version, category, sort, limit, shop
    /// context, options); a cache hit skips the pipeline entirely.
    pub async fn products_for_category(
        &self,
        category: CategoryId,
        sort: SortOrder,
        limit: usize,
        options: FetchOptions,
    ) -> Result<Vec<PresentedProduct>, FetchError> {
        let key = self.cache_key(category, sort, limit, options);

        if let Some(products) = self.cache.get(&key).await {
            debug!(%category, key, "fetch memo hit");
            return Ok(products);
        }

        let products = self.fetch_uncached(category, sort, limit, options).await?;
        self.cache.insert(key, products.clone()).await;
        Ok(products)
    }

    /// Version-stamped cache key covering every query parameter.
    fn cache_key(
        &self,
        category: CategoryId,
        sort: SortOrder,
        limit: usize,
        options: FetchOptions,
    ) -> String {
        format!(
            "shelf_v{}_cat_{}_{}_{}_lang{}_shop{}_cur{}_grp{}_ch{}_d{}_is{}",
            self.version.load(Ordering::Relaxed),
            category,
            sort.key(),
            limit,
            self.shop.language_id,
            self.shop.shop_id,
            self.shop.currency_id,
            self.shop.customer_group_id,
            options.include_children as u8,
            options.children_depth,
            options.in_stock_only as u8,
        )
    }

    /// The fetch pipeline, without memoization.
    async fn fetch_uncached(
        &self,
        category: CategoryId,
        sort: SortOrder,
        limit: usize,
        options: FetchOptions,
    ) -> Result<Vec<PresentedProduct>, FetchError> {
        let fetch_limit = over_fetch_limit(limit, options.in_stock_only);

        // Tier 1: structured search provider. Errors degrade to an empty
        // result so the fallback tiers still run.
        let query = SearchQuery {
            category,
            sort,
            results_per_page: fetch_limit,
        };
        let mut presented = match self.search.run_query(&query).await {
            Ok(result) => self
                .presenter
                .present(result.products, limit, options.in_stock_only),
            Err(e) => {
                warn!(%category, error = %e, "search provider failed, falling back to direct listing");
                Vec::new()
            }
        };

        // Tier 2: direct category listing.
        if presented.is_empty() {
            let raw = self
                .catalog
                .category_products(category, sort, fetch_limit)
                .await?;
            presented = self.presenter.present(raw, limit, options.in_stock_only);

            // Parent has nothing at all: children become the primary source.
            if presented.is_empty() && options.children_enabled() {
                let raw = self
                    .collect_from_children(category, limit, sort, options.children_depth, fetch_limit)
                    .await?;
                presented = self.presenter.present(raw, limit, options.in_stock_only);
            }
        }

        // Tier 3: child-category top-up when the parent came up short.
        if options.children_enabled() && presented.len() < limit {
            let remaining = limit - presented.len();
            let child_fetch_limit = over_fetch_limit(remaining, options.in_stock_only);
            let raw = self
                .collect_from_children(
                    category,
                    remaining,
                    sort,
                    options.children_depth,
                    child_fetch_limit,
                )
                .await?;
            let extra = self.presenter.present(raw, remaining, options.in_stock_only);

            let mut seen: HashSet<ProductId> = presented.iter().map(|p| p.id).collect();
            for product in extra {
                if presented.len() >= limit {
                    break;
                }
                if seen.insert(product.id) {
                    presented.push(product);
                }
            }
        }

        debug!(%category, %sort, limit, count = presented.len(), "fetch pipeline complete");
        Ok(presented)
    }

    /// Collect raw products from child categories, depth-limited.
    ///
    /// Walks children in tree order; recurses one level deeper per child
    /// while `depth > 1` and results remain short. Deduplicates by product
    /// ID and stops as soon as `limit` products are collected. A child that
    /// errors is skipped, never fatal.
    fn collect_from_children<'a>(
        &'a self,
        category: CategoryId,
        limit: usize,
        sort: SortOrder,
        depth: u32,
        per_node_limit: usize,
    ) -> BoxFuture<'a, Result<Vec<RawProduct>, FetchError>> {
        async move {
            let children = self.catalog.child_categories(category).await?;
            let mut collected: Vec<RawProduct> = Vec::new();
            let mut seen: HashSet<ProductId> = HashSet::new();

            'children: for child in children {
                let raw = match self
                    .catalog
                    .category_products(child.id, sort, per_node_limit)
                    .await
                {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(category = %child.id, error = %e, "child category listing failed, skipping");
                        continue;
                    }
                };

                for product in raw {
                    if seen.insert(product.id) {
                        collected.push(product);
                        if collected.len() >= limit {
                            break 'children;
                        }
                    }
                }

                if depth > 1 && collected.len() < limit {
                    let deeper = self
                        .collect_from_children(
                            child.id,
                            limit - collected.len(),
                            sort,
                            depth - 1,
                            per_node_limit,
                        )
                        .await?;
                    for product in deeper {
                        if seen.insert(product.id) {
                            collected.push(product);
                            if collected.len() >= limit {
                                break;
                            }
                        }
                    }
                }
            }

            Ok(collected)
        }
        .boxed()
    }
}
