//! Home page block assembly.
//!
//! Loops over the configured category IDs and pairs each category's metadata
//! with its fetched product list. One broken or empty category never takes
//! down the page: failures are logged and the category is skipped.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::sort::SortOrder;
use crate::catalog::types::CategoryId;
use crate::catalog::Catalog;
use crate::config::BlocksConfig;
use crate::fetch::fetcher::{FetchOptions, ProductFetcher};
use crate::fetch::present::PresentedProduct;

/// A rendered unit pairing a store category with a curated product list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBlock {
    pub id: CategoryId,
    pub name: String,

    /// Tag-stripped, trimmed category description.
    pub description: String,

    /// Category image URL, or the placeholder when none is set.
    pub image: String,

    /// Canonical category link.
    pub link: String,

    pub products: Vec<PresentedProduct>,
}

/// Assemble the home page blocks from the current settings.
///
/// Categories that are unknown, fail to fetch, or resolve to zero products
/// are skipped.
pub async fn assemble_home_blocks(
    catalog: &dyn Catalog,
    fetcher: &ProductFetcher,
    settings: &BlocksConfig,
    placeholder_image: &str,
    base_url: &str,
) -> Vec<CategoryBlock> {
    if settings.category_ids.is_empty() {
        return Vec::new();
    }

    let sort = SortOrder::parse(&settings.sort_order);
    let limit = settings.products_per_block;
    let options = FetchOptions::from(settings);

    let mut blocks = Vec::new();
    for &category_id in &settings.category_ids {
        let products = match fetcher
            .products_for_category(category_id, sort, limit, options)
            .await
        {
            Ok(products) => products,
            Err(e) => {
                warn!(category = %category_id, error = %e, "block fetch failed, skipping category");
                continue;
            }
        };

        if products.is_empty() {
            debug!(category = %category_id, "no products, skipping block");
            continue;
        }

        let category = match catalog.category(category_id).await {
            Ok(Some(category)) => category,
            Ok(None) => {
                warn!(category = %category_id, "configured category does not exist, skipping block");
                continue;
            }
            Err(e) => {
                warn!(category = %category_id, error = %e, "category lookup failed, skipping block");
                continue;
            }
        };

        blocks.push(CategoryBlock {
            id: category.id,
            name: category.name,
            description: strip_tags(&category.description),
            image: category
                .image
                .unwrap_or_else(|| placeholder_image.to_string()),
            link: format!("{base_url}/category/{}-{}", category.id, category.link_rewrite),
            products,
        });
    }

    blocks
}

/// Remove markup tags and trim surrounding whitespace.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}
