//! Runtime configuration for home-shelf.
//!
//! Configuration can be loaded from a JSON file or constructed programmatically.
//! The block settings (`BlocksConfig`) are the admin-facing knobs; everything
//! else is deployment wiring (listen address, catalog snapshot, shop context).

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::catalog::types::CategoryId;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "home-shelf", about = "Storefront home page product block service")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides the config file).
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Catalog snapshot configuration.
    pub catalog: CatalogConfig,

    /// Shop context (language, currency, URLs).
    pub shop: ShopConfig,

    /// Home page block settings.
    pub blocks: BlocksConfig,

    /// Memoization cache settings.
    pub cache: CacheConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080").
    pub listen: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Catalog snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the JSON catalog snapshot.
    pub catalog_path: PathBuf,

    /// Image URL used for categories without one of their own.
    pub placeholder_image: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("catalog.json"),
            placeholder_image: "/img/no-picture.jpg".to_string(),
        }
    }
}

/// Shop context: identifies which storefront view products are presented for.
///
/// All four IDs participate in the fetch cache key so that results for
/// different languages/shops/currencies/customer groups never collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Language ID.
    pub language_id: u32,

    /// Shop ID (multi-store deployments).
    pub shop_id: u32,

    /// Currency ID.
    pub currency_id: u32,

    /// Customer group ID used for pricing.
    pub customer_group_id: u32,

    /// Currency code appended to formatted prices.
    pub currency: String,

    /// Base URL for product and category links.
    pub base_url: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            language_id: 1,
            shop_id: 1,
            currency_id: 1,
            customer_group_id: 1,
            currency: "EUR".to_string(),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// The six admin-visible block settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksConfig {
    /// Categories to render blocks for, in display order.
    pub category_ids: Vec<CategoryId>,

    /// Sort key: position_asc/desc, date_asc/desc, price_asc/desc, random.
    pub sort_order: String,

    /// Products shown per block.
    pub products_per_block: usize,

    /// Pull from child categories when the parent comes up short.
    pub include_children: bool,

    /// How many levels of subcategory to search (0 = disabled).
    pub children_depth: u32,

    /// Filter out products that are out of stock.
    pub in_stock_only: bool,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            category_ids: Vec::new(),
            sort_order: "date_desc".to_string(),
            products_per_block: 8,
            include_children: true,
            children_depth: 1,
            in_stock_only: false,
        }
    }
}

impl BlocksConfig {
    /// Clamp submitted settings to sane values.
    ///
    /// Applied on every settings update: at least one product per block, and
    /// zero-valued category IDs dropped.
    pub fn sanitize(&mut self) {
        self.products_per_block = self.products_per_block.max(1);
        self.category_ids.retain(|id| id.0 > 0);
    }
}

/// Memoization cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live for memoized fetch results, in seconds.
    pub ttl_secs: u64,

    /// Initial cache version. Bumped on every settings change to invalidate
    /// all previously cached fetch results without enumerating keys.
    pub version: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            version: 1,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when the
    /// file is absent.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let mut config: Config = serde_json::from_str(&data)?;
            config.blocks.sanitize();
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}
