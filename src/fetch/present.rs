//! Product presentation: normalizes raw catalog listings into the shape the
//! template layer consumes.
//!
//! Every presented product carries the full image size roster, mirrored
//! url/link fields, and price/flag defaults, so templates never need to
//! null-check. Missing sizes are backfilled from their closest equivalents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::types::{ProductId, RawProduct};
use crate::config::ShopConfig;

/// Image size roster the storefront themes expect, with nominal dimensions.
const COVER_SIZES: &[(&str, u32, u32)] = &[
    ("default_xs", 80, 80),
    ("default_sm", 98, 98),
    ("default_md", 250, 250),
    ("default_lg", 800, 800),
    ("default_s", 98, 98),
    ("default_m", 250, 250),
    ("default_l", 800, 800),
    ("home_default", 250, 250),
    ("home_default_2x", 500, 500),
    ("small_default", 98, 98),
    ("medium_default", 452, 452),
    ("large_default", 800, 800),
    ("cart_default", 125, 125),
    ("product_main", 800, 800),
    ("product_main_2x", 1600, 1600),
];

/// Sizes filled directly from the source cover URL; the rest are backfilled.
const SOURCE_SIZES: &[&str] = &[
    "default_xs",
    "default_sm",
    "default_md",
    "default_lg",
    "home_default",
    "home_default_2x",
    "small_default",
    "medium_default",
    "large_default",
    "cart_default",
];

/// A single cover image rendition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl CoverImage {
    fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// Cover imagery keyed by theme size name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    pub by_size: BTreeMap<String, CoverImage>,
    pub legend: String,
}

impl Cover {
    /// Build a cover from an optional source URL, filling the source sizes.
    pub fn from_source(source: Option<&str>) -> Self {
        let mut by_size = BTreeMap::new();
        for &(name, width, height) in COVER_SIZES {
            let image = match source {
                Some(url) if SOURCE_SIZES.contains(&name) => CoverImage {
                    url: url.to_string(),
                    width,
                    height,
                },
                _ => CoverImage::default(),
            };
            by_size.insert(name.to_string(), image);
        }
        Self {
            by_size,
            legend: String::new(),
        }
    }

    /// Ensure every theme size key exists and backfill the derived sizes:
    /// `default_{s,m,l}` from `default_{sm,md,lg}`, `product_main` from the
    /// large/medium/home renditions, and `product_main_2x` from
    /// `product_main`. An empty legend defaults to the product name.
    pub fn normalize(&mut self, product_name: &str) {
        for &(name, _, _) in COVER_SIZES {
            self.by_size.entry(name.to_string()).or_default();
        }

        self.backfill("default_m", "default_md");
        self.backfill("default_s", "default_sm");
        self.backfill("default_l", "default_lg");

        if self.size("product_main").is_empty() {
            for source in ["large_default", "medium_default", "home_default"] {
                if !self.size(source).is_empty() {
                    self.backfill("product_main", source);
                    break;
                }
            }
        }
        self.backfill("product_main_2x", "product_main");

        if self.legend.is_empty() {
            self.legend = product_name.to_string();
        }
    }

    fn size(&self, name: &str) -> CoverImage {
        self.by_size.get(name).cloned().unwrap_or_default()
    }

    fn backfill(&mut self, dst: &str, src: &str) {
        if self.size(dst).is_empty() {
            let source = self.size(src);
            if !source.is_empty() {
                self.by_size.insert(dst.to_string(), source);
            }
        }
    }
}

/// A template-ready product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedProduct {
    pub id: ProductId,
    pub name: String,
    pub description_short: String,

    /// Formatted price for display.
    pub price: String,

    /// Raw price amount.
    pub price_amount: f64,

    pub has_discount: bool,
    pub show_price: bool,

    pub quantity: i64,
    pub available: bool,

    /// Canonical product URL; `url` and `link` always mirror each other.
    pub url: String,
    pub link: String,

    pub cover: Cover,
    pub flags: Vec<String>,
}

/// Presents raw catalog listings for the template layer.
#[derive(Debug, Clone)]
pub struct Presenter {
    shop: ShopConfig,
}

impl Presenter {
    pub fn new(shop: ShopConfig) -> Self {
        Self { shop }
    }

    /// Present raw products, applying the stock filter and trimming to
    /// `limit`. Input order is preserved.
    pub fn present(
        &self,
        raw_products: Vec<RawProduct>,
        limit: usize,
        in_stock_only: bool,
    ) -> Vec<PresentedProduct> {
        let mut presented = Vec::with_capacity(limit.min(raw_products.len()));
        for raw in raw_products {
            if in_stock_only && (!raw.available || raw.quantity <= 0) {
                continue;
            }
            presented.push(self.present_one(raw));
            if presented.len() >= limit {
                break;
            }
        }
        presented
    }

    /// Present a single raw product.
    pub fn present_one(&self, raw: RawProduct) -> PresentedProduct {
        let url = raw
            .url
            .clone()
            .unwrap_or_else(|| self.product_url(&raw));

        let mut cover = Cover::from_source(raw.cover.as_deref());
        cover.normalize(&raw.name);

        PresentedProduct {
            id: raw.id,
            name: raw.name,
            description_short: raw.description_short,
            price: self.format_price(raw.price),
            price_amount: raw.price,
            has_discount: false,
            show_price: true,
            quantity: raw.quantity,
            available: raw.available,
            link: url.clone(),
            url,
            cover,
            flags: Vec::new(),
        }
    }

    /// Canonical product URL from the product ID and link rewrite.
    fn product_url(&self, raw: &RawProduct) -> String {
        format!("{}/product/{}-{}", self.shop.base_url, raw.id, raw.link_rewrite)
    }

    /// Formatted price with the shop currency code.
    pub fn format_price(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.shop.currency)
    }
}
