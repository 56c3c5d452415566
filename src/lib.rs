//! home-shelf: configurable category product blocks for a storefront home page.
//!
//! A store administrator picks category IDs, a sort order, a per-block result
//! count, and child/stock filters. At render time each category is resolved to
//! a list of presentable products through a tiered fetch pipeline:
//!   search provider (hot path) → direct category listing → child-category
//!   top-up, deduplicated across tiers, stock-filtered, and memoized behind a
//!   version-stamped cache key.
//!
//! Exposes a JSON HTTP API for the template layer and the admin settings form.

pub mod blocks;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod server;
