//! The product fetch pipeline.
//!
//! - [`fetcher`]: tiered fetch with fallback, child top-up, and memoization
//! - [`present`]: raw listing → template-ready product normalization
//! - [`cache`]: TTL memo cache behind the version-stamped fetch keys

pub mod cache;
pub mod fetcher;
pub mod present;
