//! TTL memo cache for presented fetch results.
//!
//! Keys carry the cache version (see the fetcher's key builder), so a version
//! bump invalidates every prior entry without enumeration. Stranded entries
//! age out through the TTL or an explicit purge.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::fetch::present::PresentedProduct;

/// Cache hit/miss counters for the stats endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone)]
struct Entry {
    products: Vec<PresentedProduct>,
    inserted_at: Instant,
}

/// Memoization cache for per-category fetch results.
pub struct MemoCache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoCache {
    /// Create a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a key. Expired entries count as misses and are dropped.
    pub async fn get(&self, key: &str) -> Option<Vec<PresentedProduct>> {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.products.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.entries.write().await.remove(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a computed result.
    pub async fn insert(&self, key: String, products: Vec<PresentedProduct>) {
        self.entries.write().await.insert(
            key,
            Entry {
                products,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop all entries past their TTL. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of entries currently held (including not-yet-purged expired ones).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Hit/miss counters since startup.
    pub fn counters(&self) -> CacheCounters {
        CacheCounters {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
