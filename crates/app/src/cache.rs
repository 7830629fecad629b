//! Product cache.
//!
//! An in-process TTL cache for product reads. It is a performance aid only:
//! every stock-changing transaction invalidates the affected entry after
//! commit, and no mutating path ever consults it. Readers may observe a
//! stale `stock` value; the authoritative check always happens under a row
//! lock in the store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use crate::domain::products::records::{ProductId, ProductRecord};

#[derive(Debug, Clone)]
struct CacheEntry {
    record: ProductRecord,
    cached_at: Instant,
}

#[derive(Debug, Clone)]
pub struct ProductCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<ProductId, CacheEntry>>>,
}

impl ProductCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Cached product, if present and not expired.
    #[must_use]
    pub fn get(&self, product: ProductId) -> Option<ProductRecord> {
        let entries = self.entries.read().expect("product cache lock poisoned");

        entries
            .get(&product)
            .filter(|entry| entry.cached_at.elapsed() <= self.ttl)
            .map(|entry| entry.record.clone())
    }

    pub fn set(&self, record: ProductRecord) {
        let mut entries = self.entries.write().expect("product cache lock poisoned");

        entries.insert(
            record.id,
            CacheEntry {
                record,
                cached_at: Instant::now(),
            },
        );
    }

    pub fn forget(&self, product: ProductId) {
        let mut entries = self.entries.write().expect("product cache lock poisoned");

        entries.remove(&product);
    }
}
