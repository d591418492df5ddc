// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Key-value store with per-entry expiration

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::CacheStats;

/// Upper bound on how far in the future an entry may expire.
///
/// Keeps `Instant + ttl` from overflowing for absurd TTLs.
const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Entry in the cache: the value and the instant it stops being served
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl.min(MAX_TTL),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
}

/// Thread-safe in-memory cache with absolute per-entry expiration
///
/// Values are cloned out on read, so `V` should be cheap to clone (the crate
/// stores `Arc`-backed series and small structs).
///
/// # Guarantees
///
/// - `get` never returns a value whose expiration instant has passed.
/// - `set` always replaces the previous value and TTL for the key.
/// - No lock is held across an `.await` other than lock acquisition itself.
///
/// # Performance
///
/// - Get: O(1) average, shared lock; expired hits briefly take the write lock
/// - Set: O(1) average, exclusive lock for one map insertion
/// - Purge: O(n), exclusive lock
#[derive(Debug)]
pub struct ExpiringCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    counters: Counters,
}

impl<V> Default for ExpiringCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            counters: Counters::default(),
        }
    }
}

impl<V: Clone> ExpiringCache<V> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, expiring `ttl` from now
    ///
    /// Unconditionally overwrites any existing entry for `key`.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let entry = CacheEntry::new(value, ttl);
        trace!(key = %key, ttl_ms = ttl.as_millis() as u64, "Storing cache entry");
        self.entries.write().await.insert(key, entry);
    }

    /// Returns the live value for `key`, if any
    ///
    /// An entry found expired is removed before returning `None`.
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(Instant::now()) => {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(key, "Cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.counters.misses.fetch_add(1, Ordering::Relaxed);
                    debug!(key, "Cache miss");
                    return None;
                }
            }
        }

        // Expired under the read lock. Re-check under the write lock since a
        // concurrent `set` may have refreshed the entry in between.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key) {
            if entry.is_live(Instant::now()) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Cache hit");
                return Some(entry.value.clone());
            }
            entries.remove(key);
            self.counters.expirations.fetch_add(1, Ordering::Relaxed);
            debug!(key, "Cache entry expired");
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Removes `key`, returning its value if it was still live
    pub async fn remove(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.entries
            .write()
            .await
            .remove(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value)
    }

    /// Removes every expired entry and returns how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let removed = before - entries.len();

        if removed > 0 {
            self.counters
                .expirations
                .fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, remaining = entries.len(), "Purged expired cache entries");
        }

        removed
    }

    /// Removes all entries
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        debug!(entries = entries.len(), "Clearing cache");
        entries.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries at all
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of the cache counters
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
            entries: self.len().await,
        }
    }
}
