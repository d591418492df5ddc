// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Expiring in-memory cache
//!
//! [`ExpiringCache`] maps opaque string keys to values that carry an absolute
//! expiration instant. It is the only shared mutable state in the crate and
//! is safe to share across tasks behind an `Arc`.
//!
//! - Reads take a shared lock; hit/miss accounting uses atomics.
//! - Expired entries are removed lazily by the `get` that finds them.
//! - [`ExpiringCache::spawn_sweeper`] optionally bounds memory held by keys
//!   that expire and are never read again.
//!
//! # Examples
//!
//! ```rust,ignore
//! use coinchart::cache::ExpiringCache;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let cache = Arc::new(ExpiringCache::new());
//! cache.set("prices:bitcoin:1d", series, Duration::from_secs(300)).await;
//!
//! // Periodically drop expired entries; stops when `_sweeper` is dropped
//! let _sweeper = cache.spawn_sweeper(Duration::from_secs(60));
//! ```

use serde::{Deserialize, Serialize};

mod expiring;
mod sweeper;

pub use expiring::ExpiringCache;
pub use sweeper::SweeperHandle;

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of lookups that returned a live value
    pub hits: u64,
    /// Number of lookups that returned nothing (absent or expired)
    pub misses: u64,
    /// Number of entries removed because their TTL had passed
    pub expirations: u64,
    /// Current number of stored entries, expired ones included
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage (0.0 - 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.hits as f64 / total as f64) * 100.0
    }
}
