//! Time-bounded document cache implementation
//!
//! Entries expire a fixed duration after they were stored. Expired entries are
//! removed lazily when a read finds them, or in bulk by [`DocumentCache::cleanup`].

use crate::cache::DocumentBytes;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Default time-to-live for cached documents
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// A cached document together with its expiry timestamp
#[derive(Debug, Clone)]
pub struct CachedDocument {
    /// The raw document bytes
    pub data: DocumentBytes,

    /// When this entry stops being served
    pub expires_at: DateTime<Utc>,
}

impl CachedDocument {
    /// Creates a new entry expiring `ttl` from now
    ///
    /// A `ttl` reaching past the last representable instant never expires.
    pub fn new(data: DocumentBytes, ttl: Duration) -> Self {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { data, expires_at }
    }

    /// Checks if the entry has expired at the given instant
    ///
    /// An entry is still valid at exactly `expires_at`; it is stale only once
    /// `now` has moved past it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks if the entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Thread-safe map from source location to document bytes
///
/// Readers share a read lock. A read that finds an expired entry takes the
/// write lock and re-checks before deleting, so an entry refreshed in between
/// by a concurrent [`set`](DocumentCache::set) survives.
#[derive(Debug)]
pub struct DocumentCache {
    entries: RwLock<HashMap<String, CachedDocument>>,
    ttl: Duration,
}

impl DocumentCache {
    /// Creates an empty cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// The time-to-live applied by [`set`](DocumentCache::set)
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the bytes stored under `key` if present and not expired
    ///
    /// # Arguments
    ///
    /// * `key` - The source location the document was stored under
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - A fresh entry exists
    /// * `None` - No entry, or the entry had expired (it is evicted)
    pub fn get(&self, key: &str) -> Option<DocumentBytes> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired() => return Some(entry.data.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                tracing::debug!("Evicted expired cache entry {}", key);
                None
            }
            Some(entry) => Some(entry.data.clone()),
            None => None,
        }
    }

    /// Stores `data` under `key`, replacing any previous entry
    pub fn set(&self, key: impl Into<String>, data: DocumentBytes) {
        let entry = CachedDocument::new(data, self.ttl);
        self.entries.write().insert(key.into(), entry);
    }

    /// Removes every expired entry
    ///
    /// # Returns
    ///
    /// The number of entries removed
    pub fn cleanup(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("Cache cleanup removed {} expired entries", removed);
        }
        removed
    }

    /// Number of entries currently held, expired or not
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[cfg(test)]
    fn insert_entry(&self, key: &str, entry: CachedDocument) {
        self.entries.write().insert(key.to_string(), entry);
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TTL_HOURS))
    }
}
