//! In-process cache backend

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::manager::expiry_after;
use super::{CacheBackend, CacheError};

struct MemoryEntry {
    body: String,
    expires_at: DateTime<Utc>,
}

/// Thread-safe in-memory cache with per-entry TTL expiration
///
/// Expired entries are dropped lazily on the next read of their key.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(entry) = self.entries.get(key) {
            if Utc::now() <= entry.expires_at {
                return Ok(Some(entry.body.clone()));
            }
        }
        // A concurrent put may have replaced the stale entry in the meantime
        self.entries
            .remove_if(key, |_, entry| Utc::now() > entry.expires_at);
        Ok(None)
    }

    fn put(&self, key: &str, body: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let expires_at = expiry_after(Utc::now(), ttl_secs);
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                body: body.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_put_then_get() {
        let cache = MemoryCache::new();
        cache.put("region-1", "{\"id\":1}", 60).unwrap();
        assert_eq!(cache.get("region-1").unwrap().as_deref(), Some("{\"id\":1}"));
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("missing").unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = MemoryCache::new();
        cache.put("sknace-1", "[]", 0).unwrap();
        assert_eq!(cache.len(), 1);

        thread::sleep(StdDuration::from_millis(10));

        assert!(cache.get("sknace-1").unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let cache = MemoryCache::new();
        cache.put("forever", "1", u64::MAX).unwrap();
        assert_eq!(cache.get("forever").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_stale_read_never_evicts_fresh_write() {
        let cache = MemoryCache::new();
        for _ in 0..200 {
            cache.put("isco-1", "old", 0).unwrap();
            thread::sleep(StdDuration::from_micros(50));
            thread::scope(|scope| {
                scope.spawn(|| {
                    for _ in 0..50 {
                        let _ = cache.get("isco-1");
                    }
                });
                cache.put("isco-1", "new", 60).unwrap();
            });
            assert_eq!(cache.get("isco-1").unwrap().as_deref(), Some("new"));
        }
    }
}
