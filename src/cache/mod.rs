//! Response caching for raw API bodies
//!
//! Bodies are stored as the raw JSON text returned by the API, keyed by a
//! string derived from the resource and its normalized query (see [`key`]).
//! Entries expire after a fixed TTL and are never invalidated otherwise.
//!
//! Two backends are provided: an in-process [`MemoryCache`] and the on-disk
//! [`CacheManager`]. Anything implementing [`CacheBackend`] can be plugged in.

pub mod key;
mod manager;
mod memory;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::error::HarveyError;

pub use key::{build_key, record_key};
pub use manager::{CacheManager, StoredResponse};
pub use memory::MemoryCache;

/// Errors raised by cache backends
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the backing store failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry could not be encoded or decoded
    #[error("cache entry is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A store for raw response bodies with per-entry expiry
///
/// Implementations must treat expired entries as absent.
pub trait CacheBackend: Send + Sync {
    /// Returns the body stored under `key` if present and not expired
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `body` under `key`, expiring `ttl_secs` seconds from now
    fn put(&self, key: &str, body: &str, ttl_secs: u64) -> Result<(), CacheError>;
}

/// Get-or-compute wrapper around a cache backend with a fixed TTL
///
/// There is no single-flight guarantee: two concurrent misses for the same
/// key both run their computation and the last write wins.
#[derive(Clone)]
pub struct ResultCache {
    backend: Arc<dyn CacheBackend>,
    ttl_secs: u64,
}

impl ResultCache {
    /// Wraps `backend`, storing every computed body for `ttl_secs`
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_secs: u64) -> Self {
        Self { backend, ttl_secs }
    }

    /// Lifetime of newly stored entries, in seconds
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Returns the cached body for `key`, or runs `compute` and caches its result
    ///
    /// A failing `compute` propagates unchanged and leaves the cache untouched.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<String, HarveyError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, HarveyError>>,
    {
        if let Some(body) = self.backend.get(key)? {
            debug!(key, "cache hit");
            return Ok(body);
        }

        debug!(key, "cache miss");
        let body = compute().await?;
        self.backend.put(key, &body, self.ttl_secs)?;
        Ok(body)
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
