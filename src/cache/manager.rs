//! On-disk cache backend
//!
//! One JSON file per cache key under the XDG cache directory
//! (`~/.cache/harvey-client/` on Linux), so cached responses survive
//! process restarts.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{CacheBackend, CacheError};

/// A response body as persisted on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    /// Raw JSON text returned by the API
    pub body: String,
    /// When the body was written
    pub stored_at: DateTime<Utc>,
    /// The entry is stale after this instant
    pub expires_at: DateTime<Utc>,
}

impl StoredResponse {
    fn new(body: &str, ttl_secs: u64) -> Self {
        let stored_at = Utc::now();
        Self {
            body: body.to_string(),
            stored_at,
            expires_at: expiry_after(stored_at, ttl_secs),
        }
    }

    /// Whether the entry may still be served
    pub fn is_fresh(&self) -> bool {
        Utc::now() <= self.expires_at
    }
}

/// `start + ttl_secs`, saturating at the latest representable instant
pub(crate) fn expiry_after(start: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| start.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// File-per-key response cache
///
/// Stale files are left in place; [`CacheBackend::get`] reports them as
/// misses and the next `put` overwrites them.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Uses the platform cache directory for `harvey-client`
    ///
    /// `None` when no home directory can be determined.
    pub fn new() -> Option<Self> {
        ProjectDirs::from("", "", "harvey-client").map(|dirs| Self::with_dir(dirs.cache_dir().to_path_buf()))
    }

    /// Stores entries under `cache_dir` instead of the platform default
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.json"))
    }

    /// Loads the stored entry for `key`, fresh or not
    pub fn load(&self, key: &str) -> Result<Option<StoredResponse>, CacheError> {
        let raw = match fs::read_to_string(self.entry_path(key)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persists `body` under `key`, creating the directory on first use
    pub fn store(&self, key: &str, body: &str, ttl_secs: u64) -> Result<StoredResponse, CacheError> {
        fs::create_dir_all(&self.cache_dir)?;
        let entry = StoredResponse::new(body, ttl_secs);
        fs::write(self.entry_path(key), serde_json::to_vec(&entry)?)?;
        Ok(entry)
    }
}

impl CacheBackend for CacheManager {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self
            .load(key)?
            .filter(StoredResponse::is_fresh)
            .map(|entry| entry.body))
    }

    fn put(&self, key: &str, body: &str, ttl_secs: u64) -> Result<(), CacheError> {
        self.store(key, body, ttl_secs).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;
    use tempfile::TempDir;

    fn disk_cache() -> (CacheManager, TempDir) {
        let dir = TempDir::new().unwrap();
        (CacheManager::with_dir(dir.path().to_path_buf()), dir)
    }

    #[test]
    fn test_put_writes_one_file_per_key() {
        let (cache, dir) = disk_cache();
        cache.put("isco-7233011", r#"{"code":"7233011"}"#, 60).unwrap();

        let file = dir.path().join("isco-7233011.json");
        let raw = fs::read_to_string(file).unwrap();
        let entry: StoredResponse = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry.body, r#"{"code":"7233011"}"#);
        assert!(entry.expires_at > entry.stored_at);
    }

    #[test]
    fn test_missing_key_is_a_miss() {
        let (cache, _dir) = disk_cache();
        assert_eq!(cache.get("search-school-0123456789abcdef").unwrap(), None);
        assert_eq!(cache.load("search-school-0123456789abcdef").unwrap(), None);
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let (cache, _dir) = disk_cache();
        cache.put("school-1", "[1,2]", 60).unwrap();
        assert_eq!(cache.get("school-1").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_stale_entry_is_a_miss_but_stays_on_disk() {
        let (cache, _dir) = disk_cache();
        cache.put("kov-1", "{}", 0).unwrap();
        std::thread::sleep(StdDuration::from_millis(10));

        assert_eq!(cache.get("kov-1").unwrap(), None);
        let stale = cache.load("kov-1").unwrap().unwrap();
        assert!(!stale.is_fresh());
        assert_eq!(stale.body, "{}");
    }

    #[test]
    fn test_corrupt_file_is_a_serialization_error() {
        let (cache, dir) = disk_cache();
        fs::write(dir.path().join("broken.json"), "not json").unwrap();
        assert!(matches!(cache.get("broken"), Err(CacheError::Serialization(_))));
    }

    #[test]
    fn test_directory_is_created_on_first_store() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = CacheManager::with_dir(nested.clone());
        assert!(!nested.exists());

        cache.put("region-1", "{}", 60).unwrap();
        assert!(nested.join("region-1.json").is_file());
    }

    #[test]
    fn test_store_replaces_previous_body() {
        let (cache, _dir) = disk_cache();
        cache.put("country-703", "old", 60).unwrap();
        cache.put("country-703", "new", 60).unwrap();
        assert_eq!(cache.get("country-703").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_dotted_keys_do_not_collide() {
        let (cache, _dir) = disk_cache();
        cache.put("kov-1.5", "a", 60).unwrap();
        cache.put("kov-1.6", "b", 60).unwrap();
        assert_eq!(cache.get("kov-1.5").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, u64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(expiry_after(now, 0), now);
    }

    #[test]
    fn test_default_location_names_the_crate() {
        if let Some(cache) = CacheManager::new() {
            assert!(cache.cache_dir().to_string_lossy().contains("harvey-client"));
        }
    }
}
