//! Cache key derivation
//!
//! Search keys hash the canonical (sorted-key) JSON form of a normalized
//! query. The digest is truncated to 64 bits: keys stay short and file-name
//! safe, and a rare collision only serves a wrong lookup result.

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::data::ResourceQuery;
use crate::error::HarveyError;

/// Derives `"<prefix>-<16 hex digits>"` from a query
///
/// The query is expected to be normalized already; parameter order does not
/// affect the key.
pub fn build_key(prefix: &str, query: &ResourceQuery) -> Result<String, HarveyError> {
    let canonical = serde_json::to_string(&query.canonical())?;
    let key = format!("{}-{}", prefix, digest64(canonical.as_bytes()));
    debug!(%key, %canonical, "derived cache key");
    Ok(key)
}

/// Key for a single record: the raw identifier when it is file-name safe,
/// its digest otherwise
pub fn record_key(resource: &str, id: &str) -> String {
    let safe = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if safe {
        format!("{}-{}", resource, id)
    } else {
        format!("{}-{}", resource, digest64(id.as_bytes()))
    }
}

fn digest64(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    format!("{:016x}", u64::from_be_bytes(head))
}
