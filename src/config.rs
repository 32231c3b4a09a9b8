//! Client configuration
//!
//! Settings can be built in code or loaded from the environment (and a `.env`
//! file, if present):
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `HARVEY_URL` | API base URL | required |
//! | `HARVEY_USERNAME` | Basic auth user | required |
//! | `HARVEY_PASSWORD` | Basic auth password | required |
//! | `HARVEY_CACHE_TTL` | Cache TTL in seconds | 86400 |
//! | `HARVEY_LANGUAGE` | `Accept-Language` value | `sk_SK` |
//! | `HARVEY_PER_PAGE` | Default page size | 15 |

use std::fmt;
use std::str::FromStr;

use crate::data::DEFAULT_PER_PAGE;
use crate::error::HarveyError;

/// Cache TTL in seconds (24 hours)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

/// Language requested from the API
pub const DEFAULT_LANGUAGE: &str = "sk_SK";

/// Connection and caching settings for `HarveyClient`
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root; requests go to `{base_url}/api/...`
    pub base_url: String,
    /// HTTP Basic user
    pub username: String,
    /// HTTP Basic password
    pub password: String,
    /// How long a cached response stays fresh, in seconds
    pub cache_ttl_secs: u64,
    /// Value of the `Accept-Language` header
    pub language: String,
    /// Page size used by [`HarveyClient::page`](crate::HarveyClient::page)
    pub per_page: u32,
}

impl ClientConfig {
    /// Settings with default TTL, language and page size
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            language: DEFAULT_LANGUAGE.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Sets the cache TTL in seconds
    pub fn with_cache_ttl(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Sets the `Accept-Language` locale, e.g. `en_US`
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the default page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Loads `.env` (if any) and reads the `HARVEY_*` variables
    pub fn from_env() -> Result<Self, HarveyError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarveyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| HarveyError::Config(format!("{} is not set", name)))
        };

        let mut config = Self::new(
            required("HARVEY_URL")?,
            required("HARVEY_USERNAME")?,
            required("HARVEY_PASSWORD")?,
        );

        if let Some(ttl) = lookup("HARVEY_CACHE_TTL") {
            config.cache_ttl_secs = parse_number("HARVEY_CACHE_TTL", &ttl)?;
        }
        if let Some(language) = lookup("HARVEY_LANGUAGE").filter(|l| !l.is_empty()) {
            config.language = language;
        }
        if let Some(per_page) = lookup("HARVEY_PER_PAGE") {
            config.per_page = parse_number("HARVEY_PER_PAGE", &per_page)?;
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, HarveyError> {
    raw.trim()
        .parse()
        .map_err(|_| HarveyError::Config(format!("{} must be a non-negative integer, got '{}'", name, raw)))
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("language", &self.language)
            .field("per_page", &self.per_page)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("HARVEY_URL", "https://harvey.example.com"),
        ("HARVEY_USERNAME", "user"),
        ("HARVEY_PASSWORD", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("https://harvey.example.com", "user", "secret");
        assert_eq!(config.cache_ttl_secs, 86_400);
        assert_eq!(config.language, "sk_SK");
        assert_eq!(config.per_page, 15);
    }

    #[test]
    fn test_from_lookup_required_only() {
        let config = ClientConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.base_url, "https://harvey.example.com");
        assert_eq!(config.username, "user");
        assert_eq!(config.password, "secret");
        assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HARVEY_CACHE_TTL", "60"));
        pairs.push(("HARVEY_LANGUAGE", "en_US"));
        pairs.push(("HARVEY_PER_PAGE", "50"));

        let config = ClientConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.language, "en_US");
        assert_eq!(config.per_page, 50);
    }

    #[test]
    fn test_missing_required_variable() {
        let err = ClientConfig::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, HarveyError::Config(ref msg) if msg.contains("HARVEY_PASSWORD")));
    }

    #[test]
    fn test_invalid_ttl() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HARVEY_CACHE_TTL", "a day"));
        let err = ClientConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("HARVEY_CACHE_TTL"));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ClientConfig::new("https://harvey.example.com", "user", "secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("user"));
    }
}
