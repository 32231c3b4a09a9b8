//! HTTP transport for the Harvey API

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::data::ResourceQuery;
use crate::error::HarveyError;

/// Issues authenticated GET requests and returns raw response bodies
///
/// Every request carries JSON `Accept`/`Content-Type` headers, the configured
/// `Accept-Language` and HTTP Basic credentials. Nothing is retried.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http_client: Client,
    base_url: String,
    username: String,
    password: String,
    language: String,
}

impl Fetcher {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a Fetcher with a custom HTTP client
    pub fn with_client(http_client: Client, config: &ClientConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            language: config.language.clone(),
        }
    }

    /// Full URL for path segments below `/api/`, e.g. `["isco", "7233011"]`
    ///
    /// Each segment is percent-encoded, so `/`, `?` or `#` inside an
    /// identifier stay part of that segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, HarveyError> {
        let invalid = || HarveyError::Config(format!("invalid base URL '{}'", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// Performs one GET and returns the body of a 2xx response
    ///
    /// `body`, when given, is sent as JSON despite the GET verb; only the bulk
    /// ISCO/ESCO lookup uses it.
    pub async fn fetch(
        &self,
        segments: &[&str],
        query: Option<&ResourceQuery>,
        body: Option<&Value>,
    ) -> Result<String, HarveyError> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        let mut request = self
            .http_client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT_LANGUAGE, &self.language);

        if let Some(query) = query {
            request = request.query(&query.to_pairs());
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_string(body)?);
        }

        info!(path = %path, "GET");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(path = %path, status = status.as_u16(), "request failed");
            return Err(HarveyError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
