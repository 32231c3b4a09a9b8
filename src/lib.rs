//! Harvey API client library
//!
//! Typed, cached access to the Harvey classification API: ISCO occupations,
//! schools, education codes (ISCED, KOV), SK NACE and regional codes.
//!
//! ```no_run
//! use harvey_client::{ClientConfig, HarveyClient};
//! use harvey_client::data::SchoolFilter;
//!
//! # async fn run() -> Result<(), harvey_client::HarveyError> {
//! let client = HarveyClient::with_memory_cache(ClientConfig::from_env()?);
//! let occupation = client.get_isco("7233011").await?;
//! let schools = client
//!     .search_schools(
//!         SchoolFilter { name: Some("Gymnázium".into()), ..Default::default() },
//!         client.page(1),
//!     )
//!     .await?;
//! let matches = client.fulltext_isco("Agromechatronik").await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod logging;

pub use client::HarveyClient;
pub use config::ClientConfig;
pub use error::HarveyError;
