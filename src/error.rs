//! Error types for the Harvey client
//!
//! Every public operation returns either a decoded result or exactly one
//! `HarveyError`. Nothing is retried and no partial result is ever returned.

use thiserror::Error;

use crate::cache::CacheError;

/// Errors returned by `HarveyClient` operations
#[derive(Debug, Error)]
pub enum HarveyError {
    /// The HTTP request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No parameter schema is declared for the named operation
    #[error("Unknown operation: '{0}'")]
    UnknownOperation(String),

    /// No resource kind with the given path segment exists
    #[error("Unknown resource: '{0}'")]
    UnknownResource(String),

    /// The operation declares no parameter with the given name
    #[error("Operation '{operation}' has no parameter '{parameter}'")]
    UnknownParameter { operation: String, parameter: String },

    /// A textual argument could not be converted to the parameter's type
    #[error("Invalid value '{value}' for parameter '{parameter}'")]
    InvalidArgument { parameter: String, value: String },

    /// A call supplied more positional arguments than the operation declares
    #[error("Operation '{operation}' accepts at most {declared} arguments, got {supplied}")]
    TooManyArguments {
        operation: String,
        declared: usize,
        supplied: usize,
    },

    /// The cache backend failed
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Client configuration is missing or malformed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl HarveyError {
    /// Whether the error came from the remote API rather than local code
    pub fn is_upstream(&self) -> bool {
        matches!(self, HarveyError::Transport(_) | HarveyError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_includes_code_and_body() {
        let err = HarveyError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
        assert!(err.is_upstream());
    }

    #[test]
    fn test_too_many_arguments_display() {
        let err = HarveyError::TooManyArguments {
            operation: "search-kov".to_string(),
            declared: 2,
            supplied: 3,
        };
        assert!(err.to_string().contains("search-kov"));
        assert!(err.to_string().contains("at most 2"));
        assert!(!err.is_upstream());
    }

    #[test]
    fn test_decode_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HarveyError = serde_err.into();
        assert!(matches!(err, HarveyError::Decode(_)));
    }
}
