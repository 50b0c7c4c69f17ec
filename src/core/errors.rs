//! Error types for the plugdex library.
//!
//! This module provides structured error handling for all plugdex
//! operations. Most pipeline failures are recovered locally (a bad source
//! contributes no records, an unreadable file is skipped); the variants
//! here cover the failures that do need to propagate.

use std::io;

use thiserror::Error;

/// Main result type for plugdex operations.
pub type Result<T> = std::result::Result<T, PlugdexError>;

/// Comprehensive error type for all plugdex operations.
#[derive(Error, Debug)]
pub enum PlugdexError {
    /// I/O related errors (file operations, export writes, etc.)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Remote feed or API fetch errors
    #[error("Fetch error from '{source_name}': {message}")]
    Fetch {
        /// Name of the source or endpoint being fetched
        source_name: String,
        /// Error description
        message: String,
        /// Underlying HTTP error
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format being serialized
        format: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Repository clone errors for remote quality targets
    #[error("Git error: {message}")]
    Git {
        /// Error description
        message: String,
        /// Repository URL that failed
        url: Option<String>,
    },

    /// Search service errors (normally recovered via the index fallback)
    #[error("Search error: {message}")]
    Search {
        /// Error description
        message: String,
    },
}

impl PlugdexError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new fetch error
    pub fn fetch(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a new fetch error wrapping an HTTP error
    pub fn fetch_http(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Fetch {
            source_name: source_name.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new git error
    pub fn git(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Git {
            message: message.into(),
            url: Some(url.into()),
        }
    }

    /// Create a new search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }
}

// Implement From traits for common error types
impl From<io::Error> for PlugdexError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for PlugdexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            format: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for PlugdexError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            format: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for PlugdexError {
    fn from(err: reqwest::Error) -> Self {
        let source_name = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Self::Fetch {
            source_name,
            message: format!("HTTP request failed: {err}"),
            source: Some(err),
        }
    }
}

impl From<git2::Error> for PlugdexError {
    fn from(err: git2::Error) -> Self {
        Self::Git {
            message: format!("Git operation failed: {err}"),
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PlugdexError::config("Invalid configuration");
        assert!(matches!(err, PlugdexError::Config { .. }));

        let err = PlugdexError::fetch("Anthropic Official", "connection refused");
        assert!(matches!(err, PlugdexError::Fetch { .. }));
    }

    #[test]
    fn test_config_field_error() {
        let err = PlugdexError::config_field("must be positive", "scraper.enrich_limit");

        if let PlugdexError::Config { message, field } = err {
            assert_eq!(message, "must be positive");
            assert_eq!(field, Some("scraper.enrich_limit".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PlugdexError = io_err.into();
        assert!(matches!(err, PlugdexError::Io { .. }));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: PlugdexError = json_err.into();

        if let PlugdexError::Serialization { format, .. } = err {
            assert_eq!(format, Some("JSON".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }

    #[test]
    fn test_error_display_formatting() {
        let err = PlugdexError::fetch("Extended Marketplace", "status 500");
        let display = format!("{}", err);
        assert!(display.contains("Extended Marketplace"));
        assert!(display.contains("status 500"));
    }
}
