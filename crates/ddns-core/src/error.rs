//! Error types for the DDNS batch updater
//!
//! This module defines all error types used throughout the workspace.
//!
//! Errors fall into two groups:
//! - **Fatal**: halt the whole batch (bad config file, broken provider certificate)
//! - **Per-entry**: logged by the orchestrator, the batch continues

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS batch updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file missing or unreadable
    #[error("Cannot read configuration file {}: {source}", path.display())]
    ConfigIo {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not the expected JSON shape
    #[error("Invalid configuration file: {0}")]
    ConfigFormat(String),

    /// JSON syntax errors
    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    /// Other configuration errors (unknown key, bad runtime setting)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record entry lacks required fields
    ///
    /// Only field names are carried, never field values.
    #[error("Entry {entry} is missing required field(s): {}", fields.join(", "))]
    Validation {
        /// 1-based entry number within the selected list
        entry: usize,
        /// Names of the missing fields
        fields: Vec<&'static str>,
    },

    /// The provider endpoint failed certificate validation
    #[error("The TLS certificate for {url} is not valid: {message}")]
    Tls {
        /// Endpoint URL
        url: String,
        /// Error message
        message: String,
    },

    /// No authoritative name server could be found for a name
    #[error("Could not resolve {name}: {message}")]
    Resolution {
        /// The name being resolved
        name: String,
        /// Error message
        message: String,
    },

    /// A single DNS lookup failed
    #[error("DNS lookup error: {0}")]
    Dns(String),

    /// IP source-related errors
    #[error("IP source error: {0}")]
    IpSource(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),
}

impl Error {
    /// Create a configuration file format error
    pub fn config_format(msg: impl Into<String>) -> Self {
        Self::ConfigFormat(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a TLS certificate error
    pub fn tls(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tls {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a resolution error
    pub fn resolution(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a DNS lookup error
    pub fn dns(msg: impl Into<String>) -> Self {
        Self::Dns(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether this error halts the whole batch
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigIo { .. }
                | Self::ConfigFormat(_)
                | Self::Json(_)
                | Self::Config(_)
                | Self::Tls { .. }
        )
    }
}
