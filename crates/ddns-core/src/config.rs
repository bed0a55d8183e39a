//! Configuration types for the DDNS batch updater
//!
//! The batch file is a JSON object mapping a list name to an ordered
//! array of record entries:
//!
//! ```json
//! {
//!   "home": [
//!     { "USERNAME": "...", "RECORD_PASSWORD": "...", "RECORD_ID": "...", "RECORD_NAME": "home.example.com" }
//!   ]
//! }
//! ```
//!
//! Several lists may coexist; a run processes exactly one of them.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// JSON key holding the provider account user name
pub const FIELD_USERNAME: &str = "USERNAME";
/// JSON key holding the per-record password
pub const FIELD_RECORD_PASSWORD: &str = "RECORD_PASSWORD";
/// JSON key holding the provider record ID
pub const FIELD_RECORD_ID: &str = "RECORD_ID";
/// JSON key holding the fully qualified record name
pub const FIELD_RECORD_NAME: &str = "RECORD_NAME";

/// Required fields, in the order validation reports them
pub const REQUIRED_FIELDS: [&str; 4] = [
    FIELD_USERNAME,
    FIELD_RECORD_PASSWORD,
    FIELD_RECORD_ID,
    FIELD_RECORD_NAME,
];

/// Batch configuration loaded from a JSON file
///
/// Loaded once per run and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct BatchConfig {
    lists: HashMap<String, serde_json::Value>,
}

impl BatchConfig {
    /// Load and parse a batch configuration file
    ///
    /// # Errors
    ///
    /// - `Error::ConfigIo`: the file is missing or unreadable
    /// - `Error::Json`: the file is not valid JSON, or not a JSON object
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse a batch configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get the entries of the named list, in file order
    ///
    /// # Errors
    ///
    /// - `Error::Config`: no list with that name
    /// - `Error::ConfigFormat`: the value under that name is not an array
    pub fn entries(&self, key: &str) -> Result<Vec<RawEntry>> {
        let value = self.lists.get(key).ok_or_else(|| {
            Error::config(format!(
                "No list named '{}' in configuration (available: {})",
                key,
                self.keys().join(", ")
            ))
        })?;

        let items = value.as_array().ok_or_else(|| {
            Error::config_format(format!("Value of '{}' must be an array of record entries", key))
        })?;

        Ok(items.iter().cloned().map(RawEntry).collect())
    }

    /// Names of all lists in the configuration
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// An unvalidated record entry, as it appears in the file
///
/// The Debug implementation only exposes key names, never values.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct RawEntry(serde_json::Value);

impl RawEntry {
    /// Wrap a JSON value as a raw entry
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Names of required fields that are absent or not strings
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| self.string_field(field).is_none())
            .collect()
    }

    /// Validate into a typed record entry
    ///
    /// # Parameters
    ///
    /// - `entry`: 1-based entry number, used in the error
    ///
    /// # Errors
    ///
    /// `Error::Validation` listing every missing field by name
    pub fn validate(&self, entry: usize) -> Result<RecordEntry> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Validation {
                entry,
                fields: missing,
            });
        }

        let field = |name: &str| self.string_field(name).unwrap_or_default().to_string();
        Ok(RecordEntry {
            username: field(FIELD_USERNAME),
            record_password: field(FIELD_RECORD_PASSWORD),
            record_id: field(FIELD_RECORD_ID),
            record_name: field(FIELD_RECORD_NAME),
        })
    }

    /// The record name, if present (used for log context on invalid entries)
    pub fn record_name(&self) -> Option<&str> {
        self.string_field(FIELD_RECORD_NAME)
    }

    fn string_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(serde_json::Value::as_str)
    }
}

impl fmt::Debug for RawEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self
            .0
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default();
        f.debug_struct("RawEntry").field("keys", &keys).finish()
    }
}

/// A validated record entry
///
/// Identity is `record_name`.
///
/// # Security
///
/// The Debug implementation does NOT expose the record password.
#[derive(Clone, PartialEq, Eq)]
pub struct RecordEntry {
    /// Provider account user name
    pub username: String,
    /// Per-record password
    /// ⚠️ NEVER log this value
    pub record_password: String,
    /// Provider record ID
    pub record_id: String,
    /// Fully qualified record name
    pub record_name: String,
}

impl RecordEntry {
    /// Create a record entry
    pub fn new(
        username: impl Into<String>,
        record_password: impl Into<String>,
        record_id: impl Into<String>,
        record_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            record_password: record_password.into(),
            record_id: record_id.into(),
            record_name: record_name.into(),
        }
    }
}

impl fmt::Debug for RecordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordEntry")
            .field("username", &self.username)
            .field("record_password", &"<REDACTED>")
            .field("record_id", &self.record_id)
            .field("record_name", &self.record_name)
            .finish()
    }
}

/// DNS record type to compare against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordType {
    /// A record (IPv4)
    #[default]
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// Record type matching the family of an address
    pub fn for_ip(ip: &std::net::IpAddr) -> Self {
        match ip {
            std::net::IpAddr::V4(_) => RecordType::A,
            std::net::IpAddr::V6(_) => RecordType::Aaaa,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::Aaaa => f.write_str("AAAA"),
        }
    }
}

/// Options for a batch run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Resolve and compare, but never call the update endpoint
    pub dry_run: bool,

    /// File the entries came from, named in validation errors
    pub config_path: Option<PathBuf>,
}
