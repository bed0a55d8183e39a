// # DNS Made Easy Record Updater
//
// This crate provides the DNS Made Easy dynamic DNS updater for the DDNS
// batch updater.
//
// ## Protocol
//
// ```http
// GET /servlet/updateip?username=<user>&password=<record password>&id=<record id>&ip=<new ip>
// ```
//
// The endpoint answers with a plain-text body; the literal `success` is the
// only success signal. Any other body (`error-auth`, `error-record-invalid`,
// ...) is a failed update, whatever the HTTP status.
//
// ## Certificate check
//
// Before each update the endpoint is probed with a plain GET that verifies
// the server certificate. A certificate failure is reported as
// `Error::Tls`, which halts the whole batch: with a broken certificate no
// update in the batch can be trusted.
//
// ## Security Requirements
//
// - The record password NEVER appears in logs or error messages
// - Errors from the update request have their URL (which carries the
//   password in its query string) stripped before being reported

use async_trait::async_trait;
use ddns_core::config::RecordEntry;
use ddns_core::traits::RecordUpdater;
use ddns_core::{Error, Result};
use std::net::IpAddr;
use std::time::Duration;

/// DNS Made Easy update endpoint
pub const DEFAULT_UPDATE_URL: &str = "https://www.dnsmadeeasy.com/servlet/updateip";

/// Default HTTP timeout for probe and update requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Substrings that identify TLS failures in an error chain
const TLS_ERROR_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// DNS Made Easy record updater
///
/// # Trust Level: Untrusted
///
/// Single-shot: one probe and one update request per call, no retries.
#[derive(Debug)]
pub struct DnsMadeEasyUpdater {
    /// Update endpoint URL
    url: String,

    /// HTTP client for probe and update (certificate verification enabled)
    client: reqwest::Client,
}

impl DnsMadeEasyUpdater {
    /// Create an updater for `url`
    ///
    /// # Errors
    ///
    /// `Error::Http` if the HTTP client cannot be built
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Probe the endpoint and fail only on certificate problems
    ///
    /// Other probe failures are left for the update request to surface
    /// as a per-record error.
    async fn check_certificate(&self) -> Result<()> {
        match self.client.get(&self.url).send().await {
            Ok(response) => {
                tracing::debug!(
                    "Certificate probe for {} answered {}",
                    self.url,
                    response.status()
                );
                Ok(())
            }
            Err(e) if is_tls_error(&e) => Err(Error::tls(&self.url, describe(e))),
            Err(e) => {
                tracing::debug!("Certificate probe for {} failed: {}", self.url, describe(e));
                Ok(())
            }
        }
    }
}

/// Whether an HTTP error was caused by TLS or certificate validation
///
/// Walks the source chain below the request error itself; the outer
/// message only names the URL.
pub fn is_tls_error(err: &reqwest::Error) -> bool {
    chain_mentions_tls(std::error::Error::source(err))
}

/// Whether any error in a source chain reads like a TLS failure
pub fn chain_mentions_tls(mut current: Option<&(dyn std::error::Error + 'static)>) -> bool {
    while let Some(err) = current {
        let message = err.to_string().to_lowercase();
        if TLS_ERROR_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        current = err.source();
    }
    false
}

/// Render an HTTP error with its cause chain and without the URL
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl RecordUpdater for DnsMadeEasyUpdater {
    /// Update one record to `ip`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Response body, whatever the status code
    /// - `Err(Error::Tls)`: Certificate validation failed (fatal)
    /// - `Err(Error::Http)`: Transport failure (this record only)
    async fn update_record(&self, entry: &RecordEntry, ip: IpAddr) -> Result<String> {
        self.check_certificate().await?;

        tracing::debug!(
            "Sending update for {} (record ID {}) -> {}",
            entry.record_name,
            entry.record_id,
            ip
        );

        let ip = ip.to_string();
        let params = [
            ("username", entry.username.as_str()),
            ("password", entry.record_password.as_str()),
            ("id", entry.record_id.as_str()),
            ("ip", ip.as_str()),
        ];

        let response = match self.client.get(&self.url).query(&params).send().await {
            Ok(response) => response,
            Err(e) if is_tls_error(&e) => return Err(Error::tls(&self.url, describe(e))),
            Err(e) => {
                return Err(Error::http(format!(
                    "Update request to {} failed: {}",
                    self.url,
                    describe(e)
                )));
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read update response: {}", describe(e))))?;

        tracing::debug!(
            "Update endpoint answered {} for {} ({} bytes)",
            status,
            entry.record_name,
            body.len()
        );
        Ok(body)
    }

    fn provider_name(&self) -> &'static str {
        "dnsmadeeasy"
    }
}
