// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS batch updater.
//
// ## Architecture
//
// Fetches the current public IP from an external "what is my IP" service
// that answers a plain GET with the caller's address as a text body
// (e.g. DNS Made Easy's myip.jsp, api.ipify.org, icanhazip.com).
//
// One fetch per run. No polling, no caching, no retries.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default IP echo service
pub const DEFAULT_IP_URL: &str = "http://www.dnsmadeeasy.com/myip.jsp";

/// Default HTTP timeout for the IP request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::new(DEFAULT_IP_URL)
    }
}

/// Parse an IP echo response body
///
/// Surrounding whitespace is ignored.
pub fn parse_ip_body(body: &str) -> Result<IpAddr> {
    let ip_text = body.trim();
    if ip_text.is_empty() {
        return Err(Error::ip_source("Empty response body"));
    }

    ip_text
        .parse()
        .map_err(|_| Error::ip_source(format!("Invalid IP address: {}", ip_text)))
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))?;

        let ip = parse_ip_body(&body)?;
        tracing::debug!("{} reports current IP {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> String {
        self.url.clone()
    }
}
