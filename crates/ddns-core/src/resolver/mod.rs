//! Authoritative DNS resolution
//!
//! Provider edge servers are often not the zone's public authority and may
//! serve stale answers, so the published record is read straight from the
//! zone's own name server.
//!
//! ## Zone delegation walk
//!
//! ```text
//! sub.example.com   NS? ── fail ──┐
//!                                 ▼
//!     example.com   NS? ── ns1.example.net ── resolve host ── 198.51.100.53
//!                                                                 │
//!                     A? sub.example.com @198.51.100.53 ◄─────────┘
//! ```
//!
//! Any failed step (NXDOMAIN, timeout, malformed name, empty answer) drops
//! the leftmost label and tries the next suffix. Running out of labels is
//! the only terminal failure.

use crate::config::RecordType;
use crate::error::{Error, Result};
use crate::traits::DnsLookup;
use std::net::IpAddr;
use tracing::debug;

/// Resolver that answers from the zone's authoritative name server
pub struct AuthoritativeResolver {
    /// Backend for the individual lookups
    lookup: Box<dyn DnsLookup>,
}

impl AuthoritativeResolver {
    /// Create a new authoritative resolver
    pub fn new(lookup: Box<dyn DnsLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve `fqdn` against its zone's authoritative name server
    ///
    /// # Parameters
    ///
    /// - `fqdn`: Fully qualified name, with or without a trailing dot
    /// - `record_type`: Record type to query (A unless the caller needs AAAA)
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The first address in the authoritative answer
    /// - `Err(Error::Resolution)`: No suffix of `fqdn` led to an answer
    pub async fn resolve(&self, fqdn: &str, record_type: RecordType) -> Result<IpAddr> {
        let name = fqdn.trim();
        let name = name.strip_suffix('.').unwrap_or(name);

        let labels: Vec<&str> = if name.is_empty() {
            Vec::new()
        } else {
            name.split('.').collect()
        };

        for start in 0..labels.len() {
            let zone = labels[start..].join(".");

            match self.resolve_in_zone(&zone, name, record_type).await {
                Ok(ip) => {
                    debug!("Authoritative answer for {} ({}): {}", name, record_type, ip);
                    return Ok(ip);
                }
                Err(e) => {
                    debug!("No usable name server at {}: {}", zone, e);
                }
            }
        }

        Err(Error::resolution(fqdn, "no authoritative name server found"))
    }

    /// Try one suffix: NS lookup, name server address, direct query
    async fn resolve_in_zone(&self, zone: &str, name: &str, record_type: RecordType) -> Result<IpAddr> {
        let nameservers = self.lookup.nameservers(zone).await?;
        let nameserver = nameservers
            .first()
            .ok_or_else(|| Error::dns(format!("no NS records for {}", zone)))?;

        let nameserver_ip = self.lookup.resolve_host(nameserver).await?;
        debug!(
            "Querying {} for {} {} (zone {})",
            nameserver, name, record_type, zone
        );

        let answers = self.lookup.query_at(nameserver_ip, name, record_type).await?;
        answers
            .first()
            .copied()
            .ok_or_else(|| Error::dns(format!("empty {} answer for {} from {}", record_type, name, nameserver)))
    }
}
