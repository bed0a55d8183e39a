// # DNS Lookup Trait
//
// The individual lookups the authoritative resolver is built from.
// Keeping them behind a trait lets the zone delegation walk in
// `crate::resolver` run against scripted answers in tests.
//
// ## Implementations
//
// - hickory-resolver: `ddns-resolver-hickory` crate

use crate::config::RecordType;
use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for DNS lookup backends
///
/// Every method reports any failure (NXDOMAIN, timeout, malformed name,
/// empty answer) as `Err(Error::Dns)`. The resolver treats all of them alike.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// Look up the NS records of a zone through the system resolver
    ///
    /// # Returns
    ///
    /// Name server host names, in answer order (never empty on `Ok`)
    async fn nameservers(&self, zone: &str) -> Result<Vec<String>, crate::Error>;

    /// Resolve a host name to an address through the system resolver
    async fn resolve_host(&self, host: &str) -> Result<IpAddr, crate::Error>;

    /// Query one specific name server, and only that server
    ///
    /// # Returns
    ///
    /// Addresses from the answer section, in answer order (never empty on `Ok`)
    async fn query_at(
        &self,
        nameserver: IpAddr,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<IpAddr>, crate::Error>;
}
