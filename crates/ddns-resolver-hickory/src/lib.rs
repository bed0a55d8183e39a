// # hickory DNS lookups
//
// This crate implements `ddns_core::DnsLookup` on top of hickory-resolver.
//
// - NS lookups and name server host resolution go through the system
//   resolver (`/etc/resolv.conf` or platform equivalent).
// - The record query goes to one specific name server only, through a
//   resolver built with that single server and no search domains.
//
// Names are made fully qualified before lookup so search domains are
// never appended.

use async_trait::async_trait;
use ddns_core::config::RecordType;
use ddns_core::traits::DnsLookup;
use ddns_core::{Error, Result};
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{RData, RecordType as WireRecordType};
use hickory_resolver::TokioResolver;
use std::net::IpAddr;

/// DNS port used for authoritative queries
const DNS_PORT: u16 = 53;

/// DnsLookup backed by hickory-resolver
pub struct HickoryLookup {
    /// System resolver for NS and host lookups
    system: TokioResolver,
}

impl HickoryLookup {
    /// Create a lookup backend using the system resolver configuration
    pub fn from_system_conf() -> Result<Self> {
        let (config, options) = hickory_resolver::system_conf::read_system_conf()
            .map_err(|e| Error::dns(format!("Failed to read system resolver config: {}", e)))?;
        Ok(Self::with_config(config, options))
    }

    /// Create a lookup backend using an explicit resolver configuration
    pub fn with_config(config: ResolverConfig, options: ResolverOpts) -> Self {
        let system = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(options)
            .build();
        Self { system }
    }
}

impl std::fmt::Debug for HickoryLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryLookup").finish_non_exhaustive()
    }
}

/// Resolver configuration that talks to exactly one name server
pub fn single_server_config(nameserver: IpAddr) -> ResolverConfig {
    ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(&[nameserver], DNS_PORT, true),
    )
}

/// Append the root label unless already present
pub fn fully_qualified(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

fn wire_type(record_type: RecordType) -> WireRecordType {
    match record_type {
        RecordType::A => WireRecordType::A,
        RecordType::Aaaa => WireRecordType::AAAA,
    }
}

/// Addresses of the requested type, in answer order
///
/// Other record data in the answer (e.g. a CNAME chain) is skipped.
pub fn addresses<'a>(answers: impl Iterator<Item = &'a RData>, record_type: RecordType) -> Vec<IpAddr> {
    answers
        .filter_map(|rdata| match (rdata, record_type) {
            (RData::A(a), RecordType::A) => Some(IpAddr::V4(a.0)),
            (RData::AAAA(aaaa), RecordType::Aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl DnsLookup for HickoryLookup {
    async fn nameservers(&self, zone: &str) -> Result<Vec<String>> {
        let lookup = self
            .system
            .ns_lookup(fully_qualified(zone))
            .await
            .map_err(|e| Error::dns(format!("NS lookup for {} failed: {}", zone, e)))?;

        let nameservers: Vec<String> = lookup.iter().map(|ns| ns.to_string()).collect();
        if nameservers.is_empty() {
            return Err(Error::dns(format!("No NS records for {}", zone)));
        }

        tracing::debug!("NS records for {}: {:?}", zone, nameservers);
        Ok(nameservers)
    }

    async fn resolve_host(&self, host: &str) -> Result<IpAddr> {
        let lookup = self
            .system
            .lookup_ip(fully_qualified(host))
            .await
            .map_err(|e| Error::dns(format!("Address lookup for {} failed: {}", host, e)))?;

        // Prefer IPv4, like a plain gethostbyname()
        lookup
            .iter()
            .find(IpAddr::is_ipv4)
            .or_else(|| lookup.iter().next())
            .ok_or_else(|| Error::dns(format!("No addresses for {}", host)))
    }

    async fn query_at(&self, nameserver: IpAddr, name: &str, record_type: RecordType) -> Result<Vec<IpAddr>> {
        let resolver = TokioResolver::builder_with_config(
            single_server_config(nameserver),
            TokioConnectionProvider::default(),
        )
        .with_options(ResolverOpts::default())
        .build();

        let lookup = resolver
            .lookup(fully_qualified(name), wire_type(record_type))
            .await
            .map_err(|e| {
                Error::dns(format!(
                    "{} query for {} at {} failed: {}",
                    record_type, name, nameserver, e
                ))
            })?;

        let found = addresses(lookup.iter(), record_type);
        if found.is_empty() {
            return Err(Error::dns(format!(
                "No {} records for {} at {}",
                record_type, name, nameserver
            )));
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::rr::rdata::{A, AAAA, CNAME};
    use hickory_resolver::proto::rr::Name;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;

    #[test]
    fn test_fully_qualified() {
        assert_eq!(fully_qualified("example.com"), "example.com.");
        assert_eq!(fully_qualified("example.com."), "example.com.");
        assert_eq!(fully_qualified("com"), "com.");
    }

    #[test]
    fn test_single_server_config_targets_only_that_server() {
        let server: IpAddr = "198.51.100.53".parse().unwrap();
        let config = single_server_config(server);

        assert!(!config.name_servers().is_empty());
        for ns in config.name_servers() {
            assert_eq!(ns.socket_addr.ip(), server);
            assert_eq!(ns.socket_addr.port(), 53);
        }
        assert!(config.search().is_empty());
        assert!(config.domain().is_none());
    }

    #[test]
    fn test_addresses_filters_by_type() {
        let answers = vec![
            RData::CNAME(CNAME(Name::from_str("edge.example.net.").unwrap())),
            RData::A(A::from(Ipv4Addr::new(203, 0, 113, 10))),
            RData::AAAA(AAAA::from(Ipv6Addr::LOCALHOST)),
            RData::A(A::from(Ipv4Addr::new(203, 0, 113, 11))),
        ];

        assert_eq!(
            addresses(answers.iter(), RecordType::A),
            vec![
                IpAddr::from([203, 0, 113, 10]),
                IpAddr::from([203, 0, 113, 11]),
            ]
        );
        assert_eq!(
            addresses(answers.iter(), RecordType::Aaaa),
            vec![IpAddr::V6(Ipv6Addr::LOCALHOST)]
        );
    }

    #[test]
    fn test_wire_type() {
        assert_eq!(wire_type(RecordType::A), WireRecordType::A);
        assert_eq!(wire_type(RecordType::Aaaa), WireRecordType::AAAA);
    }

    #[tokio::test]
    async fn test_unreachable_nameserver_is_dns_error() {
        // TEST-NET-1 is not routed; keep the attempt short
        let mut options = ResolverOpts::default();
        options.timeout = std::time::Duration::from_millis(200);
        options.attempts = 1;

        let server: IpAddr = "192.0.2.1".parse().unwrap();
        let lookup = HickoryLookup::with_config(single_server_config(server), options);

        let result = lookup.nameservers("example.com").await;
        assert!(matches!(result, Err(Error::Dns(_))));
    }
}
