//! Contract Test: Authoritative Resolution
//!
//! Constraints verified:
//! - The walk drops leftmost labels until an NS lookup succeeds
//! - The original name is queried at the server found for the shorter suffix
//! - Exhausting all labels fails that entry only, exit code unaffected

mod common;

use common::*;
use ddns_core::config::{RecordType, RunOptions};
use ddns_core::{AuthoritativeResolver, EntryStatus, Error};

#[tokio::test]
async fn walk_uses_nameserver_of_first_delegated_suffix() {
    let lookup = MockDnsLookup::new()
        .zone("c", "ns.c-registry.test", ip("192.0.2.53"))
        .record(ip("192.0.2.53"), "a.b.c", ip("203.0.113.5"));
    let log = lookup.log();

    let resolver = AuthoritativeResolver::new(Box::new(lookup));
    let resolved = resolver.resolve("a.b.c", RecordType::A).await.expect("resolves");

    assert_eq!(resolved, ip("203.0.113.5"));

    let log = log.lock().unwrap();
    assert_eq!(log.ns_lookups, vec!["a.b.c", "b.c", "c"]);
    assert_eq!(log.host_lookups, vec!["ns.c-registry.test"]);
    assert_eq!(
        log.queries,
        vec![(ip("192.0.2.53"), "a.b.c".to_string(), RecordType::A)]
    );
}

#[tokio::test]
async fn no_delegation_at_any_suffix_is_resolution_error() {
    let lookup = MockDnsLookup::new();
    let log = lookup.log();

    let resolver = AuthoritativeResolver::new(Box::new(lookup));
    let err = resolver
        .resolve("a.b.c", RecordType::A)
        .await
        .expect_err("must fail");

    assert!(matches!(err, Error::Resolution { .. }));
    assert!(!err.is_fatal());
    assert_eq!(log.lock().unwrap().ns_lookups, vec!["a.b.c", "b.c", "c"]);
}

#[tokio::test]
async fn resolution_failure_is_per_entry() {
    let lookup = MockDnsLookup::new()
        .zone("example.com", "ns1.example.net", ip("198.51.100.53"))
        .record(ip("198.51.100.53"), "home.example.com", ip("203.0.113.99"));
    let updater = MockRecordUpdater::new();
    let calls = updater.calls();

    let entries = raw_entries(vec![entry(1, "ghost.invalid"), entry(2, "home.example.com")]);

    let runner = runner(
        StaticIpSource::new(ip("203.0.113.7")),
        lookup,
        updater,
        RunOptions::default(),
    );
    let outcome = runner.run(&entries).await.expect("run completes");

    assert_eq!(outcome.entries[0].status, EntryStatus::ResolutionFailed);
    assert_eq!(outcome.entries[1].status, EntryStatus::Updated);
    assert_eq!(calls.lock().unwrap().len(), 1);
    // Resolution failures do not change the exit code
    assert!(!outcome.has_invalid_entries());
}
