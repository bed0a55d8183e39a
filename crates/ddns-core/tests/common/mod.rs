//! Test doubles and common utilities for batch contract tests
//!
//! These doubles count every call so tests can assert which network
//! operations a run performed.

#![allow(dead_code)]

use ddns_core::config::{RawEntry, RecordEntry, RecordType, RunOptions};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsLookup, IpSource, RecordUpdater};
use ddns_core::{AuthoritativeResolver, BatchRunner};
use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid IP literal")
}

/// An IpSource returning a fixed answer
pub struct StaticIpSource {
    ip: Option<IpAddr>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip: Some(ip),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose service is unreachable
    pub fn unreachable() -> Self {
        Self {
            ip: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .ok_or_else(|| Error::ip_source("connection refused"))
    }

    fn source_name(&self) -> String {
        "static".to_string()
    }
}

/// Calls observed by a MockDnsLookup
#[derive(Default)]
pub struct LookupLog {
    pub ns_lookups: Vec<String>,
    pub host_lookups: Vec<String>,
    pub queries: Vec<(IpAddr, String, RecordType)>,
}

impl LookupLog {
    pub fn total(&self) -> usize {
        self.ns_lookups.len() + self.host_lookups.len() + self.queries.len()
    }
}

/// A DnsLookup answering from tables
///
/// Anything not in a table fails like NXDOMAIN.
#[derive(Default)]
pub struct MockDnsLookup {
    nameservers: HashMap<String, String>,
    hosts: HashMap<String, IpAddr>,
    answers: HashMap<(IpAddr, String), IpAddr>,
    log: Arc<Mutex<LookupLog>>,
}

impl MockDnsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegate `zone` to `ns_host`, which lives at `ns_ip`
    pub fn zone(mut self, zone: &str, ns_host: &str, ns_ip: IpAddr) -> Self {
        self.nameservers.insert(zone.to_string(), ns_host.to_string());
        self.hosts.insert(ns_host.to_string(), ns_ip);
        self
    }

    /// Make the server at `ns_ip` answer `name` with `answer`
    pub fn record(mut self, ns_ip: IpAddr, name: &str, answer: IpAddr) -> Self {
        self.answers.insert((ns_ip, name.to_string()), answer);
        self
    }

    pub fn log(&self) -> Arc<Mutex<LookupLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait::async_trait]
impl DnsLookup for MockDnsLookup {
    async fn nameservers(&self, zone: &str) -> Result<Vec<String>> {
        self.log.lock().unwrap().ns_lookups.push(zone.to_string());
        self.nameservers
            .get(zone)
            .map(|ns| vec![ns.clone()])
            .ok_or_else(|| Error::dns(format!("NXDOMAIN {}", zone)))
    }

    async fn resolve_host(&self, host: &str) -> Result<IpAddr> {
        self.log.lock().unwrap().host_lookups.push(host.to_string());
        self.hosts
            .get(host)
            .copied()
            .ok_or_else(|| Error::dns(format!("unknown host {}", host)))
    }

    async fn query_at(&self, nameserver: IpAddr, name: &str, record_type: RecordType) -> Result<Vec<IpAddr>> {
        self.log
            .lock()
            .unwrap()
            .queries
            .push((nameserver, name.to_string(), record_type));
        self.answers
            .get(&(nameserver, name.to_string()))
            .map(|answer| vec![*answer])
            .ok_or_else(|| Error::dns(format!("no answer for {}", name)))
    }
}

/// Scripted provider reply
#[derive(Debug, Clone)]
pub enum Reply {
    /// Transport succeeded with this body
    Body(&'static str),
    /// Certificate validation failed
    TlsFailure,
    /// Connection failed
    Unreachable,
}

/// A RecordUpdater replying per record name, "success" by default
pub struct MockRecordUpdater {
    replies: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<(String, IpAddr)>>>,
}

impl MockRecordUpdater {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reply(mut self, record_name: &str, reply: Reply) -> Self {
        self.replies.insert(record_name.to_string(), reply);
        self
    }

    /// Record names and IPs of every update call, in call order
    pub fn calls(&self) -> Arc<Mutex<Vec<(String, IpAddr)>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl RecordUpdater for MockRecordUpdater {
    async fn update_record(&self, entry: &RecordEntry, ip: IpAddr) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((entry.record_name.clone(), ip));

        match self.replies.get(&entry.record_name).cloned().unwrap_or(Reply::Body("success")) {
            Reply::Body(body) => Ok(body.to_string()),
            Reply::TlsFailure => Err(Error::tls(
                "https://updates.test/update",
                "invalid peer certificate: UnknownIssuer",
            )),
            Reply::Unreachable => Err(Error::http("connection refused")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build a runner from test doubles
pub fn runner(
    ip_source: StaticIpSource,
    lookup: MockDnsLookup,
    updater: MockRecordUpdater,
    options: RunOptions,
) -> BatchRunner {
    BatchRunner::new(
        Box::new(ip_source),
        AuthoritativeResolver::new(Box::new(lookup)),
        Box::new(updater),
        options,
    )
}

/// A complete entry for `record_name`
pub fn entry(n: usize, record_name: &str) -> serde_json::Value {
    serde_json::json!({
        "USERNAME": format!("user-{}", n),
        "RECORD_PASSWORD": format!("secret-password-{}", n),
        "RECORD_ID": format!("{}", 1000 + n),
        "RECORD_NAME": record_name,
    })
}

pub fn raw_entries(values: Vec<serde_json::Value>) -> Vec<RawEntry> {
    values.into_iter().map(RawEntry::new).collect()
}

/// Shared in-memory log sink
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture all log output on the current thread until the guard drops
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(buffer.clone())
        .finish();
    (tracing::subscriber::set_default(subscriber), buffer)
}
