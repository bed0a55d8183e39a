//! Batch orchestrator
//!
//! The BatchRunner is responsible for:
//! - Fetching the current IP once per run
//! - Validating each record entry
//! - Reading the published record from the authoritative name server
//! - Calling the updater only when the published record differs
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  none  ┌──────────────────────┐
//! │  IpSource   │───────►│ done, nothing to do  │
//! └─────────────┘        └──────────────────────┘
//!        │ ip
//!        ▼
//!  for each entry (file order)
//!        │
//!   validate ── missing field ──► Invalid (exit 3)
//!        │
//!   resolve ─── no authority ───► ResolutionFailed
//!        │
//!   compare ─── equal ──────────► Unchanged
//!        │
//!   update ──── TLS error ──────► abort batch (fatal)
//!        │
//!        └──── "success" ? Updated : UpdateFailed
//! ```
//!
//! Entries are processed strictly one after another. Nothing is retried.

mod outcome;

pub use outcome::{EntryReport, EntryStatus, RunOutcome};

use crate::config::{RawEntry, RecordEntry, RecordType, RunOptions};
use crate::error::{Error, Result};
use crate::resolver::AuthoritativeResolver;
use crate::traits::{IpSource, RecordUpdater, is_success_body};
use std::net::IpAddr;
use tracing::{debug, error, info};

/// Longest provider response echoed into the log
const MAX_LOGGED_BODY_CHARS: usize = 64;

/// Sequential batch orchestrator
///
/// ## Lifecycle
///
/// 1. Create with [`BatchRunner::new()`]
/// 2. Call [`BatchRunner::run()`] once with the entries of one list
/// 3. Map the returned [`RunOutcome`] (or fatal error) to an exit code
pub struct BatchRunner {
    /// IP source for the current public IP
    ip_source: Box<dyn IpSource>,

    /// Resolver for the published record
    resolver: AuthoritativeResolver,

    /// Provider update endpoint
    updater: Box<dyn RecordUpdater>,

    /// Run options
    options: RunOptions,
}

impl BatchRunner {
    /// Create a new batch runner
    pub fn new(
        ip_source: Box<dyn IpSource>,
        resolver: AuthoritativeResolver,
        updater: Box<dyn RecordUpdater>,
        options: RunOptions,
    ) -> Self {
        Self {
            ip_source,
            resolver,
            updater,
            options,
        }
    }

    /// Run the batch
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome)`: Every entry was processed (or there was no current IP)
    /// - `Err(Error)`: Fatal error; remaining entries were not processed
    pub async fn run(&self, entries: &[RawEntry]) -> Result<RunOutcome> {
        let current_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                // No known current IP means nothing to compare against
                debug!(
                    "Could not get the current IP from {}: {}",
                    self.ip_source.source_name(),
                    e
                );
                return Ok(RunOutcome::without_current_ip());
            }
        };

        info!("Current IP: {}", current_ip);
        debug!("Processing {} record entries", entries.len());

        let mut outcome = RunOutcome::new(current_ip);

        for (index, raw) in entries.iter().enumerate() {
            let entry = index + 1;

            let report = match raw.validate(entry) {
                Ok(record) => {
                    let status = self.process_entry(entry, &record, current_ip).await?;
                    EntryReport::new(entry, Some(record.record_name), status)
                }
                Err(Error::Validation { entry, fields }) => {
                    for field in fields {
                        error!(
                            "Missing {} setting in entry number {}. Check {}.",
                            field,
                            entry,
                            self.config_hint()
                        );
                    }
                    EntryReport::new(entry, None, EntryStatus::Invalid)
                }
                Err(e) => return Err(e),
            };

            outcome.push(report);
        }

        info!(
            "Batch finished: {} updated, {} unchanged, {} failed, {} invalid",
            outcome.count(EntryStatus::Updated),
            outcome.count(EntryStatus::Unchanged),
            outcome.count(EntryStatus::UpdateFailed) + outcome.count(EntryStatus::ResolutionFailed),
            outcome.count(EntryStatus::Invalid)
        );

        Ok(outcome)
    }

    /// How validation errors refer to the configuration file
    fn config_hint(&self) -> String {
        match &self.options.config_path {
            Some(path) => format!("configuration file {}", path.display()),
            None => "the configuration file".to_string(),
        }
    }

    /// Resolve, compare and update one valid entry
    async fn process_entry(
        &self,
        entry: usize,
        record: &RecordEntry,
        current_ip: IpAddr,
    ) -> Result<EntryStatus> {
        let record_type = RecordType::for_ip(&current_ip);

        let dns_ip = match self.resolver.resolve(&record.record_name, record_type).await {
            Ok(ip) => ip,
            Err(e) => {
                error!("Entry number {}: {}", entry, e);
                return Ok(EntryStatus::ResolutionFailed);
            }
        };

        if dns_ip == current_ip {
            info!("No changes for DNS record {} to report.", record.record_name);
            return Ok(EntryStatus::Unchanged);
        }

        debug!(
            "Current IP {} differs with DNS record {} ({}), attempting to update DNS.",
            current_ip, record.record_name, dns_ip
        );

        if self.options.dry_run {
            info!(
                "[DRY-RUN] Would update {} (record ID {}) from {} to {} via {}",
                record.record_name,
                record.record_id,
                dns_ip,
                current_ip,
                self.updater.provider_name()
            );
            return Ok(EntryStatus::DryRun);
        }

        match self.updater.update_record(record, current_ip).await {
            Ok(body) if is_success_body(&body) => {
                info!(
                    "Updating record for {} to {} was successful.",
                    record.record_name, current_ip
                );
                Ok(EntryStatus::Updated)
            }
            Ok(body) => {
                error!(
                    "Updating record for {} to {} failed: {} responded {:?}",
                    record.record_name,
                    current_ip,
                    self.updater.provider_name(),
                    truncate(&body, MAX_LOGGED_BODY_CHARS)
                );
                Ok(EntryStatus::UpdateFailed)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                error!(
                    "Updating record for {} to {} failed: {}",
                    record.record_name, current_ip, e
                );
                Ok(EntryStatus::UpdateFailed)
            }
        }
    }
}

/// Cut a string to at most `max` characters
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
