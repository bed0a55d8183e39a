//! Per-run results

use std::net::IpAddr;

/// What happened to one record entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Required fields missing; entry skipped
    Invalid,
    /// No authoritative answer for the record name
    ResolutionFailed,
    /// Published record already matches the current IP
    Unchanged,
    /// Differs, but dry-run mode skipped the update call
    DryRun,
    /// Provider answered "success"
    Updated,
    /// Provider answered anything else, or could not be reached
    UpdateFailed,
}

/// Result for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// 1-based entry number within the list
    pub entry: usize,
    /// Record name, when the entry was valid
    pub record_name: Option<String>,
    /// Final status
    pub status: EntryStatus,
}

impl EntryReport {
    pub fn new(entry: usize, record_name: Option<String>, status: EntryStatus) -> Self {
        Self {
            entry,
            record_name,
            status,
        }
    }
}

/// Result of a batch run that was not aborted by a fatal error
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Current IP, `None` when it could not be determined
    pub current_ip: Option<IpAddr>,
    /// One report per processed entry, in file order
    pub entries: Vec<EntryReport>,
}

impl RunOutcome {
    pub fn new(current_ip: IpAddr) -> Self {
        Self {
            current_ip: Some(current_ip),
            entries: Vec::new(),
        }
    }

    /// Outcome of a run that stopped because the current IP is unknown
    pub fn without_current_ip() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: EntryReport) {
        self.entries.push(report);
    }

    /// Number of entries that ended with `status`
    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|r| r.status == status).count()
    }

    /// Whether any entry was skipped for missing fields
    ///
    /// This is the only per-entry condition that changes the exit code;
    /// failed resolutions and failed updates do not.
    pub fn has_invalid_entries(&self) -> bool {
        self.entries.iter().any(|r| r.status == EntryStatus::Invalid)
    }
}
