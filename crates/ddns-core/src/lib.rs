// # ddns-core
//
// Core library for the DDNS batch updater.
//
// ## Architecture Overview
//
// A run is a linear pipeline over one list of record entries:
// - **IpSource**: Trait for fetching the current public IP
// - **DnsLookup**: Trait for the individual DNS lookups
// - **AuthoritativeResolver**: Zone delegation walk to the authoritative name server
// - **RecordUpdater**: Trait for the provider's HTTP update endpoint
// - **BatchRunner**: Validates, resolves, compares and updates each entry in turn
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from network implementations
// 2. **Sequential**: One entry at a time, no retries
// 3. **Fail-Fast on Trust**: A broken provider certificate halts the whole batch
// 4. **Library-First**: All core functionality can be used as a library
// 5. **No Secrets in Logs**: Only field names are ever logged for entries

pub mod traits;
pub mod resolver;
pub mod orchestrator;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsLookup, RecordUpdater};
pub use resolver::AuthoritativeResolver;
pub use orchestrator::{BatchRunner, EntryReport, EntryStatus, RunOutcome};
pub use config::{BatchConfig, RawEntry, RecordEntry, RecordType, RunOptions};
pub use error::{Error, Result};
