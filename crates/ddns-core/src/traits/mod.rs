//! Core traits for the DDNS batch updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Fetch the caller's current public IP
//! - [`DnsLookup`]: Individual DNS lookups used by the authoritative walk
//! - [`RecordUpdater`]: Push a new IP to the provider's update endpoint

pub mod ip_source;
pub mod dns_lookup;
pub mod record_updater;

pub use ip_source::IpSource;
pub use dns_lookup::DnsLookup;
pub use record_updater::{RecordUpdater, UPDATE_SUCCESS_BODY, is_success_body};
