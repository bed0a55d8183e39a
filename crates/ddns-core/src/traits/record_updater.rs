// # Record Updater Trait
//
// Defines the interface for pushing a new IP to a DNS provider's
// HTTP update endpoint.
//
// ## Implementations
//
// - DNS Made Easy: `ddns-provider-dnsmadeeasy` crate

use crate::config::RecordEntry;
use async_trait::async_trait;
use std::net::IpAddr;

/// The only response body that counts as a successful update
pub const UPDATE_SUCCESS_BODY: &str = "success";

/// Check an update response body
///
/// Exact, case-sensitive match without trimming: `"Success"` and
/// `"success "` are failures.
pub fn is_success_body(body: &str) -> bool {
    body == UPDATE_SUCCESS_BODY
}

/// Trait for record updater implementations
///
/// # Trust Level: Untrusted
///
/// Updaters make single-shot calls to their own endpoint. They must not
/// retry, must not decide whether an update is needed (owned by
/// `BatchRunner`), and must never log the record password.
///
/// # Errors
///
/// - `Error::Tls`: the endpoint certificate failed validation. This is
///   fatal for the whole batch.
/// - `Error::Http`: transport failure. This fails the current entry only.
///
/// A non-2xx status is NOT an error: the body is returned and the caller
/// interprets it with [`is_success_body`].
#[async_trait]
pub trait RecordUpdater: Send + Sync {
    /// Update one record to a new IP
    ///
    /// # Returns
    ///
    /// The raw response body text
    async fn update_record(&self, entry: &RecordEntry, ip: IpAddr) -> Result<String, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
