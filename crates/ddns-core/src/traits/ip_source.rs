// # IP Source Trait
//
// Defines the interface for detecting the caller's current public IP.
//
// ## Implementations
//
// - HTTP "what is my IP" service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("Current IP: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP source implementations
///
/// # Trust Level: Semi-Trusted
///
/// IP sources only observe. They must not:
/// - Perform DNS updates (use `RecordUpdater`)
/// - Retry or poll (a run is one-shot)
/// - Decide whether a run continues (owned by `BatchRunner`)
///
/// A failed fetch is reported as an error; the orchestrator decides that
/// an unknown current IP ends the run without updates.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current IP address
    /// - `Err(Error)`: If unable to determine the current IP
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Describe where the IP comes from (for logging)
    fn source_name(&self) -> String;
}
