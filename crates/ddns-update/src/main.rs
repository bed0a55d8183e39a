// # ddns-update - DDNS batch updater
//
// Single-shot command: checks every record entry of one list in a JSON
// configuration file against the current public IP, and asks DNS Made Easy
// to update the records that are out of date.
//
// This binary is a THIN integration layer:
// 1. Parsing command-line flags (with environment fallbacks)
// 2. Installing the tracing subscriber
// 3. Loading the configuration file (before any network call)
// 4. Wiring the IP source, resolver backend and updater into the batch runner
// 5. Mapping the outcome to an exit code
//
// All batch logic lives in ddns-core.
//
// ## Configuration
//
// - `--config <PATH>` (alias `--jsonConfig`): JSON configuration file;
//   relative paths are resolved against the directory of the executable
// - `--key <KEY>` (alias `--jsonKey`): list of record entries to process
// - `--ip-url` / `DDNS_IP_URL`: IP echo service
// - `--update-url` / `DDNS_UPDATE_URL`: DNS Made Easy update endpoint
// - `--log-level` / `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
// - `--dry-run`: compare only, never call the update endpoint
//
// ## Example
//
// Start from `settings.json.sample` next to this crate: one file can hold
// several lists, each with several record entries.
//
// ```json
// {
//   "home": [
//     { "USERNAME": "alice", "RECORD_PASSWORD": "...", "RECORD_ID": "1001", "RECORD_NAME": "home.example.com" },
//     { "USERNAME": "alice", "RECORD_PASSWORD": "...", "RECORD_ID": "1002", "RECORD_NAME": "vpn.example.com" }
//   ],
//   "office": [
//     { "USERNAME": "bob", "RECORD_PASSWORD": "...", "RECORD_ID": "2001", "RECORD_NAME": "office.example.org" }
//   ]
// }
// ```
//
// ```bash
// ddns-update --config settings.json --key home
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::{AuthoritativeResolver, BatchConfig, BatchRunner, RawEntry, RunOptions, RunOutcome};
use ddns_ip_http::{DEFAULT_IP_URL, HttpIpSource};
use ddns_provider_dnsmadeeasy::{DEFAULT_UPDATE_URL, DnsMadeEasyUpdater};
use ddns_resolver_hickory::HickoryLookup;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the batch run
///
/// - 0: Every entry processed (including "no current IP, nothing to do")
/// - 1: Fatal error (configuration, certificate, startup)
/// - 3: At least one entry was invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Run completed
    Success = 0,
    /// Fatal error, remaining entries not processed
    Fatal = 1,
    /// One or more entries were skipped as invalid
    InvalidEntries = 3,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Update DNS Made Easy dynamic DNS records listed in a JSON file
#[derive(Debug, Parser)]
#[command(name = "ddns-update", version, about)]
struct Cli {
    /// JSON configuration file (relative paths are resolved against the executable's directory)
    #[arg(long, alias = "jsonConfig", value_name = "PATH")]
    config: PathBuf,

    /// Name of the list of record entries to process
    #[arg(long, alias = "jsonKey", value_name = "KEY")]
    key: String,

    /// Service that echoes the caller's public IP
    #[arg(long, env = "DDNS_IP_URL", default_value = DEFAULT_IP_URL)]
    ip_url: String,

    /// DNS Made Easy update endpoint
    #[arg(long, env = "DDNS_UPDATE_URL", default_value = DEFAULT_UPDATE_URL)]
    update_url: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Resolve and compare, but never send updates
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(log_level) = parse_log_level(&cli.log_level) else {
        eprintln!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            cli.log_level
        );
        return DdnsExitCode::Fatal.into();
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::Fatal.into();
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    run(&cli, exe_dir.as_deref()).into()
}

/// Load the configuration, run the batch and pick the exit code
///
/// Configuration problems end the run before the runtime exists, so they
/// never cause network traffic.
fn run(cli: &Cli, exe_dir: Option<&Path>) -> DdnsExitCode {
    let config_path = resolve_config_path(&cli.config, exe_dir);

    let entries = match load_entries(&config_path, &cli.key) {
        Ok(entries) => entries,
        Err(e) => {
            error!("{}", e);
            return DdnsExitCode::Fatal;
        }
    };

    debug!(
        "Loaded {} entries from list '{}' in {}",
        entries.len(),
        cli.key,
        config_path.display()
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::Fatal;
        }
    };

    rt.block_on(async {
        let runner = match build_runner(cli, config_path) {
            Ok(runner) => runner,
            Err(e) => {
                error!("{:#}", e);
                return DdnsExitCode::Fatal;
            }
        };

        match runner.run(&entries).await {
            Ok(outcome) => exit_code_for(&outcome),
            Err(e) => {
                error!("{}", e);
                DdnsExitCode::Fatal
            }
        }
    })
}

/// Parse a log level name (case-insensitive)
fn parse_log_level(level: &str) -> Option<Level> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Resolve the configuration path
///
/// Relative paths are taken relative to the executable's directory.
fn resolve_config_path(path: &Path, exe_dir: Option<&Path>) -> PathBuf {
    match exe_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Load the configuration file and select one list
fn load_entries(path: &Path, key: &str) -> ddns_core::Result<Vec<RawEntry>> {
    BatchConfig::load(path)?.entries(key)
}

/// Wire the production collaborators into a batch runner
fn build_runner(cli: &Cli, config_path: PathBuf) -> Result<BatchRunner> {
    let lookup = HickoryLookup::from_system_conf().context("Failed to set up DNS resolution")?;
    let updater =
        DnsMadeEasyUpdater::new(&cli.update_url).context("Failed to set up the update client")?;

    if cli.dry_run {
        info!("Dry run: no updates will be sent");
    }

    Ok(BatchRunner::new(
        Box::new(HttpIpSource::new(&cli.ip_url)),
        AuthoritativeResolver::new(Box::new(lookup)),
        Box::new(updater),
        RunOptions {
            dry_run: cli.dry_run,
            config_path: Some(config_path),
        },
    ))
}

/// Exit code for a completed run
fn exit_code_for(outcome: &RunOutcome) -> DdnsExitCode {
    if outcome.current_ip.is_none() {
        debug!("No current IP known, nothing was checked");
    }

    if outcome.has_invalid_entries() {
        DdnsExitCode::InvalidEntries
    } else {
        DdnsExitCode::Success
    }
}
