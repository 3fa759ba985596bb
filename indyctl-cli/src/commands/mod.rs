//! Command implementations for the indyctl CLI

pub mod group;
#[cfg(feature = "server")]
pub mod serve;
pub mod stats;
pub mod stores;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use indyctl_client::{ApiResult, IndyClient, Session};
use indyctl_core::IndyConfig;
use serde::Serialize;

pub use group::run_group;
#[cfg(feature = "server")]
pub use serve::run_serve;
pub use stats::{run_package_types, run_version};
pub use stores::run_stores;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
    /// Store keys only
    Quiet,
}

/// `--json` wins over `--output`
pub fn get_output_format(output: OutputFormat, json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        output
    }
}

/// Resolved client plus the config it came from
pub struct ApiContext {
    pub client: IndyClient,
    pub config: IndyConfig,
}

impl ApiContext {
    pub fn new(endpoint: Option<&str>, config: IndyConfig) -> Result<Self> {
        let endpoint = config.endpoint(endpoint);
        let timeout = Duration::from_secs(config.timeout_secs());
        tracing::debug!(%endpoint, ?timeout, "using API endpoint");

        let client = IndyClient::new(&endpoint, timeout)
            .with_context(|| format!("Failed to create client for {}", endpoint))?;
        Ok(Self { client, config })
    }
}

/// A session that Ctrl+C closes, discarding whatever is still in flight.
pub fn interruptible_session() -> Session {
    let session = Session::new();
    let handle = session.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, discarding pending responses");
            handle.cancel();
        }
    });
    session
}

/// Turn a server-reported failure into a command error.
pub fn require<T>(result: ApiResult<T>, what: &str) -> Result<T> {
    result.into_result().map_err(|failure| anyhow!("{}: {}", what, failure))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Tree prefixes for item `i` of `len`
pub(crate) fn tree_prefix(i: usize, len: usize) -> (&'static str, &'static str) {
    if i + 1 == len {
        ("└─", "   ")
    } else {
        ("├─", "│  ")
    }
}
