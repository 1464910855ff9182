//! `encoder` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Build the [`AuthenticatedEncoder`] from the configured key.
//! 4. Read one JSON request from stdin and write the encoded record to stdout.

use anyhow::{Context, Result};
use tracing::info;

use encoder::config::Config;
use encoder::{stdio, telemetry, AuthenticatedEncoder};

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "encoder starting");

    // -----------------------------------------------------------------------
    // 3. Encoder
    // -----------------------------------------------------------------------
    let key = cfg.secret_key().context("failed to load secret key")?;
    let encoder = AuthenticatedEncoder::new(key);

    // -----------------------------------------------------------------------
    // 4. Encode stdin → stdout
    // -----------------------------------------------------------------------
    stdio::run(&encoder, std::io::stdin().lock(), std::io::stdout().lock())?;
    Ok(())
}
