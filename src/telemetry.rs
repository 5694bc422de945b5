//! Log setup.
//!
//! The terminal belongs to the UI, so records go to `skyryba.log` in the data
//! directory instead of stderr.
//! - `SKYRYBA_LOG` sets the filter (default `info`, e.g. `skyryba=debug`).
//! - `SKYRYBA_LOG_FORMAT=json` switches to structured JSON lines.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "skyryba.log";

pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skyryba")
}

pub fn init_tracing(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_env("SKYRYBA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("SKYRYBA_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init().map_err(|e| anyhow!(e))?,
        _ => builder.try_init().map_err(|e| anyhow!(e))?,
    }
    Ok(path)
}
