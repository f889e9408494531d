//! File logging.
//!
//! The terminal belongs to ratatui, so log lines go to the configured file.

use crate::error::TuiError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "CASEDESK_LOG";
pub const DEFAULT_FILTER: &str = "casedesk_tui=info,casedesk_core=info";

pub fn init(path: &Path) -> Result<(), TuiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
