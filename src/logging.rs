//! Tracing subscriber setup
//!
//! Logs go to a file, never the terminal: stdout belongs to ratatui while
//! the editor runs. Filtering honors RUST_LOG with a DEBUG default.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init(log_file_path: &Path) -> Result<()> {
    let log_file = File::create(log_file_path)
        .with_context(|| format!("failed to create log file {}", log_file_path.display()))?;
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into());
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Arc::new(log_file)))
        .with(env_filter)
        .init();
    Ok(())
}
