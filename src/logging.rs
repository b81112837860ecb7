use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = ".agentshell";

/// Route tracing output to `~/.agentshell/<timestamp>.log`; the terminal
/// belongs to the TUI. Without a home directory logging stays off. The filter
/// comes from `RUST_LOG` and defaults to `info`.
pub(crate) fn init() -> Result<Option<PathBuf>> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };
    let log_dir = home.join(LOG_DIR);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let file_name = format!("{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let appender = rolling::never(&log_dir, &file_name);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .context("install tracing subscriber")?;

    let path = log_dir.join(file_name);
    tracing::debug!(path = %path.display(), "tracing initialized");
    Ok(Some(path))
}
