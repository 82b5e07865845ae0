//! Log setup: stderr plus an optional per-run log file.

use anyhow::Context;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Where to create the log file. `None` disables it.
    pub dir: Option<PathBuf>,
}

/// Name of the log file for a run started at `now`.
pub fn log_file_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("stress-{}.log", now.format("%Y-%m-%d-%H-%M-%S"))
}

fn open_log_file(dir: &Path) -> anyhow::Result<(File, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let path = dir.join(log_file_name(chrono::Local::now()));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    Ok((file, path))
}

/// Install the global subscriber. Returns the log file path, if any.
pub fn init(options: &LogOptions) -> anyhow::Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .with_context(|| format!("Invalid log level '{}'", options.level))?;

    let (writer, path) = match &options.dir {
        Some(dir) => {
            let (file, path) = open_log_file(dir)?;
            let writer = BoxMakeWriter::new(std::io::stderr.and(Arc::new(file)));
            (writer, Some(path))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(path)
}
