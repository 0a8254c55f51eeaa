use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::EnvFilter;

/// Initialize file-backed tracing. The TUI owns the terminal, so logs go
/// to a file under the system temp directory. The returned guard must be
/// kept alive for the lifetime of the process.
pub fn init_tracing() -> Result<WorkerGuard> {
    let log_file = fs::File::create(log_file_path())?;
    let (writer, guard) = non_blocking(log_file);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn log_file_path() -> PathBuf {
    std::env::temp_dir().join("barberexpress.log")
}
