//! Log setup for the binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Send warnings and errors to stderr and everything from `debug` up to the
/// file at `log_path`.
///
/// The file is appended to, and created if it does not exist. Set `RUST_LOG`
/// to change what is written to the file, e.g. `RUST_LOG=info`.
///
/// # Errors
/// Returns an [io::Error] if the log file cannot be opened.
///
/// # Panics
/// Panics if a global subscriber has already been set.
pub fn setup_logging(log_path: &Path) -> Result<(), io::Error> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_filter(LevelFilter::WARN);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
