use std::path::Path;

use color_eyre::eyre::eyre;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Routes tracing output to a file; the terminal belongs to the dashboard.
///
/// `RUST_LOG` wins when set, otherwise `debug` picks between `debug` and `info`.
pub fn init_logging(log_file: &Path, debug: bool) -> color_eyre::eyre::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("literacy_desk={default_level}")));

    let file = std::sync::Arc::new(std::fs::File::create(log_file)?);
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(file)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("Failed to install tracing subscriber: {e}"))?;
    info!(path = %log_file.display(), "logging initialized");
    Ok(())
}
