use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG_DIR: &str = "ARCHIVE_HISTORY_LOG_DIR";
const LOG_FILE_PREFIX: &str = "archive-history.log";

/// Stdout logging filtered by `RUST_LOG` (default `info`), plus a daily
/// rolling file when `log_dir` is given.
pub fn init(log_dir: Option<&str>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer().with_ansi(true);

    let file_layer = log_dir.map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        fmt::layer().with_ansi(false).with_writer(file_appender)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
