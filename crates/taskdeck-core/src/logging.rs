//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "TASKDECK_LOG";

const LOG_FILE_NAME: &str = "taskdeck.log";

/// Filter used when `TASKDECK_LOG` is unset: info for every taskdeck crate,
/// warn for everything else.
pub const DEFAULT_FILTER: &str =
    "taskdeck=info,taskdeck_core=info,taskdeck_api=info,taskdeck_app=info,warn";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/taskdeck/logs/` so that stdout stays
/// reserved for the NDJSON console. Log level is controlled by the
/// `TASKDECK_LOG` environment variable.
///
/// # Examples
/// ```bash
/// TASKDECK_LOG=debug taskdeck
/// TASKDECK_LOG=taskdeck_app=trace taskdeck
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("taskdeck starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("taskdeck").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join(LOG_FILE_NAME))
}
