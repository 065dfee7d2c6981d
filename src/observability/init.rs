//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "shelfmark.log";

/// Initializes the tracing subscriber with a rotating log file.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable, if set and valid
/// 2. `config.log_level`
/// 3. Default: `"info"`
///
/// # File Location
///
/// `<data_dir>/shelfmark.log`, rotated at 10 MB with 3 backups.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently returns if the directory cannot be created (logging is optional)
/// - Only the first call installs a subscriber; later calls are no-ops
///
/// # Example
///
/// ```rust,no_run
/// use shelfmark::observability::init_tracing;
/// use shelfmark::Config;
///
/// let config = Config {
///     log_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = config.data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(FileWriter::new(data_dir.join(LOG_FILE_NAME)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}
