use std::{env, path::PathBuf, sync::Once};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".bandbook";
const BOOKS_DIR: &str = "books";
const BACKUP_DIR: &str = "backups";

/// Returns the application data directory, defaulting to `~/.bandbook`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BANDBOOK_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Absolute path to the managed books directory.
pub fn books_dir() -> PathBuf {
    app_data_dir().join(BOOKS_DIR)
}

/// Base directory for backup snapshots.
pub fn backups_root() -> PathBuf {
    app_data_dir().join(BACKUP_DIR)
}

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env().add_directive("bandbook=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}
