use std::path::PathBuf;

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Address the HTTP API binds to (default: 127.0.0.1:8787).
    pub bind_addr: String,
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Mean point-distance below which a capture matches a stored hand.
    pub match_threshold: f64,
    /// Use a throwaway in-memory store instead of SQLite.
    pub ephemeral: bool,
}

impl Config {
    /// Load configuration from `PALMAR_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("palmar");

        let db_path = std::env::var("PALMAR_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("hands.db"));

        Self {
            bind_addr: std::env::var("PALMAR_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8787".to_string()),
            db_path,
            match_threshold: env_f64(
                "PALMAR_MATCH_THRESHOLD",
                palmar_core::DEFAULT_MATCH_THRESHOLD,
            ),
            ephemeral: std::env::var("PALMAR_EPHEMERAL")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
