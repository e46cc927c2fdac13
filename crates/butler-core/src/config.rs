//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level butler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButlerConfig {
    /// HTTP server port.
    pub port: u16,
    /// Root data directory (e.g., `data/`).
    pub data_dir: PathBuf,
    /// Server-owned SQLite database (`data/butler.db`).
    pub db_path: PathBuf,
}

impl ButlerConfig {
    /// Create configuration from environment and defaults.
    /// Creates the data directory if needed.
    pub fn from_env() -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let data_dir = std::env::var("BUTLER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("butler.db");

        Ok(Self {
            port,
            data_dir,
            db_path,
        })
    }
}
