/// Config schema types (server, database).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Port used when neither the config file, `PORT`, nor `--port` supplies one.
pub const DEFAULT_PORT: u16 = 3000;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintelConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: DEFAULT_PORT,
        }
    }
}

/// SQLite database location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the database file. Created on first start if missing.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("analyses.db"),
        }
    }
}
