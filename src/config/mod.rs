//! Configuration module for the tribute backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::db::IdScheme;

/// Which medium holds the record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// In-process memory, reset on restart
    Memory,
    /// SQLite file at `db_path`
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "sqlite" => Ok(StorageKind::Sqlite),
            other => Err(format!("unknown storage kind {:?}", other)),
        }
    }
}

/// Invalid configuration value.
#[derive(Debug)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.variable, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (optional in development)
    pub api_psk: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Storage medium for collections
    pub storage: StorageKind,
    /// Path to SQLite database file (sqlite storage only)
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory (sqlite storage only)
    pub index_path: PathBuf,
    /// Id scheme for newly created records
    pub id_scheme: IdScheme,
    /// Serve the example tributes while nothing is stored
    pub seed: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("TRIBUTE_API_PSK").ok().filter(|k| !k.is_empty());

        let bind_addr = parse_var("TRIBUTE_BIND_ADDR", "127.0.0.1:8080", |v| {
            v.parse::<SocketAddr>().map_err(|e| e.to_string())
        })?;

        let log_level = env::var("TRIBUTE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let storage = parse_var("TRIBUTE_STORAGE", "memory", StorageKind::from_str)?;

        let db_path = env::var("TRIBUTE_DB_PATH")
            .unwrap_or_else(|_| "./data/tributes.sqlite".to_string())
            .into();

        let index_path = env::var("TRIBUTE_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let id_scheme = parse_var("TRIBUTE_ID_SCHEME", "timestamp", IdScheme::from_str)?;

        let seed = parse_var("TRIBUTE_SEED", "true", |v| match v.trim() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(format!("expected a boolean, got {:?}", other)),
        })?;

        Ok(Self {
            api_psk,
            bind_addr,
            log_level,
            storage,
            db_path,
            index_path,
            id_scheme,
            seed,
        })
    }
}

fn parse_var<T>(
    variable: &'static str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    let raw = env::var(variable).unwrap_or_else(|_| default.to_string());
    parse(&raw).map_err(|message| ConfigError { variable, message })
}
