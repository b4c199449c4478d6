use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::db::{StoreError, StoreMode};
use crate::lexicon::catalog::DictionaryLoadError;
use crate::services::scheduler::DEFAULT_HALF_LIFE_HOURS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryLoadError),
    #[error("record store unavailable: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Set when `ENABLE_FILE_LOGS` is on; defaults to `./logs`.
    pub log_dir: Option<PathBuf>,
    pub dictionary_path: PathBuf,
    pub database_url: Option<String>,
    pub record_store: StoreMode,
    pub default_half_life_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });

        let dictionary_path = std::env::var("DICTIONARY_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/dictionary.json"));

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let record_store = std::env::var("RECORD_STORE")
            .ok()
            .and_then(|value| StoreMode::parse(&value))
            .unwrap_or(StoreMode::Sqlite);

        let default_half_life_hours = std::env::var("DEFAULT_HALF_LIFE_HOURS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_HALF_LIFE_HOURS);

        Self {
            host,
            port,
            log_level,
            log_dir,
            dictionary_path,
            database_url,
            record_store,
            default_half_life_hours,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn default_half_life(&self) -> chrono::Duration {
        chrono::Duration::hours(self.default_half_life_hours)
    }
}
