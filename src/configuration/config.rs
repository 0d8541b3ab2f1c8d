use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::error_handling::types::ConfigError;
use crate::storage::database_storage::DatabaseStorage;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Application configuration structure that defines all runtime parameters.
///
/// Values come either from the command line (each flag also reads an
/// environment variable) or, when `--config` is given, entirely from a TOML
/// file. Keys missing from the file fall back to the same defaults as the
/// flags.
///
/// ```toml
/// host = "0.0.0.0"
/// port = 8080
/// storage_db = "/var/lib/scribe/storage.db"
/// max_connections = 5
/// request_timeout_ms = 5000
/// ```
#[derive(Parser, Debug, Clone, PartialEq, Deserialize)]
#[command(name = "scribe")]
#[command(version)]
#[command(about = "A minimal blog server", long_about = None)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// Load the configuration from this TOML file instead of the flags
    #[arg(long, value_name = "FILE")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Host name or IP address to listen on
    #[arg(long, env = "SCRIBE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// TCP port to listen on
    #[arg(long, env = "SCRIBE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// SQLite database file, or `:memory:` for a throwaway database
    #[arg(long, env = "SCRIBE_STORAGE_DB", default_value = DatabaseStorage::DEFAULT_DB_FILE)]
    pub storage_db: String,

    /// Upper bound of the database connection pool
    #[arg(long, env = "SCRIBE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Deadline for the storage work of a single request, in milliseconds
    #[arg(long, env = "SCRIBE_REQUEST_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            config: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage_db: DatabaseStorage::DEFAULT_DB_FILE.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Configuration {
    /// Parse the process arguments, follow `--config` if present and validate.
    ///
    /// Exits with a usage message if the arguments cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(Self::parse())
    }

    fn resolve(args: Self) -> Result<Self, ConfigError> {
        let config = match args.config.clone() {
            Some(path) => Self::from_file(&path)?,
            None => args,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&raw).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.config = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("host must not be empty".into()));
        }
        if self.storage_db.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "storage_db must not be empty".into(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "max_connections must be at least 1".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Resolve `host:port` to the first matching socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let target = format!("{}:{}", self.host, self.port);
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ConfigError::ResolveFailed(format!("{}: {}", target, e)))?
            .next()
            .ok_or(ConfigError::ResolveFailed(target))
    }
}
