//! # Database Configuration
//!
//! Connection settings for [`Database`](crate::Database).
//!
//! Configuration is loaded from environment variables with fallback to defaults:
//!
//! | Variable                          | Default     |
//! |-----------------------------------|-------------|
//! | `CAMPUS_DB_PATH`                  | `campus.db` |
//! | `CAMPUS_DB_MAX_CONNECTIONS`       | `1`         |
//! | `CAMPUS_DB_CONNECT_TIMEOUT_SECS`  | `30`        |
//!
//! The default of one connection keeps every statement on a single writer,
//! which is what the admin tool expects from its store.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Database configuration.
///
/// ## Example
/// ```rust
/// use campus_db::DbConfig;
///
/// let config = DbConfig::new("/var/lib/campus/campus.db")
///     .max_connections(2)
///     .run_migrations(false);
/// assert_eq!(config.max_connections, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 1 (single writer)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps it forever.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to create the schema on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the database file at `path`.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Creates an in-memory database configuration (for tests).
    ///
    /// Each [`Database`](crate::Database) built from it gets its own empty
    /// store that lives as long as the pool does.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            // Closing the last connection drops the data
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Loads configuration from `CAMPUS_DB_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup("CAMPUS_DB_PATH").unwrap_or_else(|| "campus.db".to_string());

        let max_connections: u32 = lookup("CAMPUS_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "1".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CAMPUS_DB_MAX_CONNECTIONS".to_string()))?;

        let timeout_secs: u64 = lookup("CAMPUS_DB_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue("CAMPUS_DB_CONNECT_TIMEOUT_SECS".to_string())
            })?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "CAMPUS_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        let config = if path == IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(path)
        };

        Ok(config
            .max_connections(max_connections)
            .connect_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the idle timeout.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets whether to create the schema on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DbConfig::from_lookup(lookup_in(&[])).unwrap();

        assert_eq!(config.database_path, PathBuf::from("campus.db"));
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert!(config.run_migrations);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_overrides() {
        let config = DbConfig::from_lookup(lookup_in(&[
            ("CAMPUS_DB_PATH", "/tmp/uni.db"),
            ("CAMPUS_DB_MAX_CONNECTIONS", "4"),
            ("CAMPUS_DB_CONNECT_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/uni.db"));
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_memory_path_selects_in_memory_settings() {
        let config = DbConfig::from_lookup(lookup_in(&[("CAMPUS_DB_PATH", ":memory:")])).unwrap();

        assert!(config.is_in_memory());
        assert_eq!(config.idle_timeout, None);
    }

    #[test]
    fn test_invalid_values_are_named() {
        let err = DbConfig::from_lookup(lookup_in(&[("CAMPUS_DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for environment variable: CAMPUS_DB_MAX_CONNECTIONS"
        );

        assert!(DbConfig::from_lookup(lookup_in(&[("CAMPUS_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(
            DbConfig::from_lookup(lookup_in(&[("CAMPUS_DB_CONNECT_TIMEOUT_SECS", "-1")])).is_err()
        );
    }
}
