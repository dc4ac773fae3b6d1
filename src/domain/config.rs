// ============================================================================
// Run Configuration
// Sink connection settings and run options, sourced from the environment
// ============================================================================

use super::RecordLayout;
use chrono_tz::Tz;
use std::path::PathBuf;
use thiserror::Error;

/// Zone used for timestamp columns maintained by the sink
pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3306;
const DEFAULT_DATABASE: &str = "calculation_results";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Named time zone could not be loaded. Not fatal: callers fall back to UTC.
    #[error("failed to load time zone {name}: {reason}")]
    TimeZoneLoad { name: String, reason: String },

    #[error("invalid DB_PORT value {0:?}")]
    InvalidPort(String),

    #[error("unknown DB_DRIVER {0:?} (expected sqlite, memory or mysql)")]
    UnknownDriver(String),

    #[error("unknown RECORD_LAYOUT {0:?} (expected combined or per-strategy)")]
    UnknownLayout(String),

    #[error("sink driver {0} is not compiled in (enable the `{0}` feature)")]
    DriverUnavailable(&'static str),
}

// ============================================================================
// Sink Driver
// ============================================================================

/// Which result sink backend to connect to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkDriver {
    /// SQLite file (or `:memory:`) named by `DB_NAME`
    #[default]
    Sqlite,
    /// Process-local store, lost on exit
    Memory,
    /// MySQL server at `DB_HOST:DB_PORT` (requires the `mysql` feature)
    MySql,
}

impl std::str::FromStr for SinkDriver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(SinkDriver::Sqlite),
            "memory" => Ok(SinkDriver::Memory),
            "mysql" => Ok(SinkDriver::MySql),
            _ => Err(ConfigError::UnknownDriver(s.to_string())),
        }
    }
}

/// Load a named IANA time zone.
///
/// # Errors
/// Returns `TimeZoneLoad` if the name is not in the zone database.
pub fn load_time_zone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>().map_err(|err| ConfigError::TimeZoneLoad {
        name: name.to_string(),
        reason: err.to_string(),
    })
}

/// Load a named time zone, logging and falling back to UTC on failure.
pub fn resolve_time_zone(name: &str) -> Tz {
    match load_time_zone(name) {
        Ok(tz) => tz,
        Err(err) => {
            tracing::warn!(error = %err, "continuing with UTC timestamps");
            Tz::UTC
        },
    }
}

// ============================================================================
// Sink Configuration
// ============================================================================

/// Connection settings for the result sink
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    pub driver: SinkDriver,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
    /// Zone for created/updated/deleted timestamps
    pub time_zone: Tz,
    /// Decode timestamp columns into `DateTime` values instead of raw text
    pub parse_timestamps: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            driver: SinkDriver::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            database_name: DEFAULT_DATABASE.to_string(),
            time_zone: resolve_time_zone(DEFAULT_TIME_ZONE),
            parse_timestamps: true,
        }
    }
}

impl SinkConfig {
    /// Read `DB_DRIVER`, `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`
    /// and `DB_NAME` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing or empty keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(driver) = get("DB_DRIVER") {
            config.driver = driver.parse()?;
        }
        if let Some(host) = get("DB_HOST") {
            config.host = host;
        }
        if let Some(port) = get("DB_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(user) = get("DB_USER") {
            config.username = user;
        }
        if let Some(password) = get("DB_PASSWORD") {
            config.password = password;
        }
        if let Some(name) = get("DB_NAME") {
            config.database_name = name;
        }

        Ok(config)
    }

    /// Builder method: select the sink backend
    pub fn with_driver(mut self, driver: SinkDriver) -> Self {
        self.driver = driver;
        self
    }

    /// Builder method: set the database name (or SQLite path)
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Builder method: load a named time zone, falling back to UTC
    pub fn with_time_zone_name(mut self, name: &str) -> Self {
        self.time_zone = resolve_time_zone(name);
        self
    }

    /// Builder method: toggle timestamp decoding
    pub fn with_parse_timestamps(mut self, parse: bool) -> Self {
        self.parse_timestamps = parse;
        self
    }

    /// Database file for the SQLite driver.
    ///
    /// `DB_NAME` is used as-is when it has an extension or is `:memory:`,
    /// otherwise `.sqlite3` is appended.
    pub fn sqlite_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.database_name);
        if self.database_name == ":memory:" || path.extension().is_some() {
            path
        } else {
            path.with_extension("sqlite3")
        }
    }

    /// `host:port` address of the database server
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Run Configuration
// ============================================================================

/// Options for one calculation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub layout: RecordLayout,
    /// Read back and print every stored record after inserting
    pub report_all: bool,
}

impl RunConfig {
    /// Read `RECORD_LAYOUT` and `REPORT_ALL` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layout = match lookup("RECORD_LAYOUT").as_deref().map(str::trim) {
            None | Some("") | Some("combined") => RecordLayout::Combined,
            Some("per-strategy") | Some("per_strategy") => RecordLayout::PerStrategy,
            Some(other) => return Err(ConfigError::UnknownLayout(other.to_string())),
        };

        let report_all = matches!(
            lookup("REPORT_ALL").as_deref().map(str::trim),
            Some("1") | Some("true") | Some("yes")
        );

        Ok(Self { layout, report_all })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SinkConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.driver, SinkDriver::Sqlite);
        assert_eq!(config.port, 3306);
        assert_eq!(config.time_zone, Tz::Asia__Tokyo);
        assert!(config.parse_timestamps);
        assert_eq!(config.sqlite_path(), PathBuf::from("calculation_results.sqlite3"));
    }

    #[test]
    fn test_reads_db_variables() {
        let config = SinkConfig::from_lookup(lookup(&[
            ("DB_DRIVER", "mysql"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_USER", "calc"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "results"),
        ]))
        .unwrap();

        assert_eq!(config.driver, SinkDriver::MySql);
        assert_eq!(config.address(), "db.internal:3307");
        assert_eq!(config.username, "calc");
        assert_eq!(config.password, "secret");
        assert_eq!(config.database_name, "results");
    }

    #[test]
    fn test_invalid_port() {
        let result = SinkConfig::from_lookup(lookup(&[("DB_PORT", "abc")]));
        assert_eq!(result, Err(ConfigError::InvalidPort("abc".to_string())));
    }

    #[test]
    fn test_unknown_driver() {
        let result = SinkConfig::from_lookup(lookup(&[("DB_DRIVER", "postgres")]));
        assert_eq!(result, Err(ConfigError::UnknownDriver("postgres".to_string())));
    }

    #[test]
    fn test_time_zone_fallback() {
        assert!(matches!(
            load_time_zone("Mars/Olympus_Mons"),
            Err(ConfigError::TimeZoneLoad { .. })
        ));
        let config = SinkConfig::default().with_time_zone_name("Mars/Olympus_Mons");
        assert_eq!(config.time_zone, Tz::UTC);
    }

    #[test]
    fn test_sqlite_path() {
        let config = SinkConfig::default().with_database_name("results.db");
        assert_eq!(config.sqlite_path(), PathBuf::from("results.db"));
        let config = SinkConfig::default().with_database_name(":memory:");
        assert_eq!(config.sqlite_path(), PathBuf::from(":memory:"));
    }

    #[test]
    fn test_run_config() {
        let config = RunConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RunConfig::default());

        let config = RunConfig::from_lookup(lookup(&[
            ("RECORD_LAYOUT", "per-strategy"),
            ("REPORT_ALL", "1"),
        ]))
        .unwrap();
        assert_eq!(config.layout, RecordLayout::PerStrategy);
        assert!(config.report_all);

        let result = RunConfig::from_lookup(lookup(&[("RECORD_LAYOUT", "sideways")]));
        assert_eq!(result, Err(ConfigError::UnknownLayout("sideways".to_string())));
    }
}
