//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults under the platform data
//! directory, an optional `config.json`, `INKSTREAK_*` environment variables,
//! then explicit overrides from the command line.

mod timeouts;

pub use timeouts::TimeoutConfig;

use inkstreak_domain::shared::DomainError;
use inkstreak_domain::streak::StreakStats;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const APP_DIR_NAME: &str = "inkstreak";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DATABASE_FILE_NAME: &str = "inkstreak.db";

pub const ENV_DB_PATH: &str = "INKSTREAK_DB_PATH";
pub const ENV_LOG_DIR: &str = "INKSTREAK_LOG_DIR";
pub const ENV_MAX_FREEZES: &str = "INKSTREAK_MAX_FREEZES";

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    /// Freeze allowance given to users registered without an explicit one
    pub default_max_streak_freezes: u32,
    pub db_max_connections: u32,
    pub timeouts: TimeoutConfig,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

/// Shape of `config.json`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    default_max_streak_freezes: Option<u32>,
    db_max_connections: Option<u32>,
    db_query_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Defaults rooted at `base_dir`
    pub fn defaults_in(base_dir: &Path) -> Self {
        Self {
            database_path: base_dir.join(DATABASE_FILE_NAME),
            log_dir: base_dir.join("logs"),
            default_max_streak_freezes: StreakStats::DEFAULT_MAX_STREAK_FREEZES,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            timeouts: TimeoutConfig::default(),
        }
    }

    /// Base directory used when nothing else is configured
    pub fn default_base_dir() -> Result<PathBuf, DomainError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                DomainError::Infrastructure("Could not determine platform data directory".into())
            })
    }

    /// Resolve all layers using the process environment
    pub fn load(overrides: ConfigOverrides) -> Result<Self, DomainError> {
        let base_dir = Self::default_base_dir()?;
        Self::resolve(&base_dir, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve all layers with an injectable environment lookup
    pub fn resolve<F>(
        base_dir: &Path,
        overrides: ConfigOverrides,
        env: F,
    ) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults_in(base_dir);

        let config_path = overrides
            .config_path
            .clone()
            .unwrap_or_else(|| base_dir.join(CONFIG_FILE_NAME));
        let explicit_file = overrides.config_path.is_some();

        if let Some(file) = read_config_file(&config_path, explicit_file)? {
            config.apply_file(file)?;
        }

        config.apply_env(env)?;
        config.apply_overrides(overrides);

        debug!(
            database_path = %config.database_path.display(),
            log_dir = %config.log_dir.display(),
            default_max_streak_freezes = config.default_max_streak_freezes,
            "Configuration resolved"
        );

        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<(), DomainError> {
        if let Some(path) = file.database_path {
            self.database_path = path;
        }
        if let Some(dir) = file.log_dir {
            self.log_dir = dir;
        }
        if let Some(max) = file.default_max_streak_freezes {
            self.default_max_streak_freezes = max;
        }
        if let Some(connections) = file.db_max_connections {
            if connections == 0 {
                return Err(invalid_value("db_max_connections", "0"));
            }
            self.db_max_connections = connections;
        }
        if let Some(secs) = file.db_query_timeout_secs {
            if secs == 0 {
                return Err(invalid_value("db_query_timeout_secs", "0"));
            }
            self.timeouts = TimeoutConfig::with_db_query_secs(secs);
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = non_empty(env(ENV_DB_PATH)) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(dir) = non_empty(env(ENV_LOG_DIR)) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = non_empty(env(ENV_MAX_FREEZES)) {
            self.default_max_streak_freezes = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid_value(ENV_MAX_FREEZES, &raw))?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.database_path {
            self.database_path = path;
        }
        if let Some(dir) = overrides.log_dir {
            self.log_dir = dir;
        }
    }
}

fn read_config_file(path: &Path, required: bool) -> Result<Option<ConfigFile>, DomainError> {
    if !path.exists() {
        if required {
            return Err(DomainError::Infrastructure(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        DomainError::Infrastructure(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&raw).map(Some).map_err(|e| {
        DomainError::Infrastructure(format!(
            "Invalid config file {}: {}",
            path.display(),
            e
        ))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid_value(key: &str, value: &str) -> DomainError {
    DomainError::Infrastructure(format!("Invalid value for {}: '{}'", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::resolve(dir.path(), ConfigOverrides::default(), env_from(&[]))
            .unwrap();

        assert_eq!(config.database_path, dir.path().join("inkstreak.db"));
        assert_eq!(config.log_dir, dir.path().join("logs"));
        assert_eq!(config.default_max_streak_freezes, 3);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.timeouts.db_query, Duration::from_secs(10));
    }

    #[test]
    fn test_layers_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{
                "database_path": "/from/file.db",
                "log_dir": "/from/file/logs",
                "default_max_streak_freezes": 5,
                "db_query_timeout_secs": 2
            }"#,
        )
        .unwrap();

        let env = env_from(&[("INKSTREAK_LOG_DIR", "/from/env/logs"), ("INKSTREAK_MAX_FREEZES", "7")]);
        let overrides = ConfigOverrides {
            database_path: Some(PathBuf::from("/from/cli.db")),
            ..Default::default()
        };

        let config = AppConfig::resolve(dir.path(), overrides, env).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/from/cli.db"));
        assert_eq!(config.log_dir, PathBuf::from("/from/env/logs"));
        assert_eq!(config.default_max_streak_freezes, 7);
        assert_eq!(config.timeouts.db_query, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_env_value_names_key() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_from(&[("INKSTREAK_MAX_FREEZES", "lots")]);

        let err = AppConfig::resolve(dir.path(), ConfigOverrides::default(), env).unwrap_err();

        assert!(matches!(err, DomainError::Infrastructure(_)));
        assert!(err.to_string().contains("INKSTREAK_MAX_FREEZES"));
    }

    #[test]
    fn test_unknown_file_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), r#"{ "max_freezes": 2 }"#).unwrap();

        let err = AppConfig::resolve(dir.path(), ConfigOverrides::default(), env_from(&[]))
            .unwrap_err();

        assert!(err.to_string().contains("max_freezes"));
    }

    #[test]
    fn test_explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = ConfigOverrides {
            config_path: Some(dir.path().join("missing.json")),
            ..Default::default()
        };

        let err = AppConfig::resolve(dir.path(), overrides, env_from(&[])).unwrap_err();

        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_zero_connections_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), r#"{ "db_max_connections": 0 }"#).unwrap();

        let err = AppConfig::resolve(dir.path(), ConfigOverrides::default(), env_from(&[]))
            .unwrap_err();

        assert!(err.to_string().contains("db_max_connections"));
    }
}
