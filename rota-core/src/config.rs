//! Configuration management for Rota
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (ROTA_*)
//! 3. Config file (~/.config/rota/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which storage backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite database on disk
    #[default]
    Sqlite,
    /// Process-local memory; state is lost on exit
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!("unknown store backend: {}", other))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Path to the SQLite database file (defaults to ~/.cache/rota/rota.db)
    pub path: Option<PathBuf>,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// How long SQLite waits on a locked database before failing
    #[serde(with = "humantime_serde")]
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    /// Database path, falling back to the default cache location
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Self::default_database_path(),
        }
    }

    /// Returns `~/.cache/rota/rota.db`
    pub fn default_database_path() -> Result<PathBuf> {
        dirs::cache_dir()
            .map(|p| p.join("rota").join("rota.db"))
            .ok_or_else(|| Error::Config("Could not determine cache directory".to_string()))
    }
}

/// Reviewer selection configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Fixed seed for the random source; unset means seeded from entropy
    pub seed: Option<u64>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub selection: SelectionConfig,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub backend: Option<StoreBackend>,
    pub db_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Returns `~/.config/rota/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rota").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - ROTA_STORE: `sqlite` or `memory`
    /// - ROTA_DB_PATH: SQLite database file
    /// - ROTA_SEED: fixed selection seed
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(backend) = lookup("ROTA_STORE") {
            self.store.backend = backend.parse()?;
        }

        if let Some(path) = lookup("ROTA_DB_PATH") {
            self.store.path = Some(PathBuf::from(path));
        }

        if let Some(seed) = lookup("ROTA_SEED") {
            let seed = seed
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid ROTA_SEED: {}", e)))?;
            self.selection.seed = Some(seed);
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }

        if let Some(path) = overrides.db_path {
            self.store.path = Some(path);
        }

        if let Some(seed) = overrides.seed {
            self.selection.seed = Some(seed);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(overrides: CliOverrides) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.max_connections, 5);
        assert_eq!(config.store.busy_timeout, Duration::from_secs(5));
        assert!(config.selection.seed.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[store]
backend = "memory"
path = "/tmp/rota.db"
busy_timeout = "250ms"

[selection]
seed = 42
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/rota.db")));
        assert_eq!(config.store.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.selection.seed, Some(42));
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[selection]
seed = 7
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // store section should use defaults
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.selection.seed, Some(7));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nmax_connections = 2\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.store.max_connections, 2);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[store\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ROTA_STORE", "memory"),
            ("ROTA_DB_PATH", "/data/rota.db"),
            ("ROTA_SEED", "99"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.path, Some(PathBuf::from("/data/rota.db")));
        assert_eq!(config.selection.seed, Some(99));
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let result = Config::default()
            .with_overrides_from(|key| (key == "ROTA_SEED").then(|| "abc".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config::default().with_cli_overrides(CliOverrides {
            backend: Some(StoreBackend::Memory),
            db_path: None,
            seed: Some(1),
        });

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.selection.seed, Some(1));
        assert!(config.store.path.is_none());
    }
}
