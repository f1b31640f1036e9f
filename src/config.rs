/// Configuration for cmd-finder
///
/// Loaded from a JSON file (missing file means defaults), then environment
/// overrides. CLI flags are applied on top by the binary.

use crate::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Rows shown on the browse page
pub const DEFAULT_BROWSE_LIMIT: usize = 20;
/// Upper bound for an explicit search
pub const DEFAULT_SEARCH_LIMIT: usize = 100;
/// Labels shown in the suggestion dropdown
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_BLUR_GRACE_MS: u64 = 150;

const APP_DIR: &str = ".cmd-finder";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: app_dir().join("commands.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub browse_limit: usize,
    pub search_limit: usize,
    pub suggestion_limit: usize,
    pub debounce_ms: u64,
    pub blur_grace_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            browse_limit: DEFAULT_BROWSE_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            blur_grace_ms: DEFAULT_BLUR_GRACE_MS,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load config from `path`, or from the default location when `None`
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => resolve_path(p),
        None => default_config_path(),
    };

    let mut cfg = if path.exists() {
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw).map_err(|e| {
            FinderError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?
    } else {
        Config::default()
    };

    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

/// `~/.cmd-finder/config.json`
pub fn default_config_path() -> PathBuf {
    app_dir().join("config.json")
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn resolve_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if let Some(home) = dirs::home_dir() {
        if raw == "~" {
            return home;
        }
        if let Some(rest) = raw.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

fn apply_env_overrides(cfg: &mut Config) -> Result<()> {
    if let Ok(db) = env::var("CMD_FINDER_DB") {
        cfg.database.path = resolve_path(Path::new(&db));
    }
    if let Ok(host) = env::var("CMD_FINDER_HOST") {
        cfg.server.host = host;
    }
    if let Ok(port) = env::var("CMD_FINDER_PORT") {
        cfg.server.port = port
            .parse()
            .map_err(|_| FinderError::Config(format!("invalid CMD_FINDER_PORT: {}", port)))?;
    }
    if let Ok(level) = env::var("CMD_FINDER_LOG") {
        cfg.logging.level = level;
    }
    Ok(())
}
