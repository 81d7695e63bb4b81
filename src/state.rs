use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::services::Dashboard;
use crate::types::Config;

/// Environment override for the data root.
pub const DATA_DIR_ENV: &str = "BOOSTERDASH_DATA_DIR";

/// Application state built once at startup
pub struct AppState {
    pub dashboard: Dashboard,
    /// Where configuration was looked for, if a home directory exists
    pub config_path: Option<PathBuf>,
}

impl AppState {
    /// Load config, apply the environment and CLI overrides, and build the
    /// dashboard handle.
    pub fn new(cli_data_dir: Option<PathBuf>) -> Self {
        let config_path = match config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("{}. Using default configuration.", e);
                None
            }
        };

        let config = config_path
            .as_deref()
            .map(load_config_or_default)
            .unwrap_or_default();
        let config = apply_overrides(config, std::env::var(DATA_DIR_ENV).ok(), cli_data_dir);
        log::info!("Data root: {}", config.data_dir.display());

        Self {
            dashboard: Dashboard::new(config),
            config_path,
        }
    }
}

/// ~/.boosterdash/config.json
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".boosterdash").join("config.json"))
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

fn load_config_or_default(path: &Path) -> Config {
    load_config(path).unwrap_or_else(|e| {
        log::warn!("Ignoring {}: {}", path.display(), e);
        Config::default()
    })
}

/// CLI flag beats the environment, which beats the config file.
pub fn apply_overrides(mut config: Config, env_data_dir: Option<String>, cli_data_dir: Option<PathBuf>) -> Config {
    if let Some(dir) = env_data_dir.filter(|d| !d.trim().is_empty()) {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(dir) = cli_data_dir {
        config.data_dir = dir;
    }
    config
}
