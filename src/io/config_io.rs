use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::config::Config;

/// Environment variables consulted for the API token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["TODOIST_API_TOKEN", "TODOIST_API_KEY"];
pub const API_URL_ENV: &str = "TDC_API_URL";
pub const SYNC_URL_ENV: &str = "TDC_SYNC_URL";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no API token: pass --api-key, set TODOIST_API_TOKEN, or add api_token to {0}")]
    MissingToken(PathBuf),
}

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("tdc").join("config.toml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path. A missing file yields defaults.
pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Effective settings for one invocation, after flags and environment are applied
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: String,
    pub api_url: String,
    pub sync_url: String,
    pub timeout: Duration,
    pub strip_emojis: bool,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub strip_emojis: bool,
}

impl Settings {
    /// Merge flag > environment > file. `env` is injected for testability.
    pub fn resolve(
        config: Config,
        overrides: Overrides,
        config_file: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Settings, ConfigError> {
        let present = |t: &String| !t.trim().is_empty();
        let token = overrides
            .api_key
            .filter(present)
            .or_else(|| {
                TOKEN_ENV_VARS
                    .iter()
                    .find_map(|var| env(*var).filter(present))
            })
            .or(config.api_token.filter(present))
            .ok_or_else(|| ConfigError::MissingToken(config_file.to_path_buf()))?;

        Ok(Settings {
            token,
            api_url: env(API_URL_ENV).unwrap_or(config.api_url),
            sync_url: env(SYNC_URL_ENV).unwrap_or(config.sync_url),
            timeout: Duration::from_secs(config.timeout_secs),
            strip_emojis: overrides.strip_emojis || config.strip_emojis,
        })
    }
}

/// Load settings from the default config location and the process environment.
pub fn load_settings(overrides: Overrides) -> Result<Settings, ConfigError> {
    let path = config_path();
    let config = read_config_from(&path)?;
    Settings::resolve(config, overrides, &path, |var| {
        std::env::var(var).ok().filter(|v| !v.is_empty())
    })
}
