//! Casa client configuration.
//!
//! Config file: ~/.config/casa/config.toml or /etc/casa/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default backend when nothing else resolves (local development).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

fn default_watch_interval() -> u64 {
    15
}

/// Backend endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the casa backend, e.g. "https://casa.example.org".
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Notification watch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Poll interval in seconds.
    #[serde(default = "default_watch_interval")]
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_watch_interval(),
        }
    }
}

/// Main casa configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CasaConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl CasaConfig {
    /// Get default user config path: ~/.config/casa/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("XDG_CONFIG_HOME"))
            .context("Cannot determine home directory")?;

        let config_dir = if home.contains("/.config") {
            PathBuf::from(home)
        } else {
            Path::new(&home).join(".config")
        };

        Ok(config_dir.join("casa").join("config.toml"))
    }

    /// Get system config path: /etc/casa/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/casa/config.toml")
    }

    /// Load configuration from file.
    ///
    /// Priority:
    /// 1. User config (~/.config/casa/config.toml)
    /// 2. System config (/etc/casa/config.toml)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                let contents = fs::read_to_string(&user_path)
                    .with_context(|| format!("Failed to read {}", user_path.display()))?;
                let config: CasaConfig = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse {}", user_path.display()))?;
                return Ok(config);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            let contents = fs::read_to_string(&system_path)
                .with_context(|| format!("Failed to read {}", system_path.display()))?;
            let config: CasaConfig = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", system_path.display()))?;
            return Ok(config);
        }

        Ok(Self::default())
    }

    /// Save configuration to the user config file.
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(&path, toml_string).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: CasaConfig = toml::from_str("").unwrap();
        assert!(config.api.base_url.is_none());
        assert_eq!(config.watch.interval_secs, 15);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: CasaConfig = toml::from_str(
            "[api]\nbase_url = \"https://casa.example.org\"\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("https://casa.example.org"));
        assert_eq!(config.watch.interval_secs, 15);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = CasaConfig::default();
        config.api.base_url = Some("http://10.0.0.7:5001".into());
        config.watch.interval_secs = 30;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: CasaConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.api.base_url, config.api.base_url);
        assert_eq!(back.watch.interval_secs, 30);
    }
}
