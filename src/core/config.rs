use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::dashboard::DashboardLimits;
use crate::core::search::DEFAULT_MIN_LENGTH;
use crate::core::theme::Theme;
use crate::providers::alpha_vantage::DEFAULT_BASE_URL;

pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlphaVantageConfig {
    pub base_url: String,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        AlphaVantageConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub alpha_vantage: AlphaVantageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub history_days: usize,
    pub news_limit: usize,
    pub search_min_length: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let limits = DashboardLimits::default();
        DashboardConfig {
            history_days: limits.history_days,
            news_limit: limits.news_limit,
            search_min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl DashboardConfig {
    pub fn limits(&self) -> DashboardLimits {
        DashboardLimits {
            history_days: self.history_days,
            news_limit: self.news_limit,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "stocklab", "stocklab")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The API key from the environment, else from the config file.
    pub fn resolve_api_key(&self) -> Result<String> {
        Self::pick_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn pick_api_key(from_env: Option<String>, from_config: Option<&str>) -> Result<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                from_config
                    .filter(|k| !k.trim().is_empty())
                    .map(str::to_string)
            })
            .with_context(|| {
                format!("No Alpha Vantage API key configured. Set {API_KEY_ENV} or add api_key to the config file")
            })
    }
}
