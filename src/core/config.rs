use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuotesConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_token: String,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        QuotesConfig {
            base_url: "https://eodhistoricaldata.com".to_string(),
            api_token: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "papertrade", "papertrade")
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

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "papertrade", "papertrade")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// The daily price cache slot, scoped per user so two accounts on one
    /// machine never share fetched prices.
    pub fn price_cache_path(&self, username: &str) -> Result<PathBuf> {
        Ok(self
            .data_path()?
            .join("cache")
            .join(format!("prices-{username}.json")))
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        Ok(self.data_path()?.join("session.json"))
    }
}
