use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Disk,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_transactions")]
    pub recent_transactions: usize,
    /// Share of outstanding debt subtracted from the margin in the net
    /// position figure.
    #[serde(default = "default_debt_weight")]
    pub debt_weight: f64,
}

fn default_recent_transactions() -> usize {
    5
}

fn default_debt_weight() -> f64 {
    0.05
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            recent_transactions: default_recent_transactions(),
            debt_weight: default_debt_weight(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Label shown next to amounts. No conversion is ever made.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub data_path: Option<String>,
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            data_path: None,
            storage: StorageKind::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from its default location, falling back to defaults
    /// when no file was created yet.
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
        let proj_dirs = ProjectDirs::from("org", "agrofin", "agrofin")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "agrofin", "agrofin")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
