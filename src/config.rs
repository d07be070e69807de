use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{RepopageError, Result};
use crate::paging::{MAX_PAGE_SIZE, PAGE_SIZE};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_user: Option<String>,
    pub page_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_user: None,
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_url: Option<String>,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            token_env: Some("GITHUB_TOKEN".to_string()),
            token_command: Some("gh auth token".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub github: GitHubConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("repopage").join("config.toml"))
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file is missing or unusable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring config at {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Load an explicitly requested file. Errors are reported, not ignored.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepopageError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| RepopageError::Config(e.to_string()))?;
        config.general.page_size = config.general.page_size.clamp(1, MAX_PAGE_SIZE);
        Ok(config)
    }
}
