use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::github::DEFAULT_API_URL;

/// The remote destination of one upload run: owner, repository name, and
/// the credential used for every call. Immutable once built.
#[derive(Debug, Clone)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
    pub token: String,
}

impl RepoTarget {
    /// Build a target, rejecting missing fields before any network call is
    /// made.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let owner = owner.into().trim().to_string();
        let repo = repo.into().trim().to_string();
        let token = token.into().trim().to_string();

        if owner.is_empty() {
            anyhow::bail!("Repository owner is required");
        }
        if repo.is_empty() {
            anyhow::bail!("Repository name is required");
        }
        if token.is_empty() {
            anyhow::bail!("GitHub token is required");
        }

        Ok(Self { owner, repo, token })
    }
}

/// Configuration for ghpush
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploaderConfig {
    /// Owner used when `--owner` is not passed
    #[serde(default)]
    pub default_owner: Option<String>,
    /// Description for repositories created by an upload run
    #[serde(default = "defaults::description")]
    pub default_description: String,
    /// Pause between consecutive file uploads, in milliseconds
    #[serde(default = "defaults::file_delay_ms")]
    pub file_delay_ms: u64,
    /// GitHub API base URL
    #[serde(default = "defaults::api_url")]
    pub api_url: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            default_owner: None,
            default_description: defaults::description(),
            file_delay_ms: defaults::file_delay_ms(),
            api_url: defaults::api_url(),
        }
    }
}

impl UploaderConfig {
    /// Load configuration from the config file and environment variables.
    /// A missing config file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        tracing::debug!("Loading ghpush config from {:?}", config_path);
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        if let Ok(url) = env::var("GHPUSH_API_URL") {
            config.api_url = url;
        }

        if let Ok(delay) = env::var("GHPUSH_FILE_DELAY_MS") {
            config.file_delay_ms = delay
                .parse()
                .context("Failed to parse GHPUSH_FILE_DELAY_MS as u64")?;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: UploaderConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the config file path, honoring the `GHPUSH_CONFIG` override
    pub fn config_file_path() -> Result<PathBuf> {
        if let Ok(path) = env::var("GHPUSH_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(".config/ghpush/config.yaml"))
            .context("Could not determine home directory for config file")
    }
}

mod defaults {
    pub(crate) fn description() -> String {
        "Uploaded with ghpush".to_string()
    }

    pub(crate) fn file_delay_ms() -> u64 {
        1000
    }

    pub(crate) fn api_url() -> String {
        super::DEFAULT_API_URL.to_string()
    }
}
