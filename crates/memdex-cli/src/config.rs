//! Configuration management for Memdex CLI
//!
//! Stores the cluster connection and embedding settings in ~/.config/memdex/config.toml

use anyhow::{Context, Result};
use memdex_elasticsearch::ElasticsearchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "memdex";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            elasticsearch: ElasticsearchConfig::default(),
            openai_api_key: None,
            embedding_model: default_embedding_model(),
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub es_url: Option<String>,
    pub es_username: Option<String>,
    pub es_password: Option<String>,
    pub index_prefix: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Layer command line / environment values over the file values
    pub fn apply(mut self, overrides: Overrides) -> Self {
        let es = &mut self.elasticsearch;
        if let Some(url) = overrides.es_url {
            es.server_address = url;
        }
        if let Some(username) = overrides.es_username {
            es.username = Some(username);
        }
        if let Some(password) = overrides.es_password {
            es.password = Some(password);
        }
        if let Some(prefix) = overrides.index_prefix {
            es.index_prefix = prefix;
        }
        if let Some(key) = overrides.openai_api_key {
            self.openai_api_key = Some(key);
        }
        self
    }
}
