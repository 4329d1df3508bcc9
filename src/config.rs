use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::embed::mistral;
use crate::matching::RankingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "skillmatch.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embed: EmbedConfig,
    pub ranking: RankingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    pub listen_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database holding profiles
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Vector length the provider produces; also used for fallback vectors
    pub dimensions: usize,
    pub backend: EmbedBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EmbedBackend {
    #[serde(rename = "mistral")]
    Mistral {
        model: String,
        url: String,
        /// Environment variable holding the API key
        api_key_env: String,
    },
    #[serde(rename = "none")]
    None,
}

/// Bearer token → user id. Stands in for a real identity provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5001".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("skillmatch.db"),
        }
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            dimensions: mistral::DEFAULT_DIMENSIONS,
            backend: EmbedBackend::Mistral {
                model: mistral::DEFAULT_MODEL.into(),
                url: mistral::DEFAULT_URL.into(),
                api_key_env: "MISTRAL_API_KEY".into(),
            },
        }
    }
}

impl AuthConfig {
    pub fn user_for_token(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("parsing config from {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Write current config to disk (for `skillmatch init`).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating config dir {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing config to {}", path.display()))?;
        Ok(())
    }
}
