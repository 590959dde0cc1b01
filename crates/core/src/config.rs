use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths::Paths;
use crate::types::{Mode, SavedFlow};

/// Environment variable that carries the intelligence-service credential.
/// It takes precedence over the key stored in the config file.
pub const API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub mode: Mode,
    /// Origin tag attached to captures that do not name their own source.
    #[serde(default = "default_source_label")]
    pub source_label: String,
    /// Buffer size of the capture bus channels.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_source_label() -> String {
    "Browser Context".to_string()
}

fn default_bus_capacity() -> usize {
    64
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            mode: Mode::default(),
            source_label: default_source_label(),
            bus_capacity: default_bus_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default)]
    pub companion: CompanionConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mut providers = HashMap::new();
        providers.insert("gemini".to_string(), ProviderConfig::default());

        Self {
            providers,
            companion: CompanionConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, deep inside the companion.
    pub fn validate(&self) -> Result<()> {
        if self.companion.bus_capacity == 0 {
            return Err(Error::Config(
                "companion.busCapacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_or_default(paths: &Paths) -> Result<Self> {
        let config_path = paths.config_file();
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn gemini(&self) -> Option<&ProviderConfig> {
        self.providers.get("gemini")
    }

    /// The credential gating remote suggestions, `API_KEY` first.
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// Blank values count as absent on both sides.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        if let Some(key) = env_value {
            let key = key.trim();
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
        self.gemini()
            .map(|p| p.api_key.trim())
            .filter(|k| !k.is_empty())
            .map(|k| k.to_string())
    }

    pub fn set_api_key(&mut self, key: &str) {
        self.providers
            .entry("gemini".to_string())
            .or_default()
            .api_key = key.trim().to_string();
    }

    pub fn api_base(&self) -> Option<&str> {
        self.gemini()
            .and_then(|p| p.api_base.as_deref())
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
    }
}

/// Saved flows from `flows.json`, or the built-in set when the file is absent.
pub fn load_flows(paths: &Paths) -> Result<Vec<SavedFlow>> {
    let path = paths.flows_file();
    if !path.exists() {
        return Ok(SavedFlow::builtin());
    }
    let content = std::fs::read_to_string(&path)?;
    let flows: Vec<SavedFlow> = serde_json::from_str(&content)?;
    Ok(flows)
}
