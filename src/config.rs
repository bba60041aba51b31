//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::Backend;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Default parameter values (used when CLI flags are not given).
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// `DeepSeek` API key.
    pub deepseek: Option<String>,
    /// `OpenAI` API key.
    pub openai: Option<String>,
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default text model name or alias.
    pub model: String,
    /// Default sampling temperature.
    pub temperature: f32,
    /// Default response-length ceiling.
    pub max_tokens: u32,
    /// Default output path for the normalized image.
    pub output: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "deepseek".to_string(),
            temperature: 0.7,
            max_tokens: 600,
            output: "formatted_product.jpg".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the API key for a backend, preferring its environment variable.
    #[must_use]
    pub fn api_key(&self, backend: Backend) -> Option<String> {
        let from_file = match backend {
            Backend::DeepSeek => &self.keys.deepseek,
            Backend::OpenAi => &self.keys.openai,
        };
        std::env::var(backend.env_var())
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| from_file.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `LISTINGKIT_CONFIG` environment variable
/// 3. `~/.config/listingkit/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("LISTINGKIT_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/listingkit/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/listingkit/config.toml")
    } else {
        PathBuf::from("listingkit.toml")
    }
}
