use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompassConfig {
    // Completion API (OpenAI-compatible: OpenAI, Ollama, LM Studio, vLLM, etc.)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,

    // Persona selected on startup
    #[serde(default = "default_persona")]
    pub default_persona: String,

    // Sentiment side channel
    #[serde(default = "default_enable_sentiment")]
    pub enable_sentiment: bool,

    // Overrides the platform data directory for the conversation store
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_persona() -> String {
    "cbt-therapist".to_string()
}

fn default_enable_sentiment() -> bool {
    true
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            default_persona: default_persona(),
            enable_sentiment: default_enable_sentiment(),
            data_dir: None,
        }
    }
}

impl CompassConfig {
    /// Get the directory containing the executable
    fn get_base_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(exe_path) => exe_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
            Err(_) => PathBuf::from("."),
        }
    }

    /// Get the path to the config file (relative to executable)
    pub fn config_path() -> PathBuf {
        Self::get_base_dir().join("compass_config.toml")
    }

    /// Load config from compass_config.toml (next to executable), falling
    /// back to environment variables.
    pub fn load() -> Self {
        let path = Self::config_path();

        if let Ok(contents) = fs::read_to_string(&path) {
            match toml::from_str::<CompassConfig>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    return config.with_env_overrides();
                }
                Err(e) => {
                    tracing::error!("Failed to parse {:?}: {}", path, e);
                }
            }
        }

        tracing::warn!("No config file found, using defaults + env vars");
        Self::default().with_env_overrides()
    }

    /// Save config to file (next to executable)
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, toml_string)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Environment variables take precedence over the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("COMPASS_API_URL") {
            self.api_url = url;
        }

        if let Ok(key) = env::var("COMPASS_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            if let Ok(key) = env::var("OPENAI_API_KEY") {
                self.api_key = Some(key);
            }
        }

        if let Ok(model) = env::var("COMPASS_MODEL") {
            self.model = model;
        }

        if let Ok(persona) = env::var("COMPASS_DEFAULT_PERSONA") {
            if !persona.trim().is_empty() {
                self.default_persona = persona;
            }
        }

        if let Ok(disabled) = env::var("COMPASS_DISABLE_SENTIMENT") {
            let disabled = disabled.eq_ignore_ascii_case("1")
                || disabled.eq_ignore_ascii_case("true")
                || disabled.eq_ignore_ascii_case("yes");
            if disabled {
                self.enable_sentiment = false;
            }
        }

        if let Ok(dir) = env::var("COMPASS_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }

        self
    }
}
