//! Configuration management for the CV analyzer

use crate::error::{CvAnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Gemini API key. The key is read once
/// at startup, handed opaquely to the client, and never written to the
/// config file or the logs.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier passed to the generation endpoint.
    pub name: String,
    /// Base URL of the generation service.
    pub endpoint: String,
    /// Upper bound on a single generation call, in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                name: "gemini-2.5-flash".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_secs: 90,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                CvAnalyzerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            CvAnalyzerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-analyzer")
            .join("config.toml")
    }
}

/// Read the API credential from the environment.
pub fn api_key() -> Result<String> {
    std::env::var(API_KEY_ENV).map_err(|_| {
        CvAnalyzerError::Configuration(format!(
            "{} is not set. Export your Gemini API key before running an analysis.",
            API_KEY_ENV
        ))
    })
}
