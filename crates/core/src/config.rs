//! Configuration management for the Redraft CLI.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Defaults
//! - Config files (.redraft.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Credentials are only ever read from the environment, never from files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect a single
/// invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Change-engine provider (e.g., "openai", "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Custom endpoint for the provider
    pub endpoint: Option<String>,

    /// API key for the change-engine provider
    pub api_key: Option<String>,

    /// Token used to push branches and open pull requests
    pub github_token: Option<String>,

    /// Maximum lines per rewrite segment
    pub max_lines: usize,

    /// Sampling temperature for rewrite requests
    pub temperature: f32,

    /// Token budget per rewrite request
    pub max_tokens: u32,

    /// Log level override
    pub log_level: Option<String>,

    /// Directory holding the persistent diagnostic log
    pub log_dir: PathBuf,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "maxLines")]
    max_lines: Option<usize>,
    temperature: Option<f32>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            endpoint: None,
            api_key: None,
            github_token: None,
            max_lines: 100,
            temperature: 0.2,
            max_tokens: 4000,
            log_level: None,
            log_dir: PathBuf::from(".redraft"),
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from config file, environment variables, and
    /// defaults.
    ///
    /// Environment variables:
    /// - `REDRAFT_CONFIG`: Path to config file
    /// - `REDRAFT_PROVIDER`: Change-engine provider
    /// - `REDRAFT_MODEL`: Model identifier
    /// - `REDRAFT_ENDPOINT`: Custom provider endpoint
    /// - `REDRAFT_MAX_LINES`: Maximum lines per segment
    /// - `OPENAI_API_KEY`: Change-engine credential
    /// - `GITHUB_TOKEN`: Publication credential
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("REDRAFT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            PathBuf::from(".redraft.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("REDRAFT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("REDRAFT_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("REDRAFT_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(max_lines) = std::env::var("REDRAFT_MAX_LINES") {
            config.max_lines = max_lines.parse().map_err(|_| {
                AppError::Config(format!("Invalid REDRAFT_MAX_LINES value: {}", max_lines))
            })?;
        }

        config.api_key = std::env::var("OPENAI_API_KEY").ok();
        config.github_token = std::env::var("GITHUB_TOKEN").ok();

        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(provider) = config_file.provider {
            result.provider = provider;
        }

        if let Some(model) = config_file.model {
            result.model = model;
        }

        if let Some(endpoint) = config_file.endpoint {
            result.endpoint = Some(endpoint);
        }

        if let Some(max_lines) = config_file.max_lines {
            result.max_lines = max_lines;
        }

        if let Some(temperature) = config_file.temperature {
            result.temperature = temperature;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(dir) = logging.dir {
                result.log_dir = PathBuf::from(dir);
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        endpoint: Option<String>,
        max_lines: Option<usize>,
        temperature: Option<f32>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint);
        }

        if let Some(max_lines) = max_lines {
            self.max_lines = max_lines;
        }

        if let Some(temperature) = temperature {
            self.temperature = temperature;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration for the active provider.
    ///
    /// A missing change-engine credential is fatal here, before any file is
    /// read or cloned.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["openai", "ollama", "mock"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.provider == "openai" && self.api_key.is_none() {
            return Err(AppError::Config(
                "OPENAI_API_KEY is not set; the openai provider requires it".to_string(),
            ));
        }

        if self.max_lines == 0 {
            return Err(AppError::Config(
                "maxLines must be a positive number".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the publication token, failing if it is absent.
    ///
    /// Only remote references need this; local rewrites never touch it.
    pub fn require_github_token(&self) -> AppResult<&str> {
        self.github_token.as_deref().ok_or_else(|| {
            AppError::Config(
                "GITHUB_TOKEN is not set; remote references require it".to_string(),
            )
        })
    }
}
