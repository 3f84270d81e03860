//! Configuration management for dataflow.
//!
//! Parses `dataflow.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `gemini.api_keys` (entries that expand to an empty string are dropped)
//! - `gemini.base_url`
//! - `gemini.model`
//!
//! With no key in the file or on the command line, `GEMINI_API_KEY` supplies one.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Replace the configured API keys.
    pub api_keys: Option<Vec<String>>,
    /// Override model path segment.
    pub model: Option<String>,
    /// Override attempt budget.
    pub max_attempts: Option<u32>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dataflow.toml";

/// Upper bound for `gemini.max_attempts`.
const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation endpoint configuration.
    pub gemini: GeminiConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Generation endpoint configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Interchangeable API keys, rotated on quota exhaustion.
    pub api_keys: Vec<String>,
    /// Endpoint host.
    pub base_url: String,
    /// API version path segment.
    pub api_version: String,
    /// Model path segment.
    pub model: String,
    /// Attempt budget shared by quota, empty and malformed-JSON retries.
    pub max_attempts: u32,
    /// HTTP timeout per request, in seconds.
    pub timeout_secs: u64,
    /// Sampling parameters.
    pub tuning: TuningConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: "https://generativelanguage.googleapis.com".to_owned(),
            api_version: "v1beta".to_owned(),
            model: "models/gemini-1.5-flash".to_owned(),
            max_attempts: 3,
            timeout_secs: 60,
            tuning: TuningConfig::default(),
        }
    }
}

impl GeminiConfig {
    /// HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.1,
            top_k: 1,
            max_output_tokens: 2048,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`gemini.api_keys[0]`").
        field: String,
        /// Error message (e.g., "${`GEMINI_API_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a float field to lie within an inclusive range.
fn require_range(value: f32, min: f32, max: f32, field: &str) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dataflow.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and the result is validated again,
    /// so overrides are held to the same rules as file values. When no API key
    /// remains, `GEMINI_API_KEY` is used if set.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }
        config.fill_api_key_from_env();

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(api_keys) = &settings.api_keys {
            self.gemini.api_keys = api_keys
                .iter()
                .filter(|key| !key.trim().is_empty())
                .cloned()
                .collect();
        }
        if let Some(model) = &settings.model {
            self.gemini.model.clone_from(model);
        }
        if let Some(max_attempts) = settings.max_attempts {
            self.gemini.max_attempts = max_attempts;
        }
    }

    /// Use `GEMINI_API_KEY` when neither the file nor the CLI supplied a key.
    ///
    /// Configured keys are never supplemented, so a file listing
    /// `${GEMINI_API_KEY}` alongside other keys keeps all of them.
    fn fill_api_key_from_env(&mut self) {
        if self.gemini.api_keys.is_empty()
            && let Some(key) = expand::api_key_from_env()
        {
            self.gemini.api_keys.push(key);
        }
    }

    /// Get the configured API keys.
    ///
    /// Only commands that call the generation endpoint need keys, so their
    /// absence is not a load-time error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no key is configured.
    pub fn require_api_keys(&self) -> Result<&[String], ConfigError> {
        if self.gemini.api_keys.is_empty() {
            return Err(ConfigError::Validation(
                "at least one API key required (gemini.api_keys, --api-key or GEMINI_API_KEY)"
                    .to_owned(),
            ));
        }
        Ok(&self.gemini.api_keys)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::discover_from(&cwd)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_endpoint()?;
        self.validate_tuning()?;
        Ok(())
    }

    /// Validate endpoint and retry settings.
    fn validate_endpoint(&self) -> Result<(), ConfigError> {
        let gemini = &self.gemini;
        require_non_empty(&gemini.base_url, "gemini.base_url")?;
        require_http_url(&gemini.base_url, "gemini.base_url")?;
        require_non_empty(&gemini.api_version, "gemini.api_version")?;
        require_non_empty(&gemini.model, "gemini.model")?;

        if gemini.max_attempts == 0 || gemini.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ConfigError::Validation(format!(
                "gemini.max_attempts must be between 1 and {MAX_ATTEMPTS_LIMIT}"
            )));
        }
        if gemini.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gemini.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate sampling parameters.
    fn validate_tuning(&self) -> Result<(), ConfigError> {
        let tuning = &self.gemini.tuning;
        require_range(tuning.temperature, 0.0, 2.0, "gemini.tuning.temperature")?;
        require_range(tuning.top_p, 0.0, 1.0, "gemini.tuning.top_p")?;

        if tuning.top_k == 0 {
            return Err(ConfigError::Validation(
                "gemini.tuning.top_k must be at least 1".to_owned(),
            ));
        }
        if tuning.max_output_tokens == 0 {
            return Err(ConfigError::Validation(
                "gemini.tuning.max_output_tokens must be at least 1".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let gemini = &mut self.gemini;
        gemini.base_url = expand::expand_env(&gemini.base_url, "gemini.base_url")?;
        gemini.model = expand::expand_env(&gemini.model, "gemini.model")?;

        gemini.api_keys = expand::expand_api_keys(&gemini.api_keys, "gemini.api_keys")?;

        Ok(())
    }
}
