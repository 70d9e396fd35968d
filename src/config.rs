//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://192.168.1.4:8080/api/v1/";
pub const DEFAULT_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENAI_MODEL: &str = "gemini-1.5-flash-001";
const PREFS_DIR: &str = "chatbot-client";
const PREFS_FILE: &str = "prefs.json";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },

    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    #[error("could not determine a config directory; set CHATBOT_PREFS_PATH")]
    NoConfigDir,
}

/// Optional HTTP timeouts. `None` keeps the transport default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

/// Settings for the generative text service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub prefs_path: PathBuf,
    pub timeouts: Timeouts,
    /// `None` disables the generative chat path.
    pub genai: Option<GenAiConfig>,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CHATBOT_BASE_URL`: backend API base (default [`DEFAULT_BASE_URL`])
    /// - `CHATBOT_PREFS_PATH`: preference file (default under the user config dir)
    /// - `CHATBOT_REQUEST_TIMEOUT_SECS`, `CHATBOT_CONNECT_TIMEOUT_SECS`
    /// - `GENAI_API_KEY_ENV`: names the env var holding the generative API key
    /// - `GENAI_MODEL`: default [`DEFAULT_GENAI_MODEL`]
    /// - `GENAI_BASE_URL`: default [`DEFAULT_GENAI_BASE_URL`]
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric value does not parse, the key named by
    /// `GENAI_API_KEY_ENV` is unset, or no prefs location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("CHATBOT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let prefs_path = match std::env::var("CHATBOT_PREFS_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_prefs_path()?,
        };
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CHATBOT_REQUEST_TIMEOUT_SECS")?,
            connect_secs: env_parse_u64("CHATBOT_CONNECT_TIMEOUT_SECS")?,
        };
        let genai = genai_from_env()?;

        Ok(Self { base_url, prefs_path, timeouts, genai })
    }
}

fn genai_from_env() -> Result<Option<GenAiConfig>, ConfigError> {
    let Ok(key_var) = std::env::var("GENAI_API_KEY_ENV") else {
        return Ok(None);
    };
    let api_key = std::env::var(&key_var).map_err(|_| ConfigError::MissingApiKey { var: key_var.clone() })?;
    let model = std::env::var("GENAI_MODEL").unwrap_or_else(|_| DEFAULT_GENAI_MODEL.to_string());
    let base_url = std::env::var("GENAI_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_GENAI_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();
    Ok(Some(GenAiConfig { api_key, model, base_url }))
}

fn default_prefs_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join(PREFS_DIR).join(PREFS_FILE))
}

fn env_parse_u64(var: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var: var.to_string(), value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
