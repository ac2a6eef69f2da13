use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Must be non-zero.
    pub request_timeout_secs: u64,
    /// Cap on `/chat` request bodies. Base64 screenshots and replayed
    /// history easily pass axum's 2 MiB default.
    pub max_body_bytes: usize,
    /// Send the envelope's `statusCode` as the HTTP status too. Off by
    /// default: clients read the status from the body.
    pub mirror_status_code: bool,
    pub chat: ChatProfile,
    pub generation: GenerationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            request_timeout_secs: 60,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            mirror_status_code: false,
            chat: ChatProfile::default(),
            generation: GenerationSettings::default(),
        }
    }
}

/// What distinguishes one `/chat` flavour from another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatProfile {
    pub system_instruction: Option<String>,
    pub supports_image_parts: bool,
}

impl Default for ChatProfile {
    fn default() -> Self {
        Self { system_instruction: None, supports_image_parts: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // an empty file parses to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be greater than 0".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Defaults apply when no file is given.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Config::default()),
        }
    }

    /// Bare model id, without the `models/` prefix the REST path adds itself.
    pub fn model_id(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn api_key_from<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(&self.api_key_env)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(self.api_key_env.clone()))
    }

    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.api_key_from(|name| std::env::var(name).ok())
    }
}
