//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types on demand.

use serde::{Deserialize, Serialize};
use streamchat_domain::{DomainError, Model, SamplingConfig};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_API_KEY_ENV: &str = "nv_token";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("provider.base_url must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("chat.model cannot be empty")]
    EmptyModelName,

    #[error("provider.api_key_env cannot be empty")]
    EmptyApiKeyEnv,

    #[error(transparent)]
    Sampling(#[from] DomainError),
}

/// Raw provider configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the OpenAI-compatible endpoint
    pub base_url: String,
    /// Environment variable that pre-fills the API key
    pub api_key_env: String,
    /// Overall request timeout in seconds (None = no limit)
    pub timeout_seconds: Option<u64>,
    /// Connect timeout in seconds
    pub connect_timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_seconds: None,
            connect_timeout_seconds: 10,
        }
    }
}

/// Raw chat defaults from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Display name or provider id
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        let sampling = SamplingConfig::default();
        Self {
            model: sampling.model.display_name().to_string(),
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_tokens,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Raw export configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExportConfig {
    /// Directory for exported chat histories (default: current directory)
    pub directory: Option<String>,
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript path; disabled when unset
    pub conversation_log: Option<String>,
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show the spinner and streaming cursor
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub chat: FileChatConfig,
    pub export: FileExportConfig,
    pub logging: FileLoggingConfig,
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.provider.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.provider.connect_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        let base_url = self.provider.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl);
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiKeyEnv);
        }

        if self.chat.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        self.sampling_config()?;
        Ok(())
    }

    /// The chat section as a validated domain [`SamplingConfig`]
    pub fn sampling_config(&self) -> Result<SamplingConfig, DomainError> {
        // Infallible
        let model: Model = self.chat.model.parse().unwrap_or_default();
        SamplingConfig::new(
            model,
            self.chat.temperature,
            self.chat.top_p,
            self.chat.max_tokens,
        )
    }
}
