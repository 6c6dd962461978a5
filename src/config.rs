//! Configuration for the AI subsystem.

use crate::error::{AiError, Result};

/// Default model for both chat and task parsing.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// Default Anthropic API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
/// API version header value.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";
/// Token budget for conversational replies.
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 1024;
/// Token budget for structured task parsing.
pub const DEFAULT_PARSE_MAX_TOKENS: u32 = 500;
/// Upper bound on model round-trips in a single chat turn.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Settings for the Anthropic backend and the orchestration loop.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key, per user or per deployment.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// API base URL, overridable for tests.
    pub base_url: String,
    /// `anthropic-version` header value.
    pub api_version: String,
    /// Max tokens for chat completions.
    pub chat_max_tokens: u32,
    /// Max tokens for task-parse completions.
    pub parse_max_tokens: u32,
    /// Tool-loop round cap per chat turn.
    pub max_rounds: u32,
}

impl AiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            chat_max_tokens: DEFAULT_CHAT_MAX_TOKENS,
            parse_max_tokens: DEFAULT_PARSE_MAX_TOKENS,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_chat_max_tokens(mut self, max_tokens: u32) -> Self {
        self.chat_max_tokens = max_tokens;
        self
    }

    pub fn with_parse_max_tokens(mut self, max_tokens: u32) -> Self {
        self.parse_max_tokens = max_tokens;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Validate settings before first use.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AiError::ConfigError("api_key must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(AiError::ConfigError("model must not be empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(AiError::ConfigError("base_url must not be empty".into()));
        }
        if self.max_rounds == 0 {
            return Err(AiError::ConfigError(
                "max_rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
