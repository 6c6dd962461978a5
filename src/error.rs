//! Error types for the AI core.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`AiError::code()`].
//! Codes are part of the public API contract and will not change.

/// Stable error codes for programmatic error handling.
///
/// These codes never change and form part of the public API contract.
/// Use these for distinguishing errors rather than parsing Display output.
pub mod error_codes {
    /// Invalid or missing configuration (API key, timezone, limits).
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Authentication with the model service failed.
    pub const AUTH_FAILED: &str = "AUTH_FAILED";

    /// Request to the model service failed.
    pub const REQUEST_FAILED: &str = "REQUEST_FAILED";

    /// Model service returned a server-side error.
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

    /// Model responded with an unexpected content type.
    pub const RESPONSE_INVALID: &str = "RESPONSE_INVALID";

    /// Model output could not be parsed into structured task data.
    pub const PARSE_FAILED: &str = "PARSE_FAILED";

    /// Tool input failed validation or decoding.
    pub const TOOL_FAILED: &str = "TOOL_FAILED";

    /// The data store reported a failure.
    pub const STORE_FAILED: &str = "STORE_FAILED";

    /// The model kept requesting tools past the round cap.
    pub const TOOL_LOOP_EXCEEDED: &str = "TOOL_LOOP_EXCEEDED";
}

/// Errors produced by the AI core.
///
/// Each variant includes a stable error code accessible via [`AiError::code()`].
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    ConfigError(String),

    /// Authentication failed (invalid/missing API key).
    #[error("[{}] {}", error_codes::AUTH_FAILED, .0)]
    AuthError(String),

    /// Request to the model service failed.
    #[error("[{}] {}", error_codes::REQUEST_FAILED, .0)]
    RequestError(String),

    /// Server-side model service error (5xx, overloaded).
    #[error("[{}] {}", error_codes::PROVIDER_ERROR, .0)]
    ProviderError(String),

    /// The model responded with a content block type we cannot use.
    #[error("[{}] {}", error_codes::RESPONSE_INVALID, .0)]
    ResponseError(String),

    /// The model's output was not the JSON we asked for.
    #[error("[{}] {}", error_codes::PARSE_FAILED, .0)]
    ParseError(String),

    /// Tool input failed schema validation or typed decoding.
    #[error("[{}] {}", error_codes::TOOL_FAILED, .0)]
    ToolError(String),

    /// The data store reported a failure.
    #[error("[{}] {}", error_codes::STORE_FAILED, .0)]
    StoreError(String),

    /// The model requested tools in every round up to the configured cap.
    #[error("[{}] tool loop exceeded {} rounds", error_codes::TOOL_LOOP_EXCEEDED, .0)]
    ToolLoopExceeded(u32),
}

impl AiError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => error_codes::CONFIG_INVALID,
            Self::AuthError(_) => error_codes::AUTH_FAILED,
            Self::RequestError(_) => error_codes::REQUEST_FAILED,
            Self::ProviderError(_) => error_codes::PROVIDER_ERROR,
            Self::ResponseError(_) => error_codes::RESPONSE_INVALID,
            Self::ParseError(_) => error_codes::PARSE_FAILED,
            Self::ToolError(_) => error_codes::TOOL_FAILED,
            Self::StoreError(_) => error_codes::STORE_FAILED,
            Self::ToolLoopExceeded(_) => error_codes::TOOL_LOOP_EXCEEDED,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            Self::ConfigError(m)
            | Self::AuthError(m)
            | Self::RequestError(m)
            | Self::ProviderError(m)
            | Self::ResponseError(m)
            | Self::ParseError(m)
            | Self::ToolError(m)
            | Self::StoreError(m) => m.clone(),
            Self::ToolLoopExceeded(rounds) => format!("tool loop exceeded {rounds} rounds"),
        }
    }

    /// Returns true if this error represents a transient failure that can be retried.
    ///
    /// Transport failures, rate limits, and server errors are retryable.
    /// Configuration, auth, parse, and tool-loop errors need a caller-side
    /// fix rather than a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConfigError(_) | Self::AuthError(_) => false,
            Self::RequestError(_) | Self::ProviderError(_) => true,
            Self::ResponseError(_) | Self::ParseError(_) => false,
            Self::ToolError(_) | Self::StoreError(_) => false,
            Self::ToolLoopExceeded(_) => false,
        }
    }
}

/// Convenience alias for AI core results.
pub type Result<T> = std::result::Result<T, AiError>;
