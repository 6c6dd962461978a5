//! Anthropic Messages API client.
//!
//! [`CompletionBackend`] is the seam the orchestrator and parser talk to;
//! [`AnthropicBackend`] is the HTTP implementation. [`ClientCache`] shares
//! backends between requests that carry the same API key, with an explicit
//! capacity bound.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::AiConfig;
use crate::error::{AiError, Result};
use crate::message::{ChatMessage, MessagesResponse};

/// Request timeout for completion calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A tool advertised to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A complete (non-streaming) Messages API request.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Backend capable of producing a model completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &MessagesRequest) -> Result<MessagesResponse>;
}

/// HTTP backend for the Anthropic Messages API.
pub struct AnthropicBackend {
    config: AiConfig,
    http: reqwest::Client,
}

impl AnthropicBackend {
    pub fn new(config: AiConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::ConfigError(format!("http client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        debug!(model = %request.model, messages = request.messages.len(), "sending completion request");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| AiError::RequestError(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "completion request failed");
            return Err(map_http_error(status.as_u16(), &body));
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| AiError::ResponseError(format!("invalid response body: {e}")))
    }
}

/// Map an HTTP error status to the right error variant.
pub fn map_http_error(status: u16, body: &str) -> AiError {
    let detail = if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    };
    match status {
        401 | 403 => AiError::AuthError(detail),
        429 | 400 => AiError::RequestError(detail),
        529 => AiError::ProviderError(format!("overloaded ({detail})")),
        s if s >= 500 => AiError::ProviderError(detail),
        _ => AiError::RequestError(detail),
    }
}

/// Bounded cache of backends keyed by API key.
///
/// Eviction is FIFO on insertion order; a cached backend stays usable by
/// existing holders after eviction since entries are `Arc`s.
pub struct ClientCache {
    capacity: usize,
    inner: Mutex<CacheState>,
    template: AiConfig,
}

struct CacheState {
    entries: HashMap<String, Arc<AnthropicBackend>>,
    order: VecDeque<String>,
}

impl ClientCache {
    /// `template` supplies every setting except the API key, which comes
    /// from each `get` call.
    pub fn new(capacity: usize, template: AiConfig) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            template,
        }
    }

    /// Fetch or build the backend for the given API key.
    pub fn get(&self, api_key: &str) -> Result<Arc<AnthropicBackend>> {
        {
            let state = self
                .inner
                .lock()
                .map_err(|_| AiError::ProviderError("client cache poisoned".into()))?;
            if let Some(backend) = state.entries.get(api_key) {
                return Ok(Arc::clone(backend));
            }
        }

        let mut config = self.template.clone();
        config.api_key = api_key.to_string();
        let backend = Arc::new(AnthropicBackend::new(config)?);

        let mut state = self
            .inner
            .lock()
            .map_err(|_| AiError::ProviderError("client cache poisoned".into()))?;
        if !state.entries.contains_key(api_key) {
            if state.entries.len() >= self.capacity {
                if let Some(oldest) = state.order.pop_front() {
                    state.entries.remove(&oldest);
                }
            }
            state.entries.insert(api_key.to_string(), Arc::clone(&backend));
            state.order.push_back(api_key.to_string());
        }
        Ok(backend)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
