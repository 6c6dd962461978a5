//! Multi-round tool-use conversation loop.
//!
//! One `chat` call may involve several model round-trips: the model asks
//! for tools, we run them all, feed the results back, and repeat until it
//! answers in plain text or the round cap trips. Rounds are strictly
//! sequential; the calls *within* a round run concurrently.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::chat::context::ChatContext;
use crate::client::{CompletionBackend, MessagesRequest};
use crate::config::AiConfig;
use crate::datetime::{parse_timezone, today_in_timezone};
use crate::error::{AiError, Result};
use crate::message::{ChatMessage, ContentBlock, StopReason};
use crate::prompts::CHAT_SYSTEM_PROMPT;
use crate::tools::{ToolExecutor, ToolResult, all_tools};

/// One executed tool call, recorded for the caller's audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct ChatAction {
    pub tool: String,
    pub input: Value,
    pub result: ToolResult,
}

/// Final answer plus everything that was done along the way.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub response: String,
    pub actions: Vec<ChatAction>,
}

/// Drives the model/tool conversation loop for chat turns.
pub struct ChatOrchestrator {
    backend: Arc<dyn CompletionBackend>,
    executor: ToolExecutor,
    config: AiConfig,
}

impl ChatOrchestrator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        executor: ToolExecutor,
        config: AiConfig,
    ) -> Self {
        Self {
            backend,
            executor,
            config,
        }
    }

    /// Run one chat turn.
    ///
    /// `history` is carried verbatim; this function appends the new user
    /// message and, per tool round, the assistant's content followed by a
    /// single user message of tool results. It never reorders or drops
    /// earlier messages.
    pub async fn chat(
        &self,
        context: &ChatContext,
        message: &str,
        history: &[ChatMessage],
        timezone: &str,
    ) -> Result<ChatOutcome> {
        let tz = parse_timezone(timezone)?;
        let today = today_in_timezone(tz);
        let system = format!(
            "{}\n\n{}",
            CHAT_SYSTEM_PROMPT,
            context.grounding_block(today, timezone)
        );

        let mut messages: Vec<ChatMessage> = history.to_vec();
        messages.push(ChatMessage::user(message));

        let mut actions: Vec<ChatAction> = Vec::new();
        let mut response = self.complete(&system, &messages).await?;
        let mut rounds = 0u32;

        while response.stop_reason == StopReason::ToolUse {
            rounds += 1;
            if rounds > self.config.max_rounds {
                warn!(rounds, "tool loop exceeded round cap");
                return Err(AiError::ToolLoopExceeded(self.config.max_rounds));
            }

            let calls: Vec<(String, String, Value)> = response
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::ToolUse { id, name, input } => {
                        Some((id.clone(), name.clone(), input.clone()))
                    }
                    _ => None,
                })
                .collect();
            debug!(round = rounds, calls = calls.len(), "executing tool round");

            // All calls in the round run concurrently; results come back
            // in block order.
            let results = join_all(calls.iter().map(|(_, name, input)| {
                self.executor.execute(context.user_id, name, input, today)
            }))
            .await;

            let mut result_blocks = Vec::with_capacity(results.len());
            for ((id, name, input), result) in calls.into_iter().zip(results) {
                info!(tool = %name, success = result.success, "tool call finished");
                result_blocks.push(ContentBlock::ToolResult {
                    tool_use_id: id,
                    content: encode_result(&result),
                });
                actions.push(ChatAction {
                    tool: name,
                    input,
                    result,
                });
            }

            messages.push(ChatMessage::assistant_blocks(response.content));
            messages.push(ChatMessage::tool_results(result_blocks));
            response = self.complete(&system, &messages).await?;
        }

        let text = response
            .content
            .iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "I completed your request.".to_string());

        info!(rounds, actions = actions.len(), "chat turn complete");
        Ok(ChatOutcome {
            response: text,
            actions,
        })
    }

    async fn complete(
        &self,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<crate::message::MessagesResponse> {
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.chat_max_tokens,
            system: Some(system.to_string()),
            messages: messages.to_vec(),
            tools: Some(all_tools()),
        };
        self.backend.complete(&request).await
    }
}

fn encode_result(result: &ToolResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|_| {
        r#"{"success":false,"error":"result serialization failed"}"#.to_string()
    })
}
