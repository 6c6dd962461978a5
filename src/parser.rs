//! Natural-language task parsing.
//!
//! One completion round-trip turns free text ("call mom tomorrow at 3pm !!")
//! into a [`ParsedTask`]. The model is given the user's project and label
//! names so sigils like `#work` and `@home` resolve against real entities,
//! plus the current datetime in the user's timezone so relative dates land
//! on the right day.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{CompletionBackend, MessagesRequest};
use crate::config::AiConfig;
use crate::datetime::now_in_timezone;
use crate::error::{AiError, Result};
use crate::message::{ChatMessage, ContentBlock};
use crate::priority::Priority;
use crate::prompts::TASK_PARSER_PROMPT;

/// How often a task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Structured task data extracted from natural language.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTask {
    pub content: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub priority: Option<Priority>,
    /// Project name as the model matched it, unresolved.
    pub project: Option<String>,
    /// Label names, unresolved.
    pub labels: Vec<String>,
    pub recurrence: Option<Recurrence>,
}

/// Entity names handed to the model for matching.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub projects: Vec<String>,
    pub labels: Vec<String>,
}

/// Wire shape of the model's JSON answer, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParsed {
    content: Option<String>,
    due_date: Option<String>,
    due_time: Option<String>,
    priority: Option<String>,
    project: Option<String>,
    labels: Option<Vec<String>>,
    recurrence: Option<String>,
}

/// Parse one natural-language task description.
pub async fn parse_task(
    backend: &dyn CompletionBackend,
    config: &AiConfig,
    input: &str,
    context: &ParseContext,
    tz: Tz,
) -> Result<ParsedTask> {
    debug!(input_len = input.len(), "parsing task text");

    let payload = json!({
        "input": input,
        "availableProjects": context.projects,
        "availableLabels": context.labels,
        "currentDate": now_in_timezone(tz),
        "timezone": tz.name(),
    });

    let request = MessagesRequest {
        model: config.model.clone(),
        max_tokens: config.parse_max_tokens,
        system: Some(TASK_PARSER_PROMPT.to_string()),
        messages: vec![ChatMessage::user(payload.to_string())],
        tools: None,
    };

    let response = backend.complete(&request).await?;
    let text = match response.content.first() {
        Some(ContentBlock::Text { text }) => text.as_str(),
        Some(_) => {
            return Err(AiError::ResponseError("unexpected response type".into()));
        }
        None => {
            return Err(AiError::ResponseError("empty response".into()));
        }
    };

    parse_model_output(text)
}

/// Validate and normalize the model's raw text output.
fn parse_model_output(text: &str) -> Result<ParsedTask> {
    let stripped = strip_code_fences(text);
    let raw: RawParsed = serde_json::from_str(stripped)
        .map_err(|e| AiError::ParseError(format!("response was not valid JSON: {e}")))?;

    let content = match raw.content {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            return Err(AiError::ParseError(
                "response missing task content".into(),
            ));
        }
    };

    // Malformed date/time strings degrade to "no due" rather than failing
    // the whole parse.
    let due_date = raw.due_date.as_deref().and_then(|d| {
        let parsed = NaiveDate::parse_from_str(d, "%Y-%m-%d").ok();
        if parsed.is_none() {
            warn!(value = d, "discarding unparseable due date");
        }
        parsed
    });
    let due_time = raw
        .due_time
        .as_deref()
        .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok());

    Ok(ParsedTask {
        content,
        due_date,
        due_time,
        priority: raw.priority.as_deref().map(Priority::normalize),
        project: raw.project,
        labels: raw.labels.unwrap_or_default(),
        recurrence: raw.recurrence.as_deref().and_then(parse_recurrence),
    })
}

fn parse_recurrence(value: &str) -> Option<Recurrence> {
    match value {
        "daily" => Some(Recurrence::Daily),
        "weekly" => Some(Recurrence::Weekly),
        "monthly" => Some(Recurrence::Monthly),
        "yearly" => Some(Recurrence::Yearly),
        _ => None,
    }
}

/// Strip a surrounding ```json ... ``` (or bare ```) fence if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_and_fenced_json_parse_identically() {
        let body = r#"{"content": "Buy milk", "dueDate": "2026-09-01"}"#;
        let fenced = format!("```json\n{body}\n```");
        let bare = parse_model_output(body);
        let from_fence = parse_model_output(&fenced);
        match (bare, from_fence) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            _ => unreachable!("both forms must parse"),
        }
    }

    #[test]
    fn anonymous_fence_is_stripped_too() {
        let fenced = "```\n{\"content\": \"x\"}\n```";
        assert!(parse_model_output(fenced).is_ok());
    }

    #[test]
    fn full_payload_decodes() {
        let body = r#"{
            "content": "Call mom",
            "dueDate": "2026-09-01",
            "dueTime": "15:00",
            "priority": "p1",
            "project": "family",
            "labels": ["phone"],
            "recurrence": "weekly"
        }"#;
        let parsed = match parse_model_output(body) {
            Ok(p) => p,
            Err(_) => unreachable!("full payload must parse"),
        };
        assert_eq!(parsed.content, "Call mom");
        assert_eq!(
            parsed.due_date,
            NaiveDate::from_ymd_opt(2026, 9, 1)
        );
        assert_eq!(parsed.due_time, NaiveTime::from_hms_opt(15, 0, 0));
        assert_eq!(parsed.priority, Some(Priority::P1));
        assert_eq!(parsed.project.as_deref(), Some("family"));
        assert_eq!(parsed.labels, vec!["phone"]);
        assert_eq!(parsed.recurrence, Some(Recurrence::Weekly));
    }

    #[test]
    fn missing_content_is_a_parse_error() {
        for body in [
            r#"{"dueDate": "2026-09-01"}"#,
            r#"{"content": ""}"#,
            r#"{"content": "   "}"#,
        ] {
            match parse_model_output(body) {
                Err(AiError::ParseError(msg)) => {
                    assert!(msg.contains("content"));
                }
                _ => unreachable!("content-less output must fail"),
            }
        }
    }

    #[test]
    fn non_json_is_a_parse_error() {
        match parse_model_output("Sure! Here's your task: buy milk") {
            Err(AiError::ParseError(_)) => {}
            _ => unreachable!("prose output must fail"),
        }
    }

    #[test]
    fn out_of_range_priority_normalizes_to_p4() {
        let body = r#"{"content": "t", "priority": "p9"}"#;
        let parsed = parse_model_output(body).unwrap();
        assert_eq!(parsed.priority, Some(Priority::P4));
    }

    #[test]
    fn bad_date_and_time_degrade_to_none() {
        let body = r#"{"content": "t", "dueDate": "soonish", "dueTime": "late"}"#;
        let parsed = parse_model_output(body).unwrap();
        assert!(parsed.due_date.is_none());
        assert!(parsed.due_time.is_none());
    }

    #[test]
    fn unknown_recurrence_is_dropped() {
        let body = r#"{"content": "t", "recurrence": "fortnightly"}"#;
        let parsed = parse_model_output(body).unwrap();
        assert!(parsed.recurrence.is_none());
    }

    #[tokio::test]
    async fn non_text_first_block_is_a_response_error() {
        use crate::message::{MessagesResponse, StopReason};
        use async_trait::async_trait;

        struct ToolHappyBackend;

        #[async_trait]
        impl CompletionBackend for ToolHappyBackend {
            async fn complete(&self, _request: &MessagesRequest) -> Result<MessagesResponse> {
                Ok(MessagesResponse {
                    content: vec![ContentBlock::ToolUse {
                        id: "toolu_01".into(),
                        name: "create_task".into(),
                        input: serde_json::json!({}),
                    }],
                    stop_reason: StopReason::ToolUse,
                })
            }
        }

        let config = AiConfig::new("sk-test");
        let tz: Tz = "UTC".parse().unwrap();
        let result = parse_task(
            &ToolHappyBackend,
            &config,
            "buy milk",
            &ParseContext::default(),
            tz,
        )
        .await;
        match result {
            Err(AiError::ResponseError(msg)) => {
                assert!(msg.contains("unexpected response type"));
            }
            _ => unreachable!("tool_use first block must be a response error"),
        }
    }

    #[tokio::test]
    async fn request_carries_parser_prompt_and_payload() {
        use crate::message::{MessageBody, MessagesResponse, StopReason};
        use async_trait::async_trait;
        use std::sync::Mutex;

        struct CapturingBackend {
            seen: Mutex<Option<MessagesRequest>>,
        }

        #[async_trait]
        impl CompletionBackend for CapturingBackend {
            async fn complete(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
                if let Ok(mut seen) = self.seen.lock() {
                    *seen = Some(request.clone());
                }
                Ok(MessagesResponse {
                    content: vec![ContentBlock::Text {
                        text: r#"{"content": "buy milk"}"#.into(),
                    }],
                    stop_reason: StopReason::EndTurn,
                })
            }
        }

        let backend = CapturingBackend {
            seen: Mutex::new(None),
        };
        let config = AiConfig::new("sk-test");
        let tz: Tz = "America/New_York".parse().unwrap();
        let context = ParseContext {
            projects: vec!["Work".into()],
            labels: vec!["home".into()],
        };
        let parsed = parse_task(&backend, &config, "buy milk", &context, tz)
            .await
            .unwrap();
        assert_eq!(parsed.content, "buy milk");

        let request = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.max_tokens, config.parse_max_tokens);
        assert!(request.tools.is_none());
        assert_eq!(request.system.as_deref(), Some(TASK_PARSER_PROMPT));
        let MessageBody::Text(payload) = &request.messages[0].content else {
            unreachable!("payload must be a text message");
        };
        let payload: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(payload["input"], "buy milk");
        assert_eq!(payload["availableProjects"][0], "Work");
        assert_eq!(payload["availableLabels"][0], "home");
        assert_eq!(payload["timezone"], "America/New_York");
        assert!(payload["currentDate"].as_str().unwrap().contains('T'));
    }
}
