//! Anthropic backend contract tests.
//!
//! Verify exact HTTP format compliance against a mock server: request
//! shape and headers, response parsing, and error-status mapping.

use serde_json::json;
use taskwise::client::{AnthropicBackend, CompletionBackend, MessagesRequest};
use taskwise::message::{ChatMessage, ContentBlock, StopReason};
use taskwise::tools::all_tools;
use taskwise::{AiConfig, AiError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> AnthropicBackend {
    let config = AiConfig::new("test-anthropic-key").with_base_url(server.uri());
    match AnthropicBackend::new(config) {
        Ok(backend) => backend,
        Err(_) => unreachable!("valid config must build"),
    }
}

fn request(messages: Vec<ChatMessage>) -> MessagesRequest {
    MessagesRequest {
        model: "claude-sonnet-4-20250514".into(),
        max_tokens: 1024,
        system: Some("You are a test".into()),
        messages,
        tools: None,
    }
}

fn text_response_body() -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-20250514",
        "content": [{"type": "text", "text": "Hello there"}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 5}
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn request_includes_required_fields_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-anthropic-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 1024,
            "system": "You are a test",
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response_body()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let result = backend
        .complete(&request(vec![ChatMessage::user("Hello")]))
        .await;
    assert!(result.is_ok(), "request should succeed: {result:?}");
}

#[tokio::test]
async fn tools_serialize_with_schema() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "tools": [{
                "name": "create_task",
                "description": "Create a new task for the user",
                "input_schema": {"type": "object", "required": ["content"]}
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response_body()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut req = request(vec![ChatMessage::user("make a task")]);
    req.tools = Some(all_tools());
    let result = backend.complete(&req).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn block_content_messages_serialize_as_arrays() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "assistant", "content": [
                    {"type": "tool_use", "id": "toolu_1", "name": "list_tasks", "input": {}}
                ]},
                {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "toolu_1", "content": "{\"success\":true}"}
                ]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response_body()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let messages = vec![
        ChatMessage::assistant_blocks(vec![ContentBlock::ToolUse {
            id: "toolu_1".into(),
            name: "list_tasks".into(),
            input: json!({}),
        }]),
        ChatMessage::tool_results(vec![ContentBlock::ToolResult {
            tool_use_id: "toolu_1".into(),
            content: "{\"success\":true}".into(),
        }]),
    ];
    assert!(backend.complete(&request(messages)).await.is_ok());
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn text_response_parses_content_and_stop_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response_body()))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let response = backend
        .complete(&request(vec![ChatMessage::user("hi")]))
        .await
        .unwrap();
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.text(), "Hello there");
}

#[tokio::test]
async fn tool_use_response_parses_blocks() {
    let server = MockServer::start().await;
    let body = json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-20250514",
        "content": [
            {"type": "text", "text": "I'll create that task."},
            {"type": "tool_use", "id": "toolu_01", "name": "create_task",
             "input": {"content": "buy milk", "priority": "p2"}}
        ],
        "stop_reason": "tool_use",
        "usage": {"input_tokens": 30, "output_tokens": 20}
    });
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let response = backend
        .complete(&request(vec![ChatMessage::user("buy milk")]))
        .await
        .unwrap();
    assert_eq!(response.stop_reason, StopReason::ToolUse);
    let uses = response.tool_uses();
    assert_eq!(uses.len(), 1);
    match uses[0] {
        ContentBlock::ToolUse { name, input, .. } => {
            assert_eq!(name, "create_task");
            assert_eq!(input["content"], "buy milk");
        }
        _ => unreachable!("expected tool_use block"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let result = backend.complete(&request(vec![ChatMessage::user("hi")])).await;
    assert!(matches!(result, Err(AiError::ResponseError(_))));
}

// ────────────────────────────────────────────────────────────────────────────
// Error status mapping
// ────────────────────────────────────────────────────────────────────────────

async fn status_error(status: u16) -> AiError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({"error": {"message": "nope"}})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    match backend.complete(&request(vec![ChatMessage::user("hi")])).await {
        Err(e) => e,
        Ok(_) => unreachable!("status {status} must fail"),
    }
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    assert!(matches!(status_error(401).await, AiError::AuthError(_)));
    assert!(matches!(status_error(403).await, AiError::AuthError(_)));
}

#[tokio::test]
async fn rate_limit_and_bad_request_map_to_request_error() {
    let rate_limited = status_error(429).await;
    assert!(matches!(rate_limited, AiError::RequestError(_)));
    assert!(rate_limited.is_retryable());
    assert!(matches!(status_error(400).await, AiError::RequestError(_)));
}

#[tokio::test]
async fn server_errors_map_to_provider_error() {
    assert!(matches!(status_error(500).await, AiError::ProviderError(_)));
    let overloaded = status_error(529).await;
    assert!(matches!(overloaded, AiError::ProviderError(_)));
    assert!(overloaded.is_retryable());
}
