// ABOUTME: Anthropic Claude API adapter implementing the AgentRuntime trait.
// ABOUTME: Translates AgentContext into Messages API calls and parses tool_use responses.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::context::{AgentContext, ChatMessage};
use crate::runtime::{AgentAction, AgentError, AgentRuntime};
use crate::tools::all_tool_definitions;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Anthropic Claude runtime adapter. Calls the Messages API with tool
/// definitions and maps tool_use responses back to AgentActions.
pub struct AnthropicRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicRuntime {
    /// Create a new AnthropicRuntime reading configuration from environment variables.
    /// Required: `ANTHROPIC_API_KEY`
    /// Optional: `ANTHROPIC_BASE_URL` (defaults to https://api.anthropic.com)
    /// Optional: `ANTHROPIC_MODEL` (defaults to claude-sonnet-4-5-20250929)
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AgentError::ProviderError("ANTHROPIC_API_KEY not set".to_string()))?;

        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, base_url, model))
    }

    /// Create a new AnthropicRuntime with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the JSON request body for the Anthropic Messages API.
    ///
    /// Tool calls become assistant `tool_use` content blocks and tool results
    /// become user `tool_result` blocks, so the history alternates roles the
    /// way the API requires.
    pub fn build_request_body(&self, context: &AgentContext) -> Value {
        let mut messages = Vec::new();

        for msg in &context.history {
            messages.push(match msg {
                ChatMessage::User { content } => json!({
                    "role": "user",
                    "content": content
                }),
                ChatMessage::Assistant { content } => json!({
                    "role": "assistant",
                    "content": content
                }),
                ChatMessage::ToolCall {
                    call_id,
                    name,
                    input,
                } => json!({
                    "role": "assistant",
                    "content": [{
                        "type": "tool_use",
                        "id": call_id,
                        "name": name,
                        "input": input
                    }]
                }),
                ChatMessage::ToolResult {
                    call_id, output, ..
                } => json!({
                    "role": "user",
                    "content": [{
                        "type": "tool_result",
                        "tool_use_id": call_id,
                        "content": output
                    }]
                }),
            });
        }

        // Ensure there's at least one user message
        if messages.is_empty() {
            messages.push(json!({
                "role": "user",
                "content": "Begin your task."
            }));
        }

        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": context.system_prompt,
            "messages": messages,
            "tools": build_anthropic_tools()
        })
    }

    /// Parse an Anthropic Messages API response into an AgentAction.
    pub fn parse_response(response_body: &Value) -> Result<AgentAction, AgentError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                AgentError::InvalidResponse("missing content array in response".to_string())
            })?;

        // A tool_use block wins over any accompanying text
        for block in content {
            if block.get("type").and_then(|t| t.as_str()) == Some("tool_use") {
                let call_id = block
                    .get("id")
                    .and_then(|i| i.as_str())
                    .unwrap_or("toolu_0")
                    .to_string();
                let name = block
                    .get("name")
                    .and_then(|n| n.as_str())
                    .ok_or_else(|| {
                        AgentError::InvalidResponse("tool_use block missing name".to_string())
                    })?
                    .to_string();
                let input = block.get("input").cloned().unwrap_or_else(|| json!({}));

                return Ok(AgentAction::CallTool {
                    call_id,
                    name,
                    input,
                });
            }
        }

        let text: Vec<&str> = content
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.is_empty() {
            return Err(AgentError::InvalidResponse(
                "no actionable content in response".to_string(),
            ));
        }

        Ok(AgentAction::FinalAnswer(text.join("\n")))
    }
}

/// Convert tool definitions to Anthropic's tool specification format.
fn build_anthropic_tools() -> Vec<Value> {
    all_tool_definitions()
        .into_iter()
        .map(|tool| {
            json!({
                "name": tool.get("name").cloned().unwrap_or(Value::Null),
                "description": tool.get("description").cloned().unwrap_or(Value::Null),
                "input_schema": tool.get("parameters").cloned().unwrap_or(json!({"type": "object"}))
            })
        })
        .collect()
}

#[async_trait]
impl AgentRuntime for AnthropicRuntime {
    async fn run_step(&self, context: &AgentContext) -> Result<AgentAction, AgentError> {
        let body = self.build_request_body(context);
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::ProviderError(format!("HTTP request failed: {e}")))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AgentError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AgentError::ProviderError(
                "Unauthorized: check ANTHROPIC_API_KEY".to_string(),
            ));
        }

        if status.is_server_error() {
            return Err(AgentError::ProviderError(format!("Server error: {status}")));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AgentError::ProviderError(format!(
                "API error {status}: {error_body}"
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(format!("failed to parse JSON: {e}")))?;

        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AgentRole;
    use crate::providers::role_prompt;
    use tidycrew_core::KickoffInputs;

    fn test_context() -> AgentContext {
        let inputs = KickoffInputs {
            target_folder: "/tmp/target".to_string(),
            standard_folder: "/tmp/standard".to_string(),
        };
        AgentContext::new(
            AgentRole::StandardAnalyzer,
            role_prompt(&AgentRole::StandardAnalyzer, &inputs),
        )
    }

    #[test]
    fn anthropic_runtime_creation() {
        let runtime = AnthropicRuntime::new(
            "test-key".to_string(),
            "https://api.anthropic.com".to_string(),
            "claude-sonnet-4-5-20250929".to_string(),
        );

        assert_eq!(runtime.provider_name(), "anthropic");
        assert_eq!(runtime.model_name(), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn anthropic_builds_request_body() {
        let runtime = AnthropicRuntime::new(
            "test-key".to_string(),
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
        );

        let mut ctx = test_context();
        ctx.push_user("Derive the standard profile.");

        let body = runtime.build_request_body(&ctx);

        assert_eq!(body.get("model").and_then(|m| m.as_str()), Some(DEFAULT_MODEL));
        assert!(body.get("system").and_then(|s| s.as_str()).is_some());

        let messages = body.get("messages").and_then(|m| m.as_array()).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");

        let tools = body.get("tools").and_then(|t| t.as_array()).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "read_folder");
        assert!(tools[0].get("input_schema").is_some());
    }

    #[test]
    fn anthropic_serializes_tool_round_trip_messages() {
        let runtime = AnthropicRuntime::new(
            "test-key".to_string(),
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
        );

        let mut ctx = test_context();
        ctx.push_user("Derive the standard profile.");
        ctx.push_tool_call("toolu_1", "read_folder", json!({"folder_path": "/tmp/standard"}));
        ctx.push_tool_result("toolu_1", "read_folder", "{}".to_string());

        let body = runtime.build_request_body(&ctx);
        let messages = body.get("messages").and_then(|m| m.as_array()).unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"][0]["type"], "tool_use");
        assert_eq!(messages[1]["content"][0]["id"], "toolu_1");
        assert_eq!(messages[2]["role"], "user");
        assert_eq!(messages[2]["content"][0]["type"], "tool_result");
        assert_eq!(messages[2]["content"][0]["tool_use_id"], "toolu_1");
    }

    #[test]
    fn anthropic_parses_tool_use_response() {
        let response = json!({
            "id": "msg_01",
            "content": [
                {"type": "text", "text": "Let me read the folder first."},
                {
                    "type": "tool_use",
                    "id": "toolu_abc",
                    "name": "read_folder",
                    "input": {"folder_path": "/tmp/standard"}
                }
            ],
            "stop_reason": "tool_use"
        });

        let action = AnthropicRuntime::parse_response(&response).unwrap();
        match action {
            AgentAction::CallTool {
                call_id,
                name,
                input,
            } => {
                assert_eq!(call_id, "toolu_abc");
                assert_eq!(name, "read_folder");
                assert_eq!(input["folder_path"], "/tmp/standard");
            }
            other => panic!("expected CallTool, got {other:?}"),
        }
    }

    #[test]
    fn anthropic_parses_text_response() {
        let response = json!({
            "id": "msg_02",
            "content": [
                {"type": "text", "text": "An ideal folder contains..."}
            ],
            "stop_reason": "end_turn"
        });

        let action = AnthropicRuntime::parse_response(&response).unwrap();
        match action {
            AgentAction::FinalAnswer(text) => {
                assert!(text.contains("ideal folder"));
            }
            other => panic!("expected FinalAnswer, got {other:?}"),
        }
    }

    #[test]
    fn anthropic_rejects_empty_content() {
        let response = json!({
            "id": "msg_03",
            "content": [],
            "stop_reason": "end_turn"
        });

        let result = AnthropicRuntime::parse_response(&response);
        assert!(result.is_err());
    }

    #[tokio::test]
    #[cfg(feature = "live-test")]
    async fn anthropic_adapter_basic() {
        let runtime = AnthropicRuntime::from_env().expect("ANTHROPIC_API_KEY must be set");

        let mut ctx = test_context();
        ctx.push_user("Reply with a one-sentence greeting.");

        let result = runtime.run_step(&ctx).await;
        assert!(result.is_ok(), "live test failed: {:?}", result.err());
    }
}
