// ABOUTME: OpenAI API adapter implementing the AgentRuntime trait.
// ABOUTME: Translates AgentContext into Chat Completions calls with function calling.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::context::{AgentContext, ChatMessage};
use crate::runtime::{AgentAction, AgentError, AgentRuntime};
use crate::tools::all_tool_definitions;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 4096;

/// OpenAI runtime adapter. Calls the Chat Completions API with function
/// definitions and maps tool_calls responses back to AgentActions.
pub struct OpenAIRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIRuntime {
    /// Create a new OpenAIRuntime reading configuration from environment variables.
    /// Required: `OPENAI_API_KEY`
    /// Optional: `OPENAI_BASE_URL` (defaults to https://api.openai.com)
    /// Optional: `OPENAI_MODEL` (defaults to gpt-4o-mini)
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::ProviderError("OPENAI_API_KEY not set".to_string()))?;

        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, base_url, model))
    }

    /// Create a new OpenAIRuntime with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the JSON request body for the OpenAI Chat Completions API.
    pub fn build_request_body(&self, context: &AgentContext) -> Value {
        let mut messages = vec![json!({
            "role": "system",
            "content": context.system_prompt
        })];

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
                    "content": null,
                    "tool_calls": [{
                        "id": call_id,
                        "type": "function",
                        "function": {
                            "name": name,
                            "arguments": input.to_string()
                        }
                    }]
                }),
                ChatMessage::ToolResult {
                    call_id, output, ..
                } => json!({
                    "role": "tool",
                    "tool_call_id": call_id,
                    "content": output
                }),
            });
        }

        // Ensure at least one user message after system
        if messages.len() == 1 {
            messages.push(json!({
                "role": "user",
                "content": "Begin your task."
            }));
        }

        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": messages,
            "tools": build_openai_tools(),
            "tool_choice": "auto"
        })
    }

    /// Parse an OpenAI Chat Completions response into an AgentAction.
    pub fn parse_response(response_body: &Value) -> Result<AgentAction, AgentError> {
        let choices = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                AgentError::InvalidResponse("missing choices array in response".to_string())
            })?;

        let choice = choices
            .first()
            .ok_or_else(|| AgentError::InvalidResponse("empty choices array".to_string()))?;

        let message = choice
            .get("message")
            .ok_or_else(|| AgentError::InvalidResponse("missing message in choice".to_string()))?;

        // Check for tool_calls first
        if let Some(tool_calls) = message.get("tool_calls").and_then(|t| t.as_array())
            && let Some(tool_call) = tool_calls.first()
        {
            return parse_openai_tool_call(tool_call);
        }

        // Fall back to text content
        if let Some(content) = message.get("content").and_then(|c| c.as_str())
            && !content.is_empty()
        {
            return Ok(AgentAction::FinalAnswer(content.to_string()));
        }

        // A bare stop with no content still ends the task
        let finish_reason = choice
            .get("finish_reason")
            .and_then(|f| f.as_str())
            .unwrap_or("");

        if finish_reason == "stop" {
            return Ok(AgentAction::FinalAnswer(String::new()));
        }

        Err(AgentError::InvalidResponse(
            "no actionable content in response".to_string(),
        ))
    }
}

/// Convert tool definitions to OpenAI's function calling format.
fn build_openai_tools() -> Vec<Value> {
    all_tool_definitions()
        .into_iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.get("name").cloned().unwrap_or(Value::Null),
                    "description": tool.get("description").cloned().unwrap_or(Value::Null),
                    "parameters": tool.get("parameters").cloned().unwrap_or(json!({"type": "object"}))
                }
            })
        })
        .collect()
}

/// Parse a single tool_call from the OpenAI response into an AgentAction.
fn parse_openai_tool_call(tool_call: &Value) -> Result<AgentAction, AgentError> {
    let call_id = tool_call
        .get("id")
        .and_then(|i| i.as_str())
        .unwrap_or("call_0")
        .to_string();

    let function = tool_call
        .get("function")
        .ok_or_else(|| AgentError::InvalidResponse("tool_call missing function".to_string()))?;

    let name = function
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| AgentError::InvalidResponse("function missing name".to_string()))?
        .to_string();

    let arguments_str = function
        .get("arguments")
        .and_then(|a| a.as_str())
        .unwrap_or("{}");

    let input: Value = serde_json::from_str(arguments_str).map_err(|e| {
        AgentError::InvalidResponse(format!("failed to parse function arguments: {e}"))
    })?;

    Ok(AgentAction::CallTool {
        call_id,
        name,
        input,
    })
}

#[async_trait]
impl AgentRuntime for OpenAIRuntime {
    async fn run_step(&self, context: &AgentContext) -> Result<AgentAction, AgentError> {
        let body = self.build_request_body(context);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
                "Unauthorized: check OPENAI_API_KEY".to_string(),
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
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
