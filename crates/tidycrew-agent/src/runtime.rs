// ABOUTME: Defines the AgentRuntime trait that all LLM provider adapters must implement.
// ABOUTME: Also defines AgentAction (what a reasoning step produces) and AgentError.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::AgentContext;

/// What an agent wants to do after a single reasoning step: invoke a tool and
/// see its output, or deliver the final answer for its task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentAction {
    /// Invoke a tool; the crew executes it and feeds the result back.
    CallTool {
        call_id: String,
        name: String,
        input: Value,
    },

    /// The task is complete; this text is the task's output.
    FinalAnswer(String),
}

/// Errors that can occur during agent execution.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Context too large")]
    ContextTooLarge,
}

/// Trait that all LLM provider adapters must implement. Each provider
/// (OpenAI, Anthropic, ...) translates an AgentContext into API calls and
/// parses responses into AgentActions.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Execute one step of agent reasoning given the current context.
    async fn run_step(&self, context: &AgentContext) -> Result<AgentAction, AgentError>;

    /// Provider name for logging and display (e.g. "openai", "anthropic").
    fn provider_name(&self) -> &str;

    /// Model identifier being used (e.g. "gpt-4o-mini").
    fn model_name(&self) -> &str;
}
