// ABOUTME: Provider module aggregating all LLM runtime adapters, plus the runtime factory.
// ABOUTME: Builds the role system prompts shared across providers so agent behavior is consistent.

pub mod anthropic;
pub mod openai;

use std::env;
use std::sync::Arc;

use tidycrew_core::{KickoffInputs, interpolate};

use crate::context::AgentRole;
use crate::runtime::{AgentError, AgentRuntime};

/// Tool usage and workflow guidance appended to all agent system prompts.
fn tool_usage_guide() -> &'static str {
    "\n\nYou have one tool:\n\
     - read_folder: Reads all text files from a folder and returns their contents as a \
     JSON object of filename to content. Pass the folder path exactly as given in your \
     instructions. A path that is not a directory returns the string \
     'Provided path is not a directory.'; a file that could not be read has a value \
     starting with 'Error reading file: '.\n\n\
     Workflow: call read_folder for any folder you need to inspect, then reply with \
     your final answer as plain text. Do not call tools once you have everything you need."
}

/// Build the full system prompt for an agent role, with both folder
/// placeholders interpolated. Shared across providers so all adapters produce
/// consistent agent behavior.
pub fn role_prompt(role: &AgentRole, inputs: &KickoffInputs) -> String {
    let backstory = interpolate(role.backstory(), inputs);
    let goal = interpolate(role.goal(), inputs);
    format!("{backstory}\n\nYour goal: {goal}{}", tool_usage_guide())
}

/// Read an env var and return `Some(value)` only if it is non-empty after trimming.
/// Prevents empty or whitespace-only values from producing invalid URLs or model names.
fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

/// Create a runtime adapter for the given provider name.
///
/// The model is resolved from:
/// 1. The explicit `model` parameter (if Some)
/// 2. A provider-specific environment variable (e.g. OPENAI_MODEL)
/// 3. A sensible default for that provider
pub fn create_runtime(
    provider: &str,
    model: Option<&str>,
) -> Result<Arc<dyn AgentRuntime>, AgentError> {
    match provider {
        "openai" => {
            let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
                AgentError::ProviderError("OPENAI_API_KEY environment variable not set".to_string())
            })?;
            let resolved_model = model
                .map(String::from)
                .or_else(|| non_empty_env("OPENAI_MODEL"))
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
            let base_url = non_empty_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string());
            Ok(Arc::new(openai::OpenAIRuntime::new(
                api_key,
                base_url,
                resolved_model,
            )))
        }
        "anthropic" => {
            let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
                AgentError::ProviderError(
                    "ANTHROPIC_API_KEY environment variable not set".to_string(),
                )
            })?;
            let resolved_model = model
                .map(String::from)
                .or_else(|| non_empty_env("ANTHROPIC_MODEL"))
                .unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string());
            let base_url = non_empty_env("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| anthropic::DEFAULT_BASE_URL.to_string());
            Ok(Arc::new(anthropic::AnthropicRuntime::new(
                api_key,
                base_url,
                resolved_model,
            )))
        }
        unknown => Err(AgentError::ProviderError(format!(
            "unsupported LLM provider: {unknown}"
        ))),
    }
}
