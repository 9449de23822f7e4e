// ABOUTME: Configuration resolution for the tidycrew binary.
// ABOUTME: Merges CLI flags with TIDYCREW_* environment variables and validates the provider.

use thiserror::Error;

/// Errors that can occur during configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported provider '{0}': expected 'openai' or 'anthropic'")]
    UnsupportedProvider(String),
}

/// Run configuration resolved before any agent is constructed. Passed
/// explicitly into crew construction rather than left in ambient process
/// state.
#[derive(Debug, Clone)]
pub struct TidycrewConfig {
    pub provider: String,
    pub model: Option<String>,
}

impl TidycrewConfig {
    /// Resolve provider and model from CLI flags, falling back to
    /// environment variables, then defaults.
    ///
    /// Environment variables:
    /// - TIDYCREW_PROVIDER: LLM provider (default: openai)
    /// - TIDYCREW_MODEL: model override (optional; provider default applies)
    pub fn resolve(provider: Option<String>, model: Option<String>) -> Result<Self, ConfigError> {
        let provider = provider
            .or_else(|| non_empty_env("TIDYCREW_PROVIDER"))
            .unwrap_or_else(|| "openai".to_string());

        if !matches!(provider.as_str(), "openai" | "anthropic") {
            return Err(ConfigError::UnsupportedProvider(provider));
        }

        let model = model.or_else(|| non_empty_env("TIDYCREW_MODEL"));

        Ok(Self { provider, model })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
