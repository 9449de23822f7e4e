// ABOUTME: Test utilities for tidycrew-agent, including a scripted stub runtime.
// ABOUTME: Used in tests to drive the crew without real API calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::context::AgentContext;
use crate::runtime::{AgentAction, AgentError, AgentRuntime};

/// A stub runtime that plays back a scripted queue of actions.
///
/// Each `run_step` call records the context it was given (so tests can
/// inspect the conversation the crew built) and pops the next scripted
/// action. An exhausted script yields `FinalAnswer("Done.")` so the crew
/// always terminates.
pub struct StubRuntime {
    script: Mutex<VecDeque<AgentAction>>,
    seen: Mutex<Vec<AgentContext>>,
}

impl StubRuntime {
    /// Create a stub that plays back the given actions in order.
    pub fn new(script: Vec<AgentAction>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub with an empty script, so every step finishes immediately.
    pub fn done() -> Self {
        Self::new(Vec::new())
    }

    /// The contexts observed by each `run_step` call, in order.
    pub fn seen_contexts(&self) -> Vec<AgentContext> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for StubRuntime {
    async fn run_step(&self, context: &AgentContext) -> Result<AgentAction, AgentError> {
        self.seen.lock().unwrap().push(context.clone());
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| AgentAction::FinalAnswer("Done.".to_string())))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}
