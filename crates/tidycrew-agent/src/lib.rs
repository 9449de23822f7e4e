// ABOUTME: Agent system for tidycrew: roles, runtime adapters, tools, and the crew executor.
// ABOUTME: Orchestrates the read-analyze-recommend pipeline against one LLM provider.

pub mod context;
pub mod crew;
pub mod providers;
pub mod runtime;
pub mod testing;
pub mod tools;

pub use context::{AgentContext, AgentRole, ChatMessage};
pub use crew::{Crew, CrewError, Task, TaskOutput, default_tasks};
pub use providers::{create_runtime, role_prompt};
pub use runtime::{AgentAction, AgentError, AgentRuntime};
pub use tools::all_tool_definitions;
