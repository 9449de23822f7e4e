// ABOUTME: Sequential crew executor: three tasks, each run as a think-act loop against one runtime.
// ABOUTME: Prior task outputs are fed into each subsequent task's opening prompt.

use std::sync::Arc;

use tidycrew_core::{CleanupReport, KickoffInputs, interpolate};

use crate::context::{AgentContext, AgentRole};
use crate::providers::role_prompt;
use crate::runtime::{AgentAction, AgentError, AgentRuntime};
use crate::tools;

/// Maximum reasoning steps an agent may take on a single task.
pub const MAX_ITERATIONS: usize = 10;

/// A unit of work assigned to one agent role. The description is a template
/// with folder placeholders, interpolated at kickoff.
#[derive(Debug, Clone)]
pub struct Task {
    pub role: AgentRole,
    pub description: String,
    pub expected_output: String,
}

impl Task {
    pub fn new(
        role: AgentRole,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            role,
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// The built-in cleanup pipeline: summarize the target folder, derive the
/// standard profile, then recommend removals.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task::new(
            AgentRole::Reader,
            "Read through all text files in {target_folder} and summarize every file in there.",
            "A detailed summary of the contents of every file.",
        ),
        Task::new(
            AgentRole::StandardAnalyzer,
            "Read through all text files in {standard_folder} to develop a profile for what a \
             good folder looks like.",
            "A detailed breakdown of what a good folder of text files contains. This should \
             include specific attributes of a good text file that can be used for comparison.",
        ),
        Task::new(
            AgentRole::Recommender,
            "Using the created profile of what a good folder looks like and the summary of what \
             each file contains, create a list of files that should be removed. Provide a few \
             sentences of rationale for each file.",
            "A list of files that should be removed with a few sentences of rationale for each \
             file. These files are also categorized based on whether they are useless, may be \
             needed for specific uses, and/or need further human review.",
        ),
    ]
}

/// The final text an agent produced for one task.
#[derive(Debug, Clone)]
pub struct TaskOutput {
    pub role: AgentRole,
    pub agent_id: String,
    pub raw: String,
}

/// Errors from running the crew pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    #[error("agent {role} failed: {source}")]
    Agent {
        role: AgentRole,
        #[source]
        source: AgentError,
    },

    #[error("agent {role} exceeded the iteration limit")]
    MaxIterations { role: AgentRole },

    #[error("crew has no tasks to run")]
    NoTasks,
}

/// A set of tasks executed strictly in order against a single runtime.
/// Each task gets a fresh agent context; the only state that flows between
/// tasks is their output text.
pub struct Crew {
    runtime: Arc<dyn AgentRuntime>,
    tasks: Vec<Task>,
}

impl Crew {
    /// Create a crew running the given tasks against the given runtime.
    pub fn new(runtime: Arc<dyn AgentRuntime>, tasks: Vec<Task>) -> Self {
        Self { runtime, tasks }
    }

    /// Create a crew with the built-in cleanup pipeline.
    pub fn with_default_tasks(runtime: Arc<dyn AgentRuntime>) -> Self {
        Self::new(runtime, default_tasks())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Run all tasks in order and assemble the final report from the last
    /// task's output. A failure in any task aborts the run.
    pub async fn kickoff(&self, inputs: &KickoffInputs) -> Result<CleanupReport, CrewError> {
        if self.tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }

        tracing::info!(
            provider = self.runtime.provider_name(),
            model = self.runtime.model_name(),
            target = %inputs.target_folder,
            standard = %inputs.standard_folder,
            "crew kickoff"
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let output = self.run_task(task, inputs, &outputs).await?;
            outputs.push(output);
        }

        let recommendation = outputs.pop().map(|o| o.raw).unwrap_or_default();
        Ok(CleanupReport::new(
            inputs,
            self.runtime.model_name(),
            recommendation,
        ))
    }

    /// Run a single task as a think-act loop: each step either calls a tool
    /// (whose output is appended to the history) or delivers the final answer.
    async fn run_task(
        &self,
        task: &Task,
        inputs: &KickoffInputs,
        prior: &[TaskOutput],
    ) -> Result<TaskOutput, CrewError> {
        let mut ctx = AgentContext::new(task.role, role_prompt(&task.role, inputs));
        ctx.push_user(build_task_prompt(task, inputs, prior));

        tracing::info!(agent = %ctx.agent_id, role = %task.role, "task started");

        for _ in 0..MAX_ITERATIONS {
            let action = self
                .runtime
                .run_step(&ctx)
                .await
                .map_err(|source| CrewError::Agent {
                    role: task.role,
                    source,
                })?;

            match action {
                AgentAction::CallTool {
                    call_id,
                    name,
                    input,
                } => {
                    // Tool failures go back to the model as data so it can
                    // correct itself on the next step.
                    let output = match tools::execute(&name, &input) {
                        Ok(output) => output,
                        Err(err) => {
                            tracing::warn!(
                                agent = %ctx.agent_id,
                                tool = %name,
                                error = %err,
                                "tool call failed"
                            );
                            err.to_string()
                        }
                    };
                    tracing::debug!(
                        agent = %ctx.agent_id,
                        tool = %name,
                        output_len = output.len(),
                        "tool executed"
                    );
                    ctx.push_tool_call(&call_id, &name, input);
                    ctx.push_tool_result(&call_id, &name, output);
                }
                AgentAction::FinalAnswer(raw) => {
                    tracing::info!(agent = %ctx.agent_id, role = %task.role, "task finished");
                    return Ok(TaskOutput {
                        role: task.role,
                        agent_id: ctx.agent_id,
                        raw,
                    });
                }
            }
        }

        Err(CrewError::MaxIterations { role: task.role })
    }
}

/// Build the opening user message for a task: the interpolated description,
/// the expected output, and the accumulated outputs of all previous tasks.
fn build_task_prompt(task: &Task, inputs: &KickoffInputs, prior: &[TaskOutput]) -> String {
    let mut parts = vec![
        interpolate(task.description.trim(), inputs),
        format!("Expected output: {}", task.expected_output.trim()),
    ];

    if !prior.is_empty() {
        let sections: Vec<String> = prior
            .iter()
            .map(|output| format!("[{}]\n{}", output.role, output.raw))
            .collect();
        parts.push(format!(
            "Context from previous tasks:\n\n{}",
            sections.join("\n\n")
        ));
    }

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ChatMessage;
    use crate::testing::StubRuntime;
    use serde_json::json;

    fn test_inputs() -> KickoffInputs {
        KickoffInputs {
            target_folder: "/tmp/target".to_string(),
            standard_folder: "/tmp/standard".to_string(),
        }
    }

    #[test]
    fn default_tasks_cover_the_pipeline() {
        let tasks = default_tasks();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].role, AgentRole::Reader);
        assert_eq!(tasks[1].role, AgentRole::StandardAnalyzer);
        assert_eq!(tasks[2].role, AgentRole::Recommender);
        assert!(tasks[0].description.contains("{target_folder}"));
        assert!(tasks[1].description.contains("{standard_folder}"));
    }

    #[tokio::test]
    async fn kickoff_feeds_prior_outputs_forward() {
        let stub = Arc::new(StubRuntime::new(vec![
            AgentAction::FinalAnswer("summary of every file".to_string()),
            AgentAction::FinalAnswer("profile of an ideal folder".to_string()),
            AgentAction::FinalAnswer("delete scratch.txt".to_string()),
        ]));
        let crew = Crew::with_default_tasks(Arc::clone(&stub) as Arc<dyn AgentRuntime>);

        let report = crew.kickoff(&test_inputs()).await.unwrap();

        assert_eq!(report.recommendation, "delete scratch.txt");
        assert_eq!(report.model, "stub-model");
        assert_eq!(report.target_folder, "/tmp/target");

        let seen = stub.seen_contexts();
        assert_eq!(seen.len(), 3);

        // The recommender's opening prompt carries both earlier outputs.
        let ChatMessage::User { content } = &seen[2].history[0] else {
            panic!("first message should be the task prompt");
        };
        assert!(content.contains("summary of every file"));
        assert!(content.contains("profile of an ideal folder"));
        assert!(content.contains("[reader]"));
        assert!(content.contains("[standard_analyzer]"));
    }

    #[tokio::test]
    async fn kickoff_interpolates_task_descriptions() {
        let stub = Arc::new(StubRuntime::done());
        let crew = Crew::with_default_tasks(Arc::clone(&stub) as Arc<dyn AgentRuntime>);

        crew.kickoff(&test_inputs()).await.unwrap();

        let seen = stub.seen_contexts();
        let ChatMessage::User { content } = &seen[0].history[0] else {
            panic!("first message should be the task prompt");
        };
        assert!(content.contains("/tmp/target"));
        assert!(!content.contains("{target_folder}"));
    }

    #[tokio::test]
    async fn tool_calls_round_trip_through_the_history() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("keep.txt"), "quarterly results").unwrap();

        let stub = Arc::new(StubRuntime::new(vec![
            AgentAction::CallTool {
                call_id: "call_1".to_string(),
                name: "read_folder".to_string(),
                input: json!({"folder_path": dir.path().to_str().unwrap()}),
            },
            AgentAction::FinalAnswer("keep.txt holds quarterly results".to_string()),
        ]));
        let crew = Crew::new(
            Arc::clone(&stub) as Arc<dyn AgentRuntime>,
            vec![Task::new(
                AgentRole::Reader,
                "Summarize {target_folder}.",
                "A summary.",
            )],
        );

        let report = crew.kickoff(&test_inputs()).await.unwrap();
        assert!(report.recommendation.contains("quarterly results"));

        // The second step saw the tool call and its result in the history.
        let seen = stub.seen_contexts();
        assert_eq!(seen.len(), 2);
        let history = &seen[1].history;
        assert!(matches!(&history[1], ChatMessage::ToolCall { name, .. } if name == "read_folder"));
        let ChatMessage::ToolResult { output, .. } = &history[2] else {
            panic!("third message should be the tool result");
        };
        assert!(output.contains("quarterly results"));
    }

    #[tokio::test]
    async fn unknown_tool_is_fed_back_as_data() {
        let stub = Arc::new(StubRuntime::new(vec![
            AgentAction::CallTool {
                call_id: "call_1".to_string(),
                name: "delete_folder".to_string(),
                input: json!({}),
            },
            AgentAction::FinalAnswer("recovered".to_string()),
        ]));
        let crew = Crew::new(
            Arc::clone(&stub) as Arc<dyn AgentRuntime>,
            vec![Task::new(AgentRole::Reader, "Work.", "Output.")],
        );

        let report = crew.kickoff(&test_inputs()).await.unwrap();
        assert_eq!(report.recommendation, "recovered");

        let seen = stub.seen_contexts();
        let ChatMessage::ToolResult { output, .. } = &seen[1].history[2] else {
            panic!("third message should be the tool result");
        };
        assert!(output.contains("unknown tool"));
    }

    #[tokio::test]
    async fn runaway_agent_hits_iteration_limit() {
        let script: Vec<AgentAction> = (0..MAX_ITERATIONS)
            .map(|i| AgentAction::CallTool {
                call_id: format!("call_{i}"),
                name: "read_folder".to_string(),
                input: json!({"folder_path": "/tmp/nope"}),
            })
            .collect();
        let crew = Crew::new(
            Arc::new(StubRuntime::new(script)),
            vec![Task::new(AgentRole::Reader, "Work.", "Output.")],
        );

        let err = crew.kickoff(&test_inputs()).await.unwrap_err();
        assert!(matches!(err, CrewError::MaxIterations { role } if role == AgentRole::Reader));
    }

    #[tokio::test]
    async fn empty_crew_is_an_error() {
        let crew = Crew::new(Arc::new(StubRuntime::done()), Vec::new());
        let err = crew.kickoff(&test_inputs()).await.unwrap_err();
        assert!(matches!(err, CrewError::NoTasks));
    }

    #[test]
    fn task_prompt_without_prior_outputs_has_no_context_section() {
        let task = Task::new(AgentRole::Reader, "Summarize {target_folder}.", "A summary.");
        let prompt = build_task_prompt(&task, &test_inputs(), &[]);

        assert!(prompt.contains("Summarize /tmp/target."));
        assert!(prompt.contains("Expected output: A summary."));
        assert!(!prompt.contains("Context from previous tasks"));
    }
}
