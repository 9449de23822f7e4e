// ABOUTME: Defines AgentRole, the typed conversation history, and the per-task AgentContext.
// ABOUTME: Provider adapters serialize this history into their own wire formats.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

/// The functional role an agent plays in the cleanup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentRole {
    /// Reads the target folder and summarizes every file in it.
    Reader,
    /// Reads the standard folder and derives the profile of an ideal folder.
    StandardAnalyzer,
    /// Compares the summaries against the profile and recommends deletions.
    Recommender,
}

impl AgentRole {
    /// Return a human-readable label for this role.
    pub fn label(&self) -> &'static str {
        match self {
            AgentRole::Reader => "reader",
            AgentRole::StandardAnalyzer => "standard_analyzer",
            AgentRole::Recommender => "recommender",
        }
    }

    /// The role's goal, as a template with folder placeholders.
    pub fn goal(&self) -> &'static str {
        match self {
            AgentRole::Reader => {
                "Read through every text file within {target_folder} and generate a detailed \
                 summary of the contents of each text file."
            }
            AgentRole::StandardAnalyzer => {
                "Read through all text files within {standard_folder} and generate a detailed \
                 list of criteria that an ideal folder has. The ideal folder contains only good \
                 text files. Analyze the contents of the text files to attribute them based on \
                 criteria like date, content type, etc."
            }
            AgentRole::Recommender => {
                "Create a list of file names that can be deleted as they do not contain \
                 important information. This list must include rationale."
            }
        }
    }

    /// The role's backstory, used verbatim in the system prompt.
    pub fn backstory(&self) -> &'static str {
        match self {
            AgentRole::Reader => {
                "You are an ace at reading through large text files and generating precise, \
                 detailed summaries of them. You work at a very large firm and have decades of \
                 experience doing this."
            }
            AgentRole::StandardAnalyzer => {
                "You are an expert at reading and understanding files and giving them tags based \
                 on their attributes, as you have been in this position for forty years. You look \
                 out for things like the dates of files and whether they contain temporary or \
                 long-term relevant information, to develop a profile of how a company likes to \
                 keep their files."
            }
            AgentRole::Recommender => {
                "You have a keen and experienced eye to compare the ideal profile of what a \
                 company wants their folders to be like with a folder selected for cleanup. \
                 Through your exceptional analysis, you are able to select which files in \
                 {target_folder} a company should delete. You don't delete essential \
                 information, but you are also not conservative, and have unmatched judgement."
            }
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One message in an agent's conversation history. Tool calls and their
/// results are first-class variants so each provider can serialize them into
/// its own function-calling format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatMessage {
    User {
        content: String,
    },
    Assistant {
        content: String,
    },
    ToolCall {
        call_id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        call_id: String,
        name: String,
        output: String,
    },
}

/// Conversation state for a single task execution: the agent's identity, its
/// fully interpolated system prompt, and the message history so far. Built
/// fresh per task; nothing carries over between tasks except what the crew
/// places into the opening user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    pub agent_id: String,
    pub role: AgentRole,
    pub system_prompt: String,
    pub history: Vec<ChatMessage>,
}

impl AgentContext {
    /// Create a fresh context with a unique agent id for the given role.
    pub fn new(role: AgentRole, system_prompt: String) -> Self {
        Self {
            agent_id: format!("{}-{}", role.label(), Ulid::new()),
            role,
            system_prompt,
            history: Vec::new(),
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(ChatMessage::User {
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(ChatMessage::Assistant {
            content: content.into(),
        });
    }

    pub fn push_tool_call(&mut self, call_id: &str, name: &str, input: Value) {
        self.history.push(ChatMessage::ToolCall {
            call_id: call_id.to_string(),
            name: name.to_string(),
            input,
        });
    }

    pub fn push_tool_result(&mut self, call_id: &str, name: &str, output: String) {
        self.history.push(ChatMessage::ToolResult {
            call_id: call_id.to_string(),
            name: name.to_string(),
            output,
        });
    }
}
