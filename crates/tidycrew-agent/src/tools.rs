// ABOUTME: Tool definitions for LLM function calling, expressed as serde_json::Value structs.
// ABOUTME: Also executes tool calls, dispatching read_folder into tidycrew-core.

use std::path::Path;

use serde_json::{Value, json};

use tidycrew_core::{expand_home, read_folder};

/// Name of the folder-reading tool exposed to every agent.
pub const READ_FOLDER_TOOL: &str = "read_folder";

/// Errors from executing a tool call. These are fed back to the model as tool
/// output rather than aborting the task, so a misbehaving model can recover.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid input for {tool}: {reason}")]
    InvalidInput { tool: String, reason: String },
}

/// Return the complete set of tool definitions that agents can use.
/// These are provider-agnostic JSON schemas; each provider adapter reformats
/// them to match its API's tool specification.
pub fn all_tool_definitions() -> Vec<Value> {
    vec![read_folder_tool()]
}

/// Tool: read all text files in a folder.
fn read_folder_tool() -> Value {
    json!({
        "name": READ_FOLDER_TOOL,
        "description": "Reads all text files from a folder and returns their contents.",
        "parameters": {
            "type": "object",
            "properties": {
                "folder_path": {
                    "type": "string",
                    "description": "Path to the target folder."
                }
            },
            "required": ["folder_path"]
        }
    })
}

/// Execute a tool call by name. The folder path is home-expanded before the
/// read; the reading itself never fails. A bad path comes back as the
/// sentinel string and unreadable files as inline error entries.
pub fn execute(name: &str, input: &Value) -> Result<String, ToolError> {
    match name {
        READ_FOLDER_TOOL => {
            let folder_path = input
                .get("folder_path")
                .and_then(|p| p.as_str())
                .ok_or_else(|| ToolError::InvalidInput {
                    tool: READ_FOLDER_TOOL.to_string(),
                    reason: "missing required string field 'folder_path'".to_string(),
                })?;

            let expanded = expand_home(folder_path);
            Ok(read_folder(Path::new(&expanded)).render())
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
