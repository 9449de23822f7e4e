// ABOUTME: Kickoff inputs for a crew run and placeholder interpolation for prompt templates.
// ABOUTME: Home-relative paths are expanded here, before any agent or tool sees them.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the folder selected for cleanup.
pub const TARGET_PLACEHOLDER: &str = "{target_folder}";

/// Placeholder substituted with the reference folder the standard is derived from.
pub const STANDARD_PLACEHOLDER: &str = "{standard_folder}";

/// The two folder paths a crew run operates on. Both are stored fully
/// expanded; prompts receive them via [`interpolate`]. Passed explicitly into
/// crew construction rather than read from ambient process state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickoffInputs {
    pub target_folder: String,
    pub standard_folder: String,
}

impl KickoffInputs {
    /// Build inputs from user-supplied path strings, expanding a leading `~`
    /// against `$HOME`.
    pub fn new(target_folder: &str, standard_folder: &str) -> Self {
        Self {
            target_folder: expand_home(target_folder),
            standard_folder: expand_home(standard_folder),
        }
    }
}

/// Expand a leading `~` or `~/` against the `HOME` environment variable.
/// Paths without a home prefix, and environments without `HOME`, pass through
/// unchanged.
pub fn expand_home(path: &str) -> String {
    expand_home_with(path, std::env::var("HOME").ok().as_deref())
}

fn expand_home_with(path: &str, home: Option<&str>) -> String {
    let Some(home) = home else {
        return path.to_string();
    };
    if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{}", home.trim_end_matches('/'), rest)
    } else {
        path.to_string()
    }
}

/// Substitute both folder placeholders in a prompt template.
pub fn interpolate(template: &str, inputs: &KickoffInputs) -> String {
    template
        .replace(TARGET_PLACEHOLDER, &inputs.target_folder)
        .replace(STANDARD_PLACEHOLDER, &inputs.standard_folder)
}
