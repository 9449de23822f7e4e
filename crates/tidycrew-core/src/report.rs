// ABOUTME: Final output of a crew run, rendered as a deterministic Markdown document.
// ABOUTME: Carries the inputs and model used so a report is self-describing.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inputs::KickoffInputs;

/// The cleanup recommendation produced by the final agent in the pipeline,
/// together with the run's provenance. Nothing in this repository deletes
/// files; this report is the whole output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub target_folder: String,
    pub standard_folder: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub recommendation: String,
}

impl CleanupReport {
    /// Assemble a report for the given run, stamped with the current time.
    pub fn new(inputs: &KickoffInputs, model: &str, recommendation: String) -> Self {
        Self {
            target_folder: inputs.target_folder.clone(),
            standard_folder: inputs.standard_folder.clone(),
            model: model.to_string(),
            generated_at: Utc::now(),
            recommendation,
        }
    }

    /// Render the report as Markdown: header, inputs, then the recommendation
    /// body verbatim.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        writeln!(out, "# Cleanup Recommendations").unwrap();
        writeln!(out).unwrap();
        writeln!(
            out,
            "> Generated at {} by {}",
            self.generated_at.format("%Y-%m-%dT%H:%M:%SZ"),
            self.model
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(out, "## Inputs").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "- Target folder: `{}`", self.target_folder).unwrap();
        writeln!(out, "- Standard folder: `{}`", self.standard_folder).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "## Recommendation").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "{}", self.recommendation).unwrap();

        out
    }
}
