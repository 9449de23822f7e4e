// ABOUTME: Core library for tidycrew, containing the folder reader and shared domain types.
// ABOUTME: This crate defines the data model used by the agent crew and the CLI.

pub mod folder;
pub mod inputs;
pub mod report;

pub use folder::{FileContent, FolderReading, read_folder};
pub use inputs::{KickoffInputs, expand_home, interpolate};
pub use report::CleanupReport;
