// ABOUTME: Reads every text file in a directory into a filename -> content mapping.
// ABOUTME: Per-file failures degrade to inline error strings; only a bad path fails the whole call.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Rendering of a [`FolderReading::NotADirectory`] result, as surfaced to tool callers.
pub const NOT_A_DIRECTORY: &str = "Provided path is not a directory.";

/// Prefix for the rendering of an unreadable file's content slot.
pub const READ_ERROR_PREFIX: &str = "Error reading file: ";

/// Content slot for a single directory entry: either the file's full UTF-8
/// text, or a description of why it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileContent {
    /// The file decoded cleanly as UTF-8.
    Text(String),
    /// Opening or decoding failed; holds the failure description.
    Unreadable(String),
}

impl FileContent {
    /// Render this slot as the string a tool caller sees: the text itself,
    /// or `"Error reading file: <description>"`.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            FileContent::Text(text) => Cow::Borrowed(text),
            FileContent::Unreadable(reason) => {
                Cow::Owned(format!("{READ_ERROR_PREFIX}{reason}"))
            }
        }
    }

    /// Returns true if this slot records a read failure.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, FileContent::Unreadable(_))
    }
}

/// Result of reading a folder. The failure variant is explicit rather than a
/// sentinel value smuggled through the success type, so callers branch on the
/// enum instead of inspecting result shapes at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderReading {
    /// The supplied path did not refer to an existing directory.
    NotADirectory,
    /// Mapping from base filename to content (or per-file error). Keys are
    /// unique; ordering is not part of the contract, so entries are kept
    /// sorted for deterministic rendering.
    Files(BTreeMap<String, FileContent>),
}

impl FolderReading {
    /// The file mapping, or `None` for the path-failure variant.
    pub fn files(&self) -> Option<&BTreeMap<String, FileContent>> {
        match self {
            FolderReading::NotADirectory => None,
            FolderReading::Files(files) => Some(files),
        }
    }

    /// Render this reading as the string handed to an LLM tool caller:
    /// the path-failure sentinel, or a JSON object of filename -> content.
    pub fn render(&self) -> String {
        match self {
            FolderReading::NotADirectory => NOT_A_DIRECTORY.to_string(),
            FolderReading::Files(files) => {
                let rendered: BTreeMap<&str, Value> = files
                    .iter()
                    .map(|(name, content)| (name.as_str(), json!(content.render())))
                    .collect();
                serde_json::to_string_pretty(&rendered)
                    .unwrap_or_else(|_| "{}".to_string())
            }
        }
    }
}

/// Read all regular files in `folder_path` (non-recursive) as UTF-8 text.
///
/// Entries are filtered by the platform "is a file" test, which traverses
/// symlinks; subdirectories never appear in the result. A file that cannot be
/// opened or decoded is recorded as [`FileContent::Unreadable`] and the read
/// continues with the next entry. The mapping is built fresh on every call
/// and holds no state between calls.
pub fn read_folder(folder_path: &Path) -> FolderReading {
    if !folder_path.is_dir() {
        return FolderReading::NotADirectory;
    }

    let mut files = BTreeMap::new();

    let entries = match fs::read_dir(folder_path) {
        Ok(entries) => entries,
        Err(err) => {
            // Directory passed the existence check but enumeration failed
            // (e.g. permissions, or it vanished mid-call). Nothing to read.
            tracing::warn!(path = %folder_path.display(), error = %err, "failed to enumerate directory");
            return FolderReading::Files(files);
        }
    };

    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let content = match fs::read_to_string(&path) {
            Ok(text) => FileContent::Text(text),
            Err(err) => FileContent::Unreadable(err.to_string()),
        };
        files.insert(name, content);
    }

    FolderReading::Files(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_path_is_not_a_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let reading = read_folder(&missing);

        assert_eq!(reading, FolderReading::NotADirectory);
        assert_eq!(reading.render(), "Provided path is not a directory.");
    }

    #[test]
    fn regular_file_path_is_not_a_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "not a folder").unwrap();

        assert_eq!(read_folder(&file), FolderReading::NotADirectory);
    }

    #[test]
    fn empty_directory_yields_empty_mapping() {
        let dir = tempfile::TempDir::new().unwrap();

        let reading = read_folder(dir.path());

        let files = reading.files().expect("should be the Files variant");
        assert!(files.is_empty());
    }

    #[test]
    fn reads_all_utf8_files_with_exact_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "meeting notes\nline two").unwrap();
        std::fs::write(dir.path().join("todo.md"), "- [ ] ship it").unwrap();

        let reading = read_folder(dir.path());
        let files = reading.files().unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(
            files["notes.txt"],
            FileContent::Text("meeting notes\nline two".to_string())
        );
        assert_eq!(files["todo.md"], FileContent::Text("- [ ] ship it".to_string()));
    }

    #[test]
    fn invalid_utf8_degrades_to_error_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("good.txt"), "fine").unwrap();
        std::fs::write(dir.path().join("binary.dat"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let reading = read_folder(dir.path());
        let files = reading.files().unwrap();

        assert_eq!(files.len(), 2, "bad file must not abort the read");
        assert!(files["binary.dat"].is_unreadable());
        assert!(
            files["binary.dat"].render().starts_with("Error reading file: "),
            "got: {}",
            files["binary.dat"].render()
        );
        assert_eq!(files["good.txt"], FileContent::Text("fine".to_string()));
    }

    #[test]
    fn subdirectories_are_excluded() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("inner.txt"), "hidden").unwrap();
        std::fs::write(dir.path().join("top.txt"), "visible").unwrap();

        let reading = read_folder(dir.path());
        let files = reading.files().unwrap();

        assert_eq!(files.len(), 1);
        assert!(!files.contains_key("nested"));
        assert!(!files.contains_key("inner.txt"), "no recursion into subdirectories");
        assert!(files.contains_key("top.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_file_passes_the_is_file_test() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("real.txt"), "linked content").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let reading = read_folder(dir.path());
        let files = reading.files().unwrap();

        assert_eq!(
            files["link.txt"],
            FileContent::Text("linked content".to_string())
        );
    }

    #[test]
    fn repeated_reads_of_unchanged_directory_are_identical() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        std::fs::write(dir.path().join("b.txt"), "beta").unwrap();

        let first = read_folder(dir.path());
        let second = read_folder(dir.path());

        assert_eq!(first, second);
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn render_produces_json_object_of_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();

        let rendered = read_folder(dir.path()).render();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed["a.txt"], "alpha");
    }
}
