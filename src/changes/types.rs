use serde::{Serialize, Serializer};

/// Normalized classification of how a file changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Added,
    Modified,
    Removed,
    Renamed,
    /// A status GitHub reported that has no normalized form (e.g. `copied`),
    /// kept verbatim.
    Other(String),
}

impl ChangeType {
    /// Normalize a pull request file status.
    pub fn from_status(status: &str) -> Self {
        match status {
            "added" => ChangeType::Added,
            "removed" => ChangeType::Removed,
            "modified" | "changed" => ChangeType::Modified,
            "renamed" => ChangeType::Renamed,
            other => ChangeType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Removed => "removed",
            ChangeType::Renamed => "renamed",
            ChangeType::Other(status) => status,
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChangeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One file touched by a push or pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Repository-relative path (e.g., "src/parser/mod.rs")
    pub path: String,
    pub change_type: ChangeType,
    /// Line counts, only known for pull request files
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub changes: Option<u64>,
    /// File text at the event's ref; never set for removed files
    pub content: Option<String>,
}

impl ChangeEntry {
    pub fn new(path: impl Into<String>, change_type: ChangeType) -> Self {
        Self {
            path: path.into(),
            change_type,
            additions: None,
            deletions: None,
            changes: None,
            content: None,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.change_type == ChangeType::Removed
    }

    pub fn with_content(self, content: String) -> Self {
        Self {
            content: Some(content),
            ..self
        }
    }
}
