use serde::Serialize;

use crate::changes::{ChangeEntry, ChangeType};

/// One unit of work for the documentation server.
#[derive(Debug, Clone)]
pub struct DocumentationRequest {
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
    /// Set only when the changes come from a pull request
    pub pr_number: Option<u64>,
    pub files: Vec<ChangeEntry>,
}

/// What happened to a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Nothing documentable; the server was not contacted.
    Skipped { reason: String },
    /// The server answered 2xx; carries its response body.
    Accepted { response: serde_json::Value },
    /// Network error or non-2xx status.
    Failed { error: String },
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            DispatchOutcome::Accepted { .. } => write!(f, "accepted"),
            DispatchOutcome::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// JSON body of `POST /api/generate`. Absent optional fields are omitted,
/// and so are line counts of zero.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<u64>,
    pub files: Vec<FilePayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload<'a> {
    pub path: &'a str,
    /// Empty when the content couldn't be fetched or the file was removed
    pub content: &'a str,
    pub change_type: &'a ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<u64>,
}

impl<'a> From<&'a ChangeEntry> for FilePayload<'a> {
    fn from(entry: &'a ChangeEntry) -> Self {
        Self {
            path: &entry.path,
            content: entry.content.as_deref().unwrap_or_default(),
            change_type: &entry.change_type,
            additions: entry.additions.filter(|&n| n > 0),
            deletions: entry.deletions.filter(|&n| n > 0),
            changes: entry.changes.filter(|&n| n > 0),
        }
    }
}
