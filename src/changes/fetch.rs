use futures::future::join_all;
use tracing::{debug, error};

use super::ChangeEntry;
use crate::github::SourceControl;

/// Attach file content at `git_ref` to every entry that wasn't removed.
///
/// Fetches run concurrently and the result keeps the input order. A file
/// whose content can't be retrieved is logged and passed through without
/// content; it never fails the batch.
pub async fn fetch_contents(
    source: &dyn SourceControl,
    entries: Vec<ChangeEntry>,
    owner: &str,
    repo: &str,
    git_ref: &str,
) -> Vec<ChangeEntry> {
    let fetches = entries
        .into_iter()
        .map(|entry| fetch_content(source, entry, owner, repo, git_ref));
    join_all(fetches).await
}

/// Attach content to a single entry; removed entries come back unchanged.
pub async fn fetch_content(
    source: &dyn SourceControl,
    entry: ChangeEntry,
    owner: &str,
    repo: &str,
    git_ref: &str,
) -> ChangeEntry {
    if entry.is_removed() {
        return entry;
    }

    match source.file_content(owner, repo, &entry.path, git_ref).await {
        Ok(content) => {
            debug!(path = %entry.path, bytes = content.len(), "fetched content");
            entry.with_content(content)
        }
        Err(err) => {
            error!(path = %entry.path, error = %err, "error getting file content");
            entry
        }
    }
}
