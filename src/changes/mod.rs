pub mod fetch;
pub mod types;

pub use fetch::fetch_contents;
pub use types::{ChangeEntry, ChangeType};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::github::{CommitRecord, PrFileStatus};

/// Collect the files touched by a push.
///
/// Every path in each commit's added/modified/removed lists yields one
/// entry. Entries are unique by `(path, change_type)`, so a file modified by
/// several commits appears once, while a file added and later modified in
/// the same push appears once per change type. Entries are ordered by their
/// latest mention, which lets [`collapse_by_path`] pick each path's final state.
pub fn collect_push_changes(commits: &[CommitRecord]) -> Vec<ChangeEntry> {
    let mut seen: IndexSet<(String, ChangeType)> = IndexSet::new();

    for commit in commits {
        debug!(
            commit = %commit.id,
            message = %commit.message,
            added = commit.added.len(),
            modified = commit.modified.len(),
            removed = commit.removed.len(),
            "processing commit"
        );

        let lists = [
            (&commit.added, ChangeType::Added),
            (&commit.modified, ChangeType::Modified),
            (&commit.removed, ChangeType::Removed),
        ];
        for (paths, change_type) in lists {
            for path in paths {
                let key = (path.clone(), change_type.clone());
                seen.shift_remove(&key);
                seen.insert(key);
            }
        }
    }

    seen.into_iter()
        .map(|(path, change_type)| ChangeEntry::new(path, change_type))
        .collect()
}

/// Keep one entry per path: the last one wins, at the position where the
/// path first appeared.
pub fn collapse_by_path(entries: Vec<ChangeEntry>) -> Vec<ChangeEntry> {
    let mut latest: IndexMap<String, ChangeEntry> = IndexMap::with_capacity(entries.len());
    for entry in entries {
        latest.insert(entry.path.clone(), entry);
    }
    latest.into_values().collect()
}

/// Normalize the file list of a pull request, keeping GitHub's order.
pub fn collect_pr_changes(files: &[PrFileStatus]) -> Vec<ChangeEntry> {
    files
        .iter()
        .map(|file| ChangeEntry {
            additions: Some(file.additions),
            deletions: Some(file.deletions),
            changes: Some(file.changes),
            ..ChangeEntry::new(file.filename.clone(), ChangeType::from_status(&file.status))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(id: &str, added: &[&str], modified: &[&str], removed: &[&str]) -> CommitRecord {
        let owned = |paths: &[&str]| -> Vec<String> { paths.iter().map(|p| p.to_string()).collect() };
        CommitRecord {
            id: id.to_string(),
            message: format!("commit {id}"),
            added: owned(added),
            modified: owned(modified),
            removed: owned(removed),
        }
    }

    fn pr_file(filename: &str, status: &str) -> PrFileStatus {
        PrFileStatus {
            filename: filename.to_string(),
            status: status.to_string(),
            additions: 3,
            deletions: 1,
            changes: 4,
        }
    }

    #[test]
    fn test_push_dedups_identical_changes() {
        let commits = vec![
            commit("1", &["a.js"], &["b.js"], &[]),
            commit("2", &[], &["b.js"], &["c.js"]),
        ];
        let changes = collect_push_changes(&commits);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0], ChangeEntry::new("a.js", ChangeType::Added));
        assert_eq!(changes[1], ChangeEntry::new("b.js", ChangeType::Modified));
        assert_eq!(changes[2], ChangeEntry::new("c.js", ChangeType::Removed));
    }

    #[test]
    fn test_push_keeps_distinct_change_types_for_same_path() {
        let commits = vec![
            commit("1", &["src/new.rs"], &[], &[]),
            commit("2", &[], &["src/new.rs"], &[]),
        ];
        let changes = collect_push_changes(&commits);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.path == "src/new.rs"));
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert_eq!(changes[1].change_type, ChangeType::Modified);
    }

    #[test]
    fn test_push_orders_by_latest_mention() {
        let commits = vec![
            commit("1", &["tmp.rs"], &[], &[]),
            commit("2", &[], &[], &["tmp.rs"]),
            commit("3", &["tmp.rs"], &[], &[]),
        ];
        let changes = collect_push_changes(&commits);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].change_type, ChangeType::Removed);
        assert_eq!(changes[1].change_type, ChangeType::Added);
    }

    #[test]
    fn test_collapse_keeps_latest_state_per_path() {
        let commits = vec![
            commit("1", &["src/a.js", "src/tmp.js"], &[], &[]),
            commit("2", &[], &["src/a.js"], &["src/tmp.js"]),
        ];
        let changes = collapse_by_path(collect_push_changes(&commits));
        assert_eq!(
            changes,
            vec![
                ChangeEntry::new("src/a.js", ChangeType::Modified),
                ChangeEntry::new("src/tmp.js", ChangeType::Removed),
            ]
        );
    }

    #[test]
    fn test_collapse_after_readd_keeps_file() {
        let commits = vec![
            commit("1", &["tmp.rs"], &[], &[]),
            commit("2", &[], &[], &["tmp.rs"]),
            commit("3", &["tmp.rs"], &[], &[]),
        ];
        let changes = collapse_by_path(collect_push_changes(&commits));
        assert_eq!(changes, vec![ChangeEntry::new("tmp.rs", ChangeType::Added)]);
    }

    #[test]
    fn test_push_without_files_is_empty() {
        assert!(collect_push_changes(&[]).is_empty());
        assert!(collect_push_changes(&[commit("merge", &[], &[], &[])]).is_empty());
    }

    #[test]
    fn test_push_entries_carry_no_line_counts() {
        let changes = collect_push_changes(&[commit("1", &["a.rs"], &[], &[])]);
        assert!(changes[0].additions.is_none());
        assert!(changes[0].content.is_none());
    }

    #[test]
    fn test_pr_status_normalization() {
        let files = vec![
            pr_file("a.rs", "changed"),
            pr_file("b.rs", "renamed"),
            pr_file("c.rs", "copied"),
        ];
        let changes = collect_pr_changes(&files);
        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert_eq!(changes[1].change_type, ChangeType::Renamed);
        assert_eq!(changes[2].change_type, ChangeType::Other("copied".to_string()));
    }

    #[test]
    fn test_pr_changes_keep_order_and_counts() {
        let files = vec![pr_file("z.rs", "added"), pr_file("a.rs", "removed")];
        let changes = collect_pr_changes(&files);
        assert_eq!(changes[0].path, "z.rs");
        assert_eq!(changes[1].path, "a.rs");
        assert_eq!(changes[0].additions, Some(3));
        assert_eq!(changes[0].deletions, Some(1));
        assert_eq!(changes[0].changes, Some(4));
    }
}
