pub mod rules;

use regex::RegexSet;
use std::sync::LazyLock;

use rules::{DOCUMENTABLE_EXTENSIONS, SKIP_PATTERNS};

static SKIP_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(SKIP_PATTERNS).expect("skip patterns are valid regular expressions")
});

/// Why a path was or wasn't accepted for documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Documentable,
    /// Matched a skip-pattern; carries the first pattern that matched.
    Skipped(&'static str),
    /// Has an extension that isn't in the allow-list.
    UnlistedExtension(String),
    NoExtension,
}

impl Verdict {
    pub fn is_documentable(&self) -> bool {
        matches!(self, Verdict::Documentable)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Documentable => write!(f, "will document"),
            Verdict::Skipped(pattern) => write!(f, "skipped (matches /{pattern}/)"),
            Verdict::UnlistedExtension(ext) => write!(f, "skipped (extension {ext} not documentable)"),
            Verdict::NoExtension => write!(f, "skipped (no extension)"),
        }
    }
}

/// Whether a repository-relative path should be sent for documentation.
///
/// Skip-patterns are checked first and always win; otherwise the path is
/// accepted only when its lowercased extension is allow-listed.
pub fn should_document(path: &str) -> bool {
    explain(path).is_documentable()
}

/// Classify a path, reporting the rule that decided it.
pub fn explain(path: &str) -> Verdict {
    if let Some(index) = SKIP_SET.matches(path).into_iter().next() {
        return Verdict::Skipped(SKIP_PATTERNS[index]);
    }

    match extension(path) {
        None => Verdict::NoExtension,
        Some(ext) if DOCUMENTABLE_EXTENSIONS.contains(&ext.as_str()) => Verdict::Documentable,
        Some(ext) => Verdict::UnlistedExtension(ext),
    }
}

/// Lowercased text from the last `.` of the final path segment, dot included.
fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').map(|dot| name[dot..].to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_files_are_documentable() {
        for path in ["src/app.ts", "lib/server.py", "cmd/main.go", "src/lib.rs", "index.html"] {
            assert!(should_document(path), "{path} should be documented");
        }
    }

    #[test]
    fn test_skip_patterns_beat_extensions() {
        for path in [
            "node_modules/lib/index.js",
            "dist/bundle.js",
            "build/app.js",
            "coverage/lcov.js",
            "src/app.test.ts",
            "src/app.spec.js",
            "types/index.d.ts",
            "vendor/jquery.min.js",
            "test/helpers.js",
            "tests/conftest.py",
            "__tests__/app.js",
            ".github/workflows/ci.yml",
            ".vscode/settings.json",
            ".idea/workspace.json",
            "tsconfig.json",
            "webpack.config.js",
            "jest.setup.js",
            "package-lock.json",
        ] {
            assert!(!should_document(path), "{path} should be skipped");
        }
    }

    #[test]
    fn test_explain_reports_matching_pattern() {
        assert_eq!(explain("node_modules/lib/index.js"), Verdict::Skipped("node_modules"));
        assert_eq!(explain("yarn.lock"), Verdict::Skipped(r"yarn\.lock"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(should_document("Main.JS"));
        assert!(should_document("src/Component.TSX"));
    }

    #[test]
    fn test_no_extension_is_rejected() {
        assert!(!should_document("Makefile"));
        assert_eq!(explain("Makefile"), Verdict::NoExtension);
        assert_eq!(explain("bin/run"), Verdict::NoExtension);
    }

    #[test]
    fn test_unlisted_extension_is_rejected() {
        assert!(!should_document("README.md"));
        assert_eq!(
            explain("docs/guide.TXT"),
            Verdict::UnlistedExtension(".txt".to_string())
        );
    }

    #[test]
    fn test_edge_inputs_do_not_panic() {
        assert!(!should_document(""));
        assert!(!should_document("src/weird."));
        assert!(!should_document("/"));
        assert!(!should_document("."));
    }

    #[test]
    fn test_dot_in_directory_is_not_an_extension() {
        assert!(!should_document("pkg.rs/Makefile"));
        assert!(should_document("v1.2/handler.rs"));
    }

    #[test]
    fn test_bare_dotted_name_uses_whole_suffix() {
        assert!(should_document("scripts/.sh"));
        assert!(!should_document(".bashrc"));
    }

    #[test]
    fn test_anchored_patterns_only_match_at_root() {
        assert!(should_document("src/build/output.js"));
        assert!(should_document("pkg/test/util.go"));
    }

    #[test]
    fn test_filter_is_idempotent() {
        for path in ["src/app.ts", "node_modules/a.js", "Makefile", "Main.JS"] {
            assert_eq!(should_document(path), should_document(path));
        }
    }

    #[test]
    fn test_skip_patterns_compile() {
        assert_eq!(SKIP_SET.len(), SKIP_PATTERNS.len());
    }
}
