/// Paths matching any of these are never documented, whatever their extension.
/// Matched case-sensitively against the repository-relative path.
pub const SKIP_PATTERNS: &[&str] = &[
    // dependencies, VCS and OS metadata
    r"node_modules",
    r"\.git",
    r"\.DS_Store",
    r"package-lock\.json",
    r"yarn\.lock",
    r"\.env",
    r"\.log$",
    // build output and generated artifacts
    r"\.map$",
    r"\.min\.(js|css)$",
    r"^dist/",
    r"^build/",
    r"\.next/",
    r"\.cache/",
    // editor and CI metadata
    r"\.vscode/",
    r"\.idea/",
    r"\.github/",
    // tests and coverage
    r"^coverage/",
    r"^__tests__/",
    r"^test/",
    r"^tests/",
    r"\.test\.",
    r"\.spec\.",
    r"\.d\.ts$",
    // tool configuration
    r"\.config\.",
    r"\.eslintrc",
    r"\.prettierrc",
    r"\.babelrc",
    r"tsconfig",
    r"webpack",
    r"rollup",
    r"jest",
    r"karma",
    r"cypress",
    // images and fonts
    r"\.svg$",
    r"\.png$",
    r"\.jpg$",
    r"\.jpeg$",
    r"\.gif$",
    r"\.ico$",
    r"\.woff",
    r"\.ttf",
    r"\.eot",
    r"\.otf",
];

/// Lowercase extensions (dot included) worth sending to the documentation server.
pub const DOCUMENTABLE_EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".py", ".java", ".go", ".rb", ".php", ".cs", ".c", ".cpp",
    ".h", ".swift", ".kt", ".rs", ".html", ".css", ".scss", ".less", ".json", ".yml", ".yaml",
    ".sh", ".bash", ".zsh", ".ps1",
];
