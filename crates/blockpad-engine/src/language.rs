//! The fixed registry of block language tokens.
//!
//! A token is what appears in a block header (`\n∞∞∞python-a\n`). Only
//! tokens listed here are ever stored on a [`Block`](crate::Block); anything
//! else is normalized to the configured default when the document is parsed.

/// One registry entry: the header token and a display label for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    pub token: &'static str,
    pub label: &'static str,
}

const fn lang(token: &'static str, label: &'static str) -> LanguageInfo {
    LanguageInfo { token, label }
}

/// Language used when nothing else is configured or the configured default
/// is not a registry token.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Registry in display order. `text` first so it is the natural default.
pub const LANGUAGES: &[LanguageInfo] = &[
    lang("text", "Plain text"),
    lang("math", "Math"),
    lang("javascript", "JavaScript"),
    lang("typescript", "TypeScript"),
    lang("json", "JSON"),
    lang("python", "Python"),
    lang("html", "HTML"),
    lang("sql", "SQL"),
    lang("markdown", "Markdown"),
    lang("java", "Java"),
    lang("php", "PHP"),
    lang("css", "CSS"),
    lang("xml", "XML"),
    lang("cpp", "C++"),
    lang("c", "C"),
    lang("rust", "Rust"),
    lang("csharp", "C#"),
    lang("ruby", "Ruby"),
    lang("shell", "Shell"),
    lang("yaml", "YAML"),
    lang("toml", "TOML"),
    lang("golang", "Go"),
    lang("kotlin", "Kotlin"),
    lang("swift", "Swift"),
    lang("lua", "Lua"),
    lang("perl", "Perl"),
    lang("powershell", "PowerShell"),
    lang("dart", "Dart"),
    lang("elixir", "Elixir"),
    lang("latex", "LaTeX"),
    lang("dockerfile", "Dockerfile"),
    lang("diff", "Diff"),
];

fn find(token: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES.iter().find(|info| info.token == token)
}

pub fn is_known(token: &str) -> bool {
    find(token).is_some()
}

/// Display label for a registry token.
pub fn label(token: &str) -> Option<&'static str> {
    find(token).map(|info| info.label)
}

/// The registry's own copy of `token`, or `default` when the token is not
/// registered.
pub fn normalize<'a>(token: &str, default: &'a str) -> &'a str {
    match find(token) {
        Some(info) => info.token,
        None => default,
    }
}

/// Map a detector label or common alias onto a registry token.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Returns
/// `None` for labels that have no registry counterpart.
pub fn canonicalize(label: &str) -> Option<&'static str> {
    let lowered = label.trim().to_ascii_lowercase();
    let token = match lowered.as_str() {
        "csharp" | "c#" | "cs" => "csharp",
        "c++" | "cxx" | "cc" | "hpp" => "cpp",
        "bash" | "sh" | "zsh" | "fish" => "shell",
        "pwsh" | "ps1" => "powershell",
        "yml" => "yaml",
        "jsonl" => "json",
        "js" | "jsx" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "md" => "markdown",
        "plaintext" | "plain text" | "plain" | "txt" => "text",
        "py" => "python",
        "rs" => "rust",
        "rb" => "ruby",
        "kt" => "kotlin",
        "go" => "golang",
        "pl" => "perl",
        "ex" | "exs" => "elixir",
        "scss" | "sass" => "css",
        "tex" => "latex",
        "patch" => "diff",
        "docker" => "dockerfile",
        other => return find(other).map(|info| info.token),
    };
    Some(token)
}

/// Resolve a configured default language, falling back to
/// [`FALLBACK_LANGUAGE`] when the configuration names an unknown token.
pub fn resolve_default(configured: &str) -> &'static str {
    match find(configured) {
        Some(info) => info.token,
        None => {
            log::warn!(
                "configured default language {configured:?} is not registered, using {FALLBACK_LANGUAGE:?}"
            );
            FALLBACK_LANGUAGE
        }
    }
}

/// The registry token after `token`, wrapping around. Unknown tokens start
/// the cycle from the beginning.
pub fn next_language(token: &str) -> &'static str {
    let index = LANGUAGES
        .iter()
        .position(|info| info.token == token)
        .map(|i| (i + 1) % LANGUAGES.len())
        .unwrap_or(0);
    LANGUAGES[index].token
}
