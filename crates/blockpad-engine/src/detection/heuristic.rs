//! Keyword and shape heuristics for guessing a block's language.

use crate::detection::{Detection, DetectionBackend};

const SAMPLE_MAX_CHARS: usize = 16 * 1024;
const SAMPLE_MAX_LINES: usize = 256;

/// In-process scorer. Cheap enough to run on the editing thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicBackend;

impl DetectionBackend for HeuristicBackend {
    fn detect(&self, content: &str) -> Option<Detection> {
        detect(content)
    }
}

/// Keywords per detector label, each hit counting once.
const KEYWORDS: &[(&str, &[&str])] = &[
    (
        "rust",
        &[
            "fn ", "impl ", "crate::", "let mut ", "pub ", "struct ", "enum ", "match ", "trait ",
            "println!", "-> ", "&self",
        ],
    ),
    (
        "py",
        &[
            "def ", "import ", "class ", "self.", "elif ", "print(", "none", "__init__", "lambda ",
        ],
    ),
    (
        "js",
        &[
            "function ", "const ", "let ", "=> ", "console.", "document.", "export ", "require(",
            "===",
        ],
    ),
    (
        "ts",
        &[
            "interface ", ": string", ": number", ": boolean", "implements ", "readonly ",
            "type ", "as const",
        ],
    ),
    (
        "go",
        &[
            "package ", "func ", "fmt.", "defer ", ":= ", "chan ", "go func", "err != nil",
        ],
    ),
    (
        "java",
        &[
            "public class", "import java.", "system.out", " extends ", "void main", "private ",
            "@override",
        ],
    ),
    (
        "c#",
        &[
            "using system", "namespace ", "console.writeline", "{ get;", "public async task",
            "var ",
        ],
    ),
    (
        "c++",
        &[
            "#include <iostream>", "std::", "cout", "template <", "using namespace std",
            "nullptr",
        ],
    ),
    ("c", &["#include <stdio.h>", "printf(", "malloc(", "int main(", "struct "]),
    ("php", &["<?php", "$this->", "echo ", "function ", "->", "namespace "]),
    ("rb", &["def ", "end\n", "puts ", "require '", "attr_accessor", ".each do", "elsif "]),
    ("kt", &["fun ", "val ", "data class", "companion object", "when (", "println("]),
    ("swift", &["func ", "import foundation", "guard let", "var ", "protocol ", "extension "]),
    ("lua", &["local ", "function ", "end\n", "require(", "elseif ", "pairs("]),
    ("dart", &["void main()", "import 'package:", "final ", "future<", "async {", "widget "]),
    ("ex", &["defmodule ", "defp ", "def ", "|> ", "do\n", "io.puts"]),
    ("ps1", &["write-host", "get-childitem", "$psversiontable", "param(", "-eq "]),
    ("css", &["color:", "margin:", "padding:", "display:", "font-", "px;", "}\n"]),
    ("tex", &["\\begin{", "\\end{", "\\usepackage", "\\section", "\\frac{", "$$"]),
];

/// Best guess for `content`, or `None` when nothing stands out.
pub fn detect(content: &str) -> Option<Detection> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    let sample: String = trimmed.chars().take(SAMPLE_MAX_CHARS).collect();
    let lower = sample.to_ascii_lowercase();
    let lines: Vec<&str> = sample.lines().take(SAMPLE_MAX_LINES).collect();

    if let Some(language) = shebang(&sample) {
        return Some(Detection::new(language, 0.95));
    }
    if looks_like_json(&sample) {
        return Some(Detection::new("json", 0.9));
    }
    if lower.starts_with("<!doctype html") || lower.contains("<html") || lower.contains("<body")
    {
        return Some(Detection::new("html", 0.9));
    }
    if lower.starts_with("<?xml") || (sample.starts_with('<') && lower.contains("</")) {
        return Some(Detection::new("xml", 0.8));
    }
    if lines.iter().any(|l| l.starts_with("diff --git") || l.starts_with("@@ "))
        && lines.iter().any(|l| l.starts_with("+++ ") || l.starts_with("--- "))
    {
        return Some(Detection::new("diff", 0.9));
    }
    if lines.first().is_some_and(|l| l.to_ascii_uppercase().starts_with("FROM "))
        && lines
            .iter()
            .any(|l| l.starts_with("RUN ") || l.starts_with("COPY ") || l.starts_with("CMD "))
    {
        return Some(Detection::new("docker", 0.85));
    }
    if lines.iter().any(|l| looks_like_sql(l)) {
        return Some(Detection::new("sql", 0.85));
    }
    if looks_like_toml(&lines) {
        return Some(Detection::new("toml", 0.8));
    }
    if looks_like_yaml(&lines) {
        return Some(Detection::new("yml", 0.7));
    }

    if let Some(detection) = best_keywords(&lower) {
        return Some(detection);
    }

    if looks_like_markdown(&lines) {
        return Some(Detection::new("md", 0.6));
    }
    None
}

fn best_keywords(lower: &str) -> Option<Detection> {
    let mut best: Option<(&str, usize)> = None;
    for (label, keywords) in KEYWORDS {
        let hits = keywords.iter().filter(|kw| lower.contains(**kw)).count();
        if hits < 2 {
            continue;
        }
        match best {
            Some((_, best_hits)) if best_hits >= hits => {}
            _ => best = Some((label, hits)),
        }
    }

    best.map(|(label, hits)| {
        let confidence = (hits as f32 / (hits + 2) as f32).min(0.9);
        Detection::new(label, confidence)
    })
}

fn shebang(sample: &str) -> Option<&'static str> {
    let line = sample.lines().next()?.strip_prefix("#!")?;
    let mut parts = line.split_whitespace();
    let mut program = parts.next()?.rsplit('/').next()?;
    if program == "env" {
        program = parts.find(|p| !p.starts_with('-'))?;
    }

    let label = match program.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.') {
        "python" | "pypy" => "py",
        "node" | "deno" | "bun" => "js",
        "sh" | "bash" | "zsh" | "dash" | "ksh" | "fish" => "sh",
        "perl" => "perl",
        "ruby" => "rb",
        "php" => "php",
        "lua" => "lua",
        "pwsh" => "pwsh",
        _ => return None,
    };
    Some(label)
}

fn looks_like_json(sample: &str) -> bool {
    let opens = sample.starts_with('{') || sample.starts_with('[');
    let closes = sample.ends_with('}') || sample.ends_with(']');
    opens && closes && sample.contains('"') && (sample.contains(':') || sample.starts_with('['))
}

fn looks_like_sql(line: &str) -> bool {
    let lower = line.trim().to_ascii_lowercase();
    let select = lower
        .strip_prefix("select ")
        .is_some_and(|rest| rest.contains(" from "));
    select
        || (lower.starts_with("insert into ") && lower.contains("values"))
        || (lower.starts_with("update ") && lower.contains(" set "))
        || lower.starts_with("delete from ")
        || lower.starts_with("create table ")
        || lower.starts_with("alter table ")
}

fn looks_like_toml(lines: &[&str]) -> bool {
    let has_table = lines.iter().any(|l| {
        let t = l.trim();
        t.starts_with('[') && t.ends_with(']') && t.len() > 2 && !t.contains(',')
    });
    let assignments = lines
        .iter()
        .filter(|l| {
            let t = l.trim();
            !t.starts_with('#') && t.contains(" = ") && !t.contains("==") && !t.ends_with(';')
        })
        .count();
    has_table && assignments >= 1
}

fn looks_like_yaml(lines: &[&str]) -> bool {
    let meaningful: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#') && *l != "---")
        .collect();
    if meaningful.len() < 2 {
        return false;
    }
    let pairs = meaningful
        .iter()
        .filter(|l| {
            if l.ends_with(';') || l.contains('{') || l.contains('(') {
                return false;
            }
            l.starts_with("- ")
                || l.ends_with(':')
                || l.split_once(": ").is_some_and(|(key, _)| {
                    !key.is_empty() && !key.contains(char::is_whitespace)
                })
        })
        .count();
    pairs * 2 > meaningful.len() && pairs >= 2
}

fn looks_like_markdown(lines: &[&str]) -> bool {
    let hits = lines
        .iter()
        .filter(|l| {
            let t = l.trim_start();
            t.starts_with("# ")
                || t.starts_with("## ")
                || t.starts_with("```")
                || t.starts_with("- [ ] ")
                || t.starts_with("- [x] ")
                || t.starts_with("> ")
                || (t.starts_with('[') && t.contains("]("))
        })
        .count();
    hits >= 2
}
