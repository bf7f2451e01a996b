// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

const SAMPLES: &[(&str, &str)] = &[
    ("markdown-a", "# Notes\n\n- [ ] call back\n- [x] ship it\n"),
    ("python", "def greet(name):\n    print(f\"hello {name}\")\n"),
    ("json-a", "{\n  \"name\": \"blockpad\",\n  \"tags\": [\"∞\", \"é\"]\n}"),
    ("text", "Plain prose with a stray ∞ and some unicode: 日本語.\n"),
    ("sql", "SELECT id, name FROM users WHERE id = 1;\n"),
];

/// A scratch document with `blocks` blocks cycling through a few languages.
#[allow(dead_code)]
pub fn generate_scratch_document(blocks: usize) -> String {
    let mut content = String::new();
    for i in 0..blocks {
        let (token, body) = SAMPLES[i % SAMPLES.len()];
        content.push_str("\n∞∞∞");
        content.push_str(token);
        content.push('\n');
        content.push_str(body);
    }
    content
}

/// One large block, `lines` lines long.
#[allow(dead_code)]
pub fn generate_long_block(lines: usize) -> String {
    let mut content = String::from("\n∞∞∞text-a\n");
    for i in 0..lines {
        content.push_str(&format!("line {i} with a little text in it\n"));
    }
    content
}
