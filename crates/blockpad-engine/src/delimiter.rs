//! Block header codec.
//!
//! A header line is `"\n∞∞∞" + token + ("-a")? + "\n"`. The leading line
//! break belongs to the header, so a document that starts with a block
//! starts with an empty line.

use std::sync::OnceLock;

use regex::Regex;

use crate::language;
use crate::parsing::BlockLanguage;

/// Prefix every header starts with.
pub const MARKER: &str = "\n∞∞∞";

/// Suffix marking a block whose language is managed by the detector.
pub const AUTO_SUFFIX: &str = "-a";

/// Length of [`MARKER`] in chars.
pub const MARKER_CHARS: usize = 4;

fn header_regex() -> &'static Regex {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADER_REGEX.get_or_init(|| {
        Regex::new(r"^\n∞∞∞([A-Za-z0-9_]+)(-a)?\n$").expect("Invalid header regex")
    })
}

/// Unanchored pattern matching a whole header line anywhere in a text.
pub fn header_line_regex() -> &'static Regex {
    static LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    LINE_REGEX.get_or_init(|| Regex::new(r"\n∞∞∞[^\n]*\n").expect("Invalid header line regex"))
}

/// Pattern matching a header cut off at the end of a text.
pub fn trailing_header_regex() -> &'static Regex {
    static TRAILING_REGEX: OnceLock<Regex> = OnceLock::new();
    TRAILING_REGEX
        .get_or_init(|| Regex::new(r"\n∞∞∞[^\n]*$").expect("Invalid trailing header regex"))
}

pub fn encode(language: &str, auto: bool) -> String {
    let mut header = String::with_capacity(MARKER.len() + language.len() + 3);
    header.push_str(MARKER);
    header.push_str(language);
    if auto {
        header.push_str(AUTO_SUFFIX);
    }
    header.push('\n');
    header
}

/// Decode a header line.
///
/// Returns `None` when `text` is not a header. A well-formed header whose
/// token is not registered decodes to `default_language`, keeping its auto
/// flag.
pub fn decode(text: &str, default_language: &str) -> Option<BlockLanguage> {
    let captures = header_regex().captures(text)?;
    let token = captures.get(1)?.as_str();
    let auto = captures.get(2).is_some();
    Some(BlockLanguage::new(
        language::normalize(token, default_language),
        auto,
    ))
}

/// True for a single marker-prefixed line ending in a line break.
///
/// This is looser than [`decode`]: `"\n∞∞∞foo bar\n"` is shaped like a
/// header even though its token cannot be decoded.
pub fn is_delimiter_shaped(text: &str) -> bool {
    match text.strip_prefix(MARKER) {
        Some(rest) => rest.ends_with('\n') && rest.find('\n') == Some(rest.len() - 1),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LANGUAGES;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn encode_header() {
        assert_eq!(encode("text", false), "\n∞∞∞text\n");
        assert_eq!(encode("python", true), "\n∞∞∞python-a\n");
    }

    #[test]
    fn every_registry_token_roundtrips() {
        for info in LANGUAGES {
            for auto in [true, false] {
                let decoded = decode(&encode(info.token, auto), "text");
                assert_eq!(
                    decoded,
                    Some(BlockLanguage::new(info.token, auto)),
                    "{} auto={auto}",
                    info.token
                );
            }
        }
    }

    #[test]
    fn unknown_token_degrades_to_default() {
        assert_eq!(
            decode("\n∞∞∞klingon-a\n", "markdown"),
            Some(BlockLanguage::new("markdown", true))
        );
    }

    #[rstest]
    #[case("")]
    #[case("\n∞∞∞\n")]
    #[case("∞∞∞text\n")]
    #[case("\n∞∞∞text")]
    #[case("\n∞∞∞foo bar\n")]
    #[case("\n∞∞∞text-b\n")]
    #[case("\n∞∞∞text\n\n")]
    #[case("\n∞∞text\n")]
    fn decode_rejects_non_headers(#[case] input: &str) {
        assert_eq!(decode(input, "text"), None);
    }

    #[rstest]
    #[case("\n∞∞∞text\n", true)]
    #[case("\n∞∞∞foo bar\n", true)]
    #[case("\n∞∞∞\n", true)]
    #[case("\n∞∞∞text", false)]
    #[case("\n∞∞∞text\nmore\n", false)]
    #[case("∞∞∞text\n", false)]
    #[case("", false)]
    fn delimiter_shape(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_delimiter_shaped(input), expected);
    }

    #[test]
    fn line_regexes() {
        let text = "a\n∞∞∞json\nb\n∞∞∞tex";
        assert_eq!(header_line_regex().find_iter(text).count(), 1);
        assert!(trailing_header_regex().is_match(text));
        assert!(!trailing_header_regex().is_match("a\n∞∞∞json\nb"));
    }
}
