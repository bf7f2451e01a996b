//! # Lexer - Tokenizing Block Documents
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token**. Nothing is
//! skipped, so concatenating the token texts reproduces the source:
//!
//! ```
//! use blockpad_syntax::lexer::lex;
//!
//! let input = "\n∞∞∞rust-a\nfn main() {}\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer does not know whether a `WORD` is a
//! language token in a header or a word inside block content; the parser
//! decides that from position. Only the pieces of the header grammar get
//! their own kinds:
//!
//! - `"\n∞∞∞"` → `MARK` (always wins over a bare `NEWLINE`, longest match)
//! - `[A-Za-z0-9_]+` → `WORD`
//! - `-a` → `AUTO_FLAG`
//! - `\n` → `NEWLINE`
//!
//! Everything else becomes `TEXT`, grouped into runs.
//!
//! [`TokenKind`] exists because Logos needs its own derive target;
//! [`TokenKind::to_syntax_kind`] maps it onto the shared [`SyntaxKind`].

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Block marker, the start of every delimiter
    #[token("\n∞∞∞")]
    Mark,

    /// Line ending
    #[token("\n")]
    Newline,

    /// Language-token characters
    #[regex(r"[A-Za-z0-9_]+")]
    Word,

    /// Auto-detect suffix
    #[token("-a")]
    AutoFlag,

    /// A dash that does not start `-a`
    #[token("-")]
    Dash,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\nA-Za-z0-9_\-]+")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Mark => SyntaxKind::MARK,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Word => SyntaxKind::WORD,
            TokenKind::AutoFlag => SyntaxKind::AUTO_FLAG,
            TokenKind::Dash | TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Logos error means unrecognized input - treat as TEXT
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push(Token { kind, text });
    }

    tokens
}
