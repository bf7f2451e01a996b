//! # blockpad-syntax
//!
//! A lossless syntax tree for blockpad documents using [Rowan] + [Logos],
//! following the [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## The document grammar
//!
//! A blockpad document is plain text split into blocks by header lines:
//!
//! ```text
//! \n∞∞∞python-a\n
//! print("hello")
//! \n∞∞∞text\n
//! notes...
//! ```
//!
//! Each header is a line break, the marker `∞∞∞`, a language token, an
//! optional `-a` (auto-detect) suffix and a line break. The tree records
//! where the headers and bodies are; it does not interpret the language
//! token. That is left to the engine, which also owns the registry of
//! valid tokens.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! blockpad-syntax/
//! ├── lib.rs           # This file - public API and tree dump tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         └── block.rs # BLOCK / DELIMITER / CONTENT rules
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use blockpad_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("\n∞∞∞text\nhello");
//! assert_eq!(tree.text().to_string(), "\n∞∞∞text\nhello");
//!
//! let block = tree.children().next().unwrap();
//! assert_eq!(block.kind(), SyntaxKind::BLOCK);
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{BlockLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
