//! # Parser Events
//!
//! The parser never touches Rowan directly. It emits a flat list of events
//! that the [`Sink`](super::sink::Sink) replays into a green tree:
//!
//! ```text
//! Start(BLOCK)
//!   Start(DELIMITER)
//!     Token(MARK) Token(WORD) Token(NEWLINE)
//!   Finish
//!   Start(CONTENT)
//!     Token(WORD)
//!   Finish
//! Finish
//! ```
//!
//! The block grammar is flat (a document is a list of blocks, a block is a
//! header plus a body), so there is no need for forward-parent links: a
//! node is always opened before its first token.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add the next lexer token to the current node.
    Token { kind: SyntaxKind },

    /// Finish the current node.
    Finish,

    /// A reserved slot for a node that has not been completed yet.
    ///
    /// `parser.start()` pushes one and `marker.complete()` turns it into a
    /// `Start`. The sink skips any left over.
    Placeholder,
}

impl Event {
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
