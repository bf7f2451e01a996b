//! # Grammar Rules
//!
//! ```text
//! ROOT      = leading? BLOCK*
//! leading   = BLOCK(CONTENT)               text before the first delimiter
//! BLOCK     = DELIMITER CONTENT
//! DELIMITER = MARK header* NEWLINE         header = WORD | AUTO_FLAG | TEXT
//! CONTENT   = token*                       up to the next delimiter
//! ```
//!
//! The rules are lenient: every token ends up somewhere and the tree always
//! reproduces the source.
//!
//! - A MARK whose header runs to end of input without a NEWLINE is not a
//!   delimiter. It stays in the current CONTENT together with everything
//!   after it.
//! - A header interrupted by another MARK (two delimiter lines glued
//!   together) becomes an ERROR node in place of the DELIMITER. The tokens
//!   cannot be split at the right byte, so consumers are expected to fall
//!   back to a plain text scan for such documents.

mod block;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    if !p.at_end() && !block::at_delimiter(p) {
        block::leading_block(p);
    }

    while !p.at_end() {
        block::block(p);
    }

    m.complete(p, SyntaxKind::ROOT);
}
