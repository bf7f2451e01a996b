//! Block-level grammar rules.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// True when the parser sits on a MARK whose header line is terminated.
///
/// A header counts as terminated when a NEWLINE or another MARK (which
/// starts with a line break of its own) shows up before end of input.
pub(super) fn at_delimiter(p: &Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::MARK) {
        return false;
    }

    let mut n = 1;
    loop {
        match p.nth(n) {
            SyntaxKind::NEWLINE | SyntaxKind::MARK => return true,
            SyntaxKind::EOF => return false,
            _ => n += 1,
        }
    }
}

/// Text in front of the first delimiter: a BLOCK with no DELIMITER.
pub(super) fn leading_block(p: &mut Parser<'_, '_>) {
    let m = p.start();
    content(p);
    m.complete(p, SyntaxKind::BLOCK);
}

pub(super) fn block(p: &mut Parser<'_, '_>) {
    let m = p.start();
    if at_delimiter(p) {
        delimiter(p);
    }
    content(p);
    m.complete(p, SyntaxKind::BLOCK);
}

fn delimiter(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::MARK) {
        p.bump();
    }

    if p.eat(SyntaxKind::NEWLINE) {
        m.complete(p, SyntaxKind::DELIMITER);
    } else {
        m.complete(p, SyntaxKind::ERROR);
    }
}

fn content(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !p.at_end() && !at_delimiter(p) {
        p.bump();
    }
    m.complete(p, SyntaxKind::CONTENT);
}
