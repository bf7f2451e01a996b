//! Copy, cut and paste.
//!
//! Text leaving the document is sanitized: block headers never reach the
//! system clipboard.

use std::borrow::Cow;

use crate::delimiter::{header_line_regex, trailing_header_regex};
use crate::editing::lines::line_run;
use crate::editing::{Document, Origin, Selection, SelectionRange, Splice, Transaction};
use crate::parsing::Span;

/// Replace every header line with a blank line, and a header cut off at the
/// end of the text with a line break.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    let mut text = Cow::Borrowed(text);
    // Glued headers share a line break, so one pass can leave a marker behind.
    while header_line_regex().is_match(&text) {
        text = Cow::Owned(header_line_regex().replace_all(&text, "\n\n").into_owned());
    }
    if trailing_header_regex().is_match(&text) {
        text = Cow::Owned(trailing_header_regex().replace(&text, "\n").into_owned());
    }
    text
}

/// One captured piece: the text to copy and the span a cut removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    text: Span,
    removal: Span,
}

/// What a copy or cut takes, in document order.
fn capture(doc: &Document) -> Vec<Piece> {
    let selection = doc.selection();
    let mut pieces: Vec<Piece> = if selection.is_collapsed() {
        let mut lines: Vec<Piece> = Vec::new();
        for &range in selection.ranges() {
            let run = line_run(doc, range);
            let content = doc.blocks()[run.block].content;
            let removal = if run.span.end < content.end {
                Span::new(run.span.start, run.span.end + 1)
            } else {
                run.span
            };
            if !lines.iter().any(|l| l.text.start == run.span.start) {
                lines.push(Piece {
                    text: run.span,
                    removal,
                });
            }
        }
        lines
    } else {
        selection
            .ranges()
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| Piece {
                text: r.span(),
                removal: r.span(),
            })
            .collect()
    };
    pieces.sort_by_key(|p| p.text.start);
    pieces
}

fn joined(doc: &Document, pieces: &[Piece]) -> String {
    let texts: Vec<String> = pieces.iter().map(|p| doc.slice(p.text)).collect();
    sanitize(&texts.join("\n")).into_owned()
}

/// Clipboard text for the current selection. With only cursors, their
/// lines are copied.
pub fn copy(doc: &Document) -> String {
    joined(doc, &capture(doc))
}

/// Clipboard text plus the transaction removing it. Line-wise cuts take the
/// line's own newline but never a header's.
pub fn cut(doc: &Document) -> (String, Option<Transaction>) {
    let pieces = capture(doc);
    let text = joined(doc, &pieces);

    let mut removals: Vec<Span> = Vec::with_capacity(pieces.len());
    for span in pieces.iter().map(|p| p.removal).filter(|s| !s.is_empty()) {
        match removals.last_mut() {
            Some(last) if span.start <= last.end => *last = last.union(span),
            _ => removals.push(span),
        }
    }
    if removals.is_empty() {
        return (text, None);
    }

    let transaction =
        Transaction::new(Origin::Cut).with_changes(removals.into_iter().map(Splice::delete));
    (text, Some(transaction))
}

/// Insert `text` at every selection range.
///
/// With several ranges and exactly as many lines, the ranges receive one
/// line each in document order. Otherwise each range receives the whole
/// text. Cursors end up after their inserted text.
pub fn paste(doc: &Document, text: &str) -> Option<Transaction> {
    if text.is_empty() {
        return None;
    }
    let ranges = doc.selection().ranges();
    let lines: Vec<&str> = text.split('\n').collect();
    let distribute = ranges.len() > 1 && lines.len() == ranges.len();

    let mut order: Vec<usize> = (0..ranges.len()).collect();
    order.sort_by_key(|&i| ranges[i].from());

    let mut splices = Vec::with_capacity(ranges.len());
    let mut cursors = vec![SelectionRange::cursor(0); ranges.len()];
    let mut shift: isize = 0;
    for (k, i) in order.into_iter().enumerate() {
        let range = ranges[i];
        let insert = if distribute { lines[k] } else { text };
        let inserted = insert.chars().count();
        let start = range.from().saturating_add_signed(shift);
        cursors[i] = SelectionRange::cursor(start + inserted);
        shift += inserted as isize - range.span().len() as isize;
        splices.push(Splice::replace(range.span(), insert));
    }

    Some(
        Transaction::new(Origin::Paste)
            .with_changes(splices)
            .with_selection(Selection::new(cursors, doc.selection().main_index())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::navigation::select_all;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // [0,9) text [9,16) "one\ntwo" | [16,25) json [25,27) "{}"
    const DOC: &str = "\n∞∞∞text\none\ntwo\n∞∞∞json\n{}";

    fn doc_at(text: &str, selection: Selection) -> Document {
        let mut doc = Document::new(text);
        doc.set_selection(selection);
        doc
    }

    #[rstest]
    #[case("\n∞∞∞py\nprint(1)", "\n\nprint(1)")]
    #[case("a\n∞∞∞json-a\nb\n∞∞∞text\nc", "a\n\nb\n\nc")]
    #[case("tail\n∞∞∞pyth", "tail\n")]
    #[case("\n∞∞∞a\n∞∞∞b\nc", "\n\n\nc")]
    #[case("no headers", "no headers")]
    fn sanitize_headers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[test]
    fn copy_never_exposes_the_marker() {
        let mut doc = doc_at(DOC, Selection::cursor(10));
        doc.run(select_all(&doc));
        doc.run(select_all(&doc));
        assert_eq!(copy(&doc), "one\ntwo\n\n{}");
    }

    #[test]
    fn copy_selection_verbatim() {
        let doc = doc_at(DOC, Selection::single(10, 14));
        assert_eq!(copy(&doc), "ne\nt");
    }

    #[test]
    fn copy_cursor_lines_deduplicated() {
        let selection = Selection::new(
            vec![
                SelectionRange::cursor(9),
                SelectionRange::cursor(11),
                SelectionRange::cursor(26),
            ],
            0,
        );
        let doc = doc_at(DOC, selection);
        assert_eq!(copy(&doc), "one\n{}");
    }

    #[test]
    fn line_cut_keeps_header_newline() {
        let mut doc = doc_at(DOC, Selection::cursor(14));
        let (text, tx) = cut(&doc);
        assert_eq!(text, "two");
        assert!(doc.run(tx));
        assert_eq!(doc.text(), "\n∞∞∞text\none\n\n∞∞∞json\n{}");

        let mut doc = doc_at(DOC, Selection::cursor(10));
        let (text, tx) = cut(&doc);
        assert_eq!(text, "one");
        assert!(doc.run(tx));
        assert_eq!(doc.text(), "\n∞∞∞text\ntwo\n∞∞∞json\n{}");
    }

    #[test]
    fn cut_everything_leaves_first_header() {
        let mut doc = doc_at(DOC, Selection::cursor(10));
        doc.run(select_all(&doc));
        doc.run(select_all(&doc));
        let (_, tx) = cut(&doc);
        assert!(doc.run(tx));
        assert_eq!(doc.text(), "\n∞∞∞text\n");
        assert_eq!(doc.selection(), &Selection::cursor(9));
    }

    #[test]
    fn paste_replaces_selection() {
        let mut doc = doc_at(DOC, Selection::single(9, 12));
        assert!(doc.run(paste(&doc, "1\n2")));
        assert_eq!(doc.text(), "\n∞∞∞text\n1\n2\ntwo\n∞∞∞json\n{}");
        assert_eq!(doc.selection(), &Selection::cursor(12));
    }

    #[test]
    fn paste_distributes_lines_over_cursors() {
        let selection = Selection::new(
            vec![SelectionRange::cursor(13), SelectionRange::cursor(9)],
            1,
        );
        let mut doc = doc_at(DOC, selection);
        assert!(doc.run(paste(&doc, "x\ny")));

        assert_eq!(doc.text(), "\n∞∞∞text\nxone\nytwo\n∞∞∞json\n{}");
        assert_eq!(
            doc.selection(),
            &Selection::new(
                vec![SelectionRange::cursor(15), SelectionRange::cursor(10)],
                1
            )
        );
    }
}
