//! Line operations confined to block content.
//!
//! Lines are found inside a block's content only, so a header line is never
//! selected, moved or deleted by these operations.

use crate::editing::{Document, Origin, Selection, SelectionRange, Splice, Transaction};
use crate::index::locate;
use crate::parsing::{Block, Span};

/// The lines a selection range covers, relative to its block.
pub(crate) struct LineRun {
    pub(crate) block: usize,
    /// Line-aligned span, newline excluded.
    pub(crate) span: Span,
}

pub(crate) fn line_run(doc: &Document, range: SelectionRange) -> LineRun {
    let blocks = doc.blocks();
    let block = locate(blocks, range.from());
    let content = blocks[block].content;
    let chars: Vec<char> = doc.slice(content).chars().collect();

    let from = content.clamp(range.from()) - content.start;
    let to = content.clamp(range.to()) - content.start;
    let start = chars[..from]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);
    let end = chars[to..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |i| to + i);

    LineRun {
        block,
        span: Span::new(content.start + start, content.start + end),
    }
}

/// Delete the lines under every selection range.
///
/// Unless the lines are the block's whole content, one adjoining newline
/// goes with them: the one after, or the one before for a block's last line.
pub fn delete_line(doc: &Document) -> Option<Transaction> {
    let blocks = doc.blocks();
    let mut spans: Vec<Span> = doc
        .selection()
        .ranges()
        .iter()
        .map(|&range| {
            let run = line_run(doc, range);
            let content = blocks[run.block].content;
            let span = run.span;
            if span == content {
                span
            } else if span.end < content.end {
                Span::new(span.start, span.end + 1)
            } else {
                Span::new(span.start - 1, span.end)
            }
        })
        .filter(|span| !span.is_empty())
        .collect();
    if spans.is_empty() {
        return None;
    }

    spans.sort_by_key(|s| s.start);
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => *last = last.union(span),
            _ => merged.push(span),
        }
    }

    Some(Transaction::new(Origin::LineOp).with_changes(merged.into_iter().map(Splice::delete)))
}

pub fn move_line_up(doc: &Document) -> Option<Transaction> {
    move_line(doc, true)
}

pub fn move_line_down(doc: &Document) -> Option<Transaction> {
    move_line(doc, false)
}

/// Move the lines under the main selection one line up or down.
///
/// Past the first or last line of a block the lines cross the header into
/// the neighbouring block. A block emptied this way is left with empty
/// content. The selection moves with the lines.
pub fn move_line(doc: &Document, up: bool) -> Option<Transaction> {
    let blocks = doc.blocks();
    let main = doc.selection().main();
    let run = line_run(doc, main);
    let block = &blocks[run.block];
    let content = block.content;
    let span = run.span;
    let lines = doc.slice(span);

    let (changes, new_start) = if up && span.start > content.start {
        let above = line_run(doc, SelectionRange::cursor(span.start - 1)).span;
        let region = Span::new(above.start, span.end);
        let text = format!("{lines}\n{}", doc.slice(above));
        (vec![Splice::replace(region, text)], above.start)
    } else if !up && span.end < content.end {
        let below = line_run(doc, SelectionRange::cursor(span.end + 1)).span;
        let region = Span::new(span.start, below.end);
        let below_text = doc.slice(below);
        let new_start = span.start + below.len() + 1;
        (
            vec![Splice::replace(region, format!("{below_text}\n{lines}"))],
            new_start,
        )
    } else if up {
        let previous = blocks.get(run.block.checked_sub(1)?)?;
        cross_up(previous, content, span, lines)
    } else {
        let next = blocks.get(run.block + 1)?;
        cross_down(next, content, span, lines)
    };

    let shift = |pos: usize| new_start + pos.saturating_sub(span.start).min(span.len());
    let selection = doc.selection().map(|r| {
        if r == &main {
            SelectionRange::new(shift(r.anchor), shift(r.head))
        } else {
            *r
        }
    });

    Some(
        Transaction::new(Origin::LineOp)
            .with_changes(changes)
            .with_selection(selection),
    )
}

/// Lines at the top of a block move to the end of `previous`.
fn cross_up(previous: &Block, content: Span, span: Span, lines: String) -> (Vec<Splice>, usize) {
    let at = previous.content.end;
    let (insert, new_start) = if previous.content.is_empty() {
        (lines, at)
    } else {
        (format!("\n{lines}"), at + 1)
    };
    let removed = if span.end < content.end {
        Span::new(span.start, span.end + 1)
    } else {
        span
    };
    (vec![Splice::insert(at, insert), Splice::delete(removed)], new_start)
}

/// Lines at the bottom of a block move to the start of `next`.
fn cross_down(next: &Block, content: Span, span: Span, lines: String) -> (Vec<Splice>, usize) {
    let removed = if span.start > content.start {
        Span::new(span.start - 1, span.end)
    } else {
        span
    };
    let at = next.content.start;
    let insert = if next.content.is_empty() {
        lines
    } else {
        format!("{lines}\n")
    };
    (
        vec![Splice::delete(removed), Splice::insert(at, insert)],
        at - removed.len(),
    )
}

/// Swap the characters around the cursor; at the end of a line, the two
/// before it.
///
/// Both characters must belong to one line of the cursor's block, and a
/// swap that touches either edge of the block's content is refused.
pub fn transpose_chars(doc: &Document) -> Option<Transaction> {
    let main = doc.selection().main();
    if !main.is_empty() {
        return None;
    }
    let block = doc.current_block()?;
    let pos = main.head;
    if pos <= block.content.start {
        return None;
    }

    let at_line_end = pos == block.content.end || doc.char_at(pos) == Some('\n');
    let swap = if at_line_end {
        Span::new(pos.checked_sub(2)?, pos)
    } else {
        Span::new(pos - 1, pos + 1)
    };
    if swap.start <= block.content.start || swap.end >= block.content.end {
        return None;
    }

    let pair: Vec<char> = doc.slice(swap).chars().collect();
    let [first, second] = pair[..] else {
        return None;
    };
    if first == '\n' || second == '\n' {
        return None;
    }

    Some(
        Transaction::new(Origin::Input)
            .with_change(Splice::replace(swap, format!("{second}{first}")))
            .with_selection(Selection::cursor(swap.end)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::invariants;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // [0,9) text [9,16) "one\ntwo" | [16,25) json [25,27) "{}"
    const DOC: &str = "\n∞∞∞text\none\ntwo\n∞∞∞json\n{}";

    fn doc_at(text: &str, selection: Selection) -> Document {
        let mut doc = Document::new(text);
        doc.set_selection(selection);
        doc
    }

    fn check(doc: &Document) {
        invariants::check(doc.len_chars(), doc.blocks());
    }

    #[rstest]
    #[case::first_line(10, "\n∞∞∞text\ntwo\n∞∞∞json\n{}")]
    #[case::last_line(15, "\n∞∞∞text\none\n∞∞∞json\n{}")]
    #[case::whole_content(26, "\n∞∞∞text\none\ntwo\n∞∞∞json\n")]
    fn delete_line_keeps_headers(#[case] cursor: usize, #[case] expected: &str) {
        let mut doc = doc_at(DOC, Selection::cursor(cursor));
        assert!(doc.run(delete_line(&doc)));
        assert_eq!(doc.text(), expected);
        assert_eq!(doc.blocks().len(), 2);
        check(&doc);
    }

    #[test]
    fn delete_line_twice_on_one_line_merges() {
        let selection = Selection::new(
            vec![SelectionRange::cursor(9), SelectionRange::cursor(11)],
            0,
        );
        let mut doc = doc_at(DOC, selection);
        assert!(doc.run(delete_line(&doc)));
        assert_eq!(doc.text(), "\n∞∞∞text\ntwo\n∞∞∞json\n{}");
    }

    #[test]
    fn delete_line_on_empty_block_does_nothing() {
        let doc = doc_at("\n∞∞∞text\n\n∞∞∞json\n{}", Selection::cursor(9));
        assert_eq!(delete_line(&doc), None);
    }

    #[test]
    fn move_line_within_block() {
        let mut doc = doc_at(DOC, Selection::cursor(10));
        assert!(doc.run(move_line_down(&doc)));
        assert_eq!(doc.text(), "\n∞∞∞text\ntwo\none\n∞∞∞json\n{}");
        assert_eq!(doc.selection(), &Selection::cursor(14));

        assert!(doc.run(move_line_up(&doc)));
        assert_eq!(doc.text(), DOC);
        assert_eq!(doc.selection(), &Selection::cursor(10));
    }

    #[test]
    fn move_line_down_crosses_into_next_block() {
        let mut doc = doc_at(DOC, Selection::cursor(14));
        let ids = doc.index().ids().to_vec();
        assert!(doc.run(move_line_down(&doc)));

        assert_eq!(doc.text(), "\n∞∞∞text\none\n∞∞∞json\ntwo\n{}");
        assert_eq!(doc.selection(), &Selection::cursor(22));
        assert_eq!(doc.index().ids(), ids.as_slice());
        check(&doc);
    }

    #[test]
    fn move_line_up_crosses_into_previous_block() {
        let mut doc = doc_at(DOC, Selection::cursor(26));
        assert!(doc.run(move_line_up(&doc)));

        assert_eq!(doc.text(), "\n∞∞∞text\none\ntwo\n{}\n∞∞∞json\n");
        assert_eq!(doc.selection(), &Selection::cursor(18));
        check(&doc);
    }

    #[test]
    fn move_line_stops_at_document_ends() {
        let doc = doc_at(DOC, Selection::cursor(9));
        assert_eq!(move_line_up(&doc), None);
        let doc = doc_at(DOC, Selection::cursor(26));
        assert_eq!(move_line_down(&doc), None);
    }

    #[rstest]
    #[case::middle(11, Some(("\n∞∞∞text\noen\ntwo\n∞∞∞json\n{}", 12)))]
    #[case::line_end(12, Some(("\n∞∞∞text\noen\ntwo\n∞∞∞json\n{}", 12)))]
    #[case::block_end(16, None)]
    #[case::after_content_start(10, None)]
    #[case::block_start(9, None)]
    #[case::line_start(13, None)]
    fn transpose(#[case] cursor: usize, #[case] expected: Option<(&str, usize)>) {
        let mut doc = doc_at(DOC, Selection::cursor(cursor));
        let applied = doc.run(transpose_chars(&doc));
        match expected {
            Some((text, cursor)) => {
                assert!(applied);
                assert_eq!(doc.text(), text);
                assert_eq!(doc.selection(), &Selection::cursor(cursor));
            }
            None => assert!(!applied),
        }
    }
}
