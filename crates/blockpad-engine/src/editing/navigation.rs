//! Cursor movement that knows about blocks.

use crate::editing::boundary::redirect;
use crate::editing::{Document, Origin, Selection, SelectionRange, Transaction};
use crate::index::locate;

/// Move every head to the edge of its block, or across to the neighbour
/// when it already sits on that edge.
///
/// Forward targets are content ends and the next block's content start;
/// backward targets are content starts and the previous block's content
/// end. With `extend` the anchors stay put. `None` when no head moves.
pub fn navigate(doc: &Document, forward: bool, extend: bool) -> Option<Transaction> {
    let blocks = doc.blocks();

    let selection = doc.selection().map(|range| {
        let i = locate(blocks, range.head);
        let block = &blocks[i];
        let head = if forward {
            match blocks.get(i + 1) {
                Some(next) if range.head == block.content.end => next.content.start,
                _ => block.content.end,
            }
        } else if range.head == block.content.start && i > 0 {
            blocks[i - 1].content.end
        } else {
            block.content.start
        };

        let anchor = if extend { range.anchor } else { head };
        SelectionRange::new(anchor, head)
    });

    if &selection == doc.selection() {
        return None;
    }
    Some(Transaction::select(selection, Origin::Navigate))
}

pub fn next_block(doc: &Document) -> Option<Transaction> {
    navigate(doc, true, false)
}

pub fn previous_block(doc: &Document) -> Option<Transaction> {
    navigate(doc, false, false)
}

pub fn select_next_block(doc: &Document) -> Option<Transaction> {
    navigate(doc, true, true)
}

pub fn select_previous_block(doc: &Document) -> Option<Transaction> {
    navigate(doc, false, true)
}

/// Select the current block's content, or everything once it already is.
pub fn select_all(doc: &Document) -> Option<Transaction> {
    let block = doc.current_block()?;
    let main = doc.selection().main();

    let selection = if doc.selection().ranges().len() == 1 && main.span().covers(block.content) {
        let start = doc.blocks().first().map_or(0, |b| b.content.start);
        Selection::single(start, doc.len_chars())
    } else {
        Selection::single(block.content.start, block.content.end)
    };

    if &selection == doc.selection() {
        return None;
    }
    Some(Transaction::select(selection, Origin::SelectAll))
}

fn step(doc: &Document, forward: bool) -> Option<Transaction> {
    let blocks = doc.blocks();
    let len = doc.len_chars();
    let floor = blocks.first().map_or(0, |b| b.content.start);

    let selection = doc.selection().map(|range| {
        let moved = if forward {
            (range.head + 1).min(len)
        } else {
            range.head.saturating_sub(1)
        };
        SelectionRange::cursor(redirect(blocks, moved, forward).max(floor))
    });

    if &selection == doc.selection() {
        return None;
    }
    Some(Transaction::select(selection, Origin::Navigate))
}

/// One character right. A header is skipped in a single step.
pub fn cursor_char_forward(doc: &Document) -> Option<Transaction> {
    step(doc, true)
}

/// One character left. A header is skipped in a single step.
pub fn cursor_char_backward(doc: &Document) -> Option<Transaction> {
    step(doc, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // [0,9) text [9,12) "abc" | [12,21) json [21,23) "{}" | [23,31) sql [31,32) "x"
    const DOC: &str = "\n∞∞∞text\nabc\n∞∞∞json\n{}\n∞∞∞sql\nx";

    fn doc_with(selection: Selection) -> Document {
        let mut doc = Document::new(DOC);
        doc.set_selection(selection);
        doc
    }

    fn cursor_after(doc: &mut Document, tx: Option<Transaction>) -> Option<usize> {
        doc.run(tx).then(|| doc.selection().main().head)
    }

    #[rstest]
    #[case::to_own_end(10, true, Some(12))]
    #[case::jump_to_next(12, true, Some(21))]
    #[case::to_own_start(22, false, Some(21))]
    #[case::jump_to_previous(21, false, Some(12))]
    #[case::last_block_end(32, true, None)]
    #[case::first_block_start(9, false, None)]
    fn navigate_between_blocks(
        #[case] from: usize,
        #[case] forward: bool,
        #[case] expected: Option<usize>,
    ) {
        let mut doc = doc_with(Selection::cursor(from));
        let tx = navigate(&doc, forward, false);
        assert_eq!(cursor_after(&mut doc, tx), expected);
    }

    #[test]
    fn select_next_block_keeps_anchor() {
        let mut doc = doc_with(Selection::cursor(10));
        assert!(doc.run(select_next_block(&doc)));
        assert!(doc.run(select_next_block(&doc)));
        assert_eq!(doc.selection(), &Selection::single(10, 21));
    }

    #[test]
    fn select_all_widens_in_two_steps() {
        let mut doc = doc_with(Selection::cursor(22));
        assert!(doc.run(select_all(&doc)));
        assert_eq!(doc.selection(), &Selection::single(21, 23));

        assert!(doc.run(select_all(&doc)));
        assert_eq!(doc.selection(), &Selection::single(9, 32));

        assert!(!doc.run(select_all(&doc)));
    }

    #[rstest]
    #[case::plain(10, true, 11)]
    #[case::over_header_forward(12, true, 21)]
    #[case::over_header_backward(21, false, 12)]
    #[case::plain_backward(11, false, 10)]
    fn char_steps(#[case] from: usize, #[case] forward: bool, #[case] expected: usize) {
        let mut doc = doc_with(Selection::cursor(from));
        let tx = if forward {
            cursor_char_forward(&doc)
        } else {
            cursor_char_backward(&doc)
        };
        assert_eq!(cursor_after(&mut doc, tx), Some(expected));
    }

    #[test]
    fn no_step_before_first_content() {
        let doc = doc_with(Selection::cursor(9));
        assert_eq!(cursor_char_backward(&doc), None);
        let doc = doc_with(Selection::cursor(32));
        assert_eq!(cursor_char_forward(&doc), None);
    }
}
