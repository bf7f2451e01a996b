//! Block-level operations.
//!
//! Every operation reads the document and returns the transaction that
//! would carry it out, or `None` when there is nothing to do. Blocks are
//! addressed by their position in [`Document::blocks`].

use crate::delimiter::{self, MARKER};
use crate::editing::{Document, Origin, Selection, SelectionRange, Splice, Transaction};
use crate::language;
use crate::parsing::{Block, Span};

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Insert an empty block after `target`. The cursor lands in the new block.
pub fn insert_block_after(
    doc: &Document,
    target: usize,
    language: &str,
    auto: bool,
) -> Option<Transaction> {
    if !language::is_known(language) {
        return None;
    }
    let block = doc.blocks().get(target)?;
    let header = delimiter::encode(language, auto);
    let at = block.range.end;

    Some(
        Transaction::new(Origin::BlockOp)
            .with_change(Splice::insert(at, &header))
            .with_selection(Selection::cursor(at + char_len(&header))),
    )
}

/// Insert an empty block before `target`.
///
/// A header-less leading block is given an explicit default header at the
/// same time, so its text stays in a block of its own.
pub fn insert_block_before(
    doc: &Document,
    target: usize,
    language: &str,
    auto: bool,
) -> Option<Transaction> {
    if !language::is_known(language) {
        return None;
    }
    let block = doc.blocks().get(target)?;
    let mut header = delimiter::encode(language, auto);
    let cursor = block.range.start + char_len(&header);
    if !block.has_header() {
        header.push_str(&delimiter::encode(&block.language.name, false));
    }

    Some(
        Transaction::new(Origin::BlockOp)
            .with_change(Splice::insert(block.range.start, header))
            .with_selection(Selection::cursor(cursor)),
    )
}

pub fn add_block_after_current(doc: &Document) -> Option<Transaction> {
    insert_block_after(
        doc,
        doc.current_block_index(),
        doc.default_language(),
        doc.default_auto(),
    )
}

pub fn add_block_before_current(doc: &Document) -> Option<Transaction> {
    insert_block_before(
        doc,
        doc.current_block_index(),
        doc.default_language(),
        doc.default_auto(),
    )
}

pub fn add_block_after_last(doc: &Document) -> Option<Transaction> {
    let last = doc.blocks().len().checked_sub(1)?;
    insert_block_after(doc, last, doc.default_language(), doc.default_auto())
}

pub fn add_block_before_first(doc: &Document) -> Option<Transaction> {
    insert_block_before(doc, 0, doc.default_language(), doc.default_auto())
}

/// Split the current block at the cursor. The new header repeats the
/// current block's language.
pub fn insert_block_at_cursor(doc: &Document) -> Option<Transaction> {
    let block = doc.current_block()?;
    let at = doc.selection().main().head;
    let header = delimiter::encode(&block.language.name, block.language.auto);

    Some(
        Transaction::new(Origin::BlockOp)
            .with_change(Splice::insert(at, &header))
            .with_selection(Selection::cursor(at + char_len(&header))),
    )
}

/// Remove `target` with its header. The only block cannot be deleted.
pub fn delete_block(doc: &Document, target: usize) -> Option<Transaction> {
    let blocks = doc.blocks();
    if blocks.len() < 2 {
        return None;
    }
    let block = blocks.get(target)?;

    let cursor = match blocks.get(target + 1) {
        Some(next) => next.content.start - block.range.len(),
        None => blocks[target - 1].content.end,
    };

    Some(
        Transaction::new(Origin::BlockOp)
            .with_change(Splice::delete(block.range))
            .with_selection(Selection::cursor(cursor)),
    )
}

pub fn delete_current_block(doc: &Document) -> Option<Transaction> {
    delete_block(doc, doc.current_block_index())
}

pub fn move_block_up(doc: &Document, target: usize) -> Option<Transaction> {
    swap_with_next(doc, target.checked_sub(1)?)
}

pub fn move_block_down(doc: &Document, target: usize) -> Option<Transaction> {
    swap_with_next(doc, target)
}

pub fn move_current_block_up(doc: &Document) -> Option<Transaction> {
    move_block_up(doc, doc.current_block_index())
}

pub fn move_current_block_down(doc: &Document) -> Option<Transaction> {
    move_block_down(doc, doc.current_block_index())
}

/// Swap block `upper` with the block after it. Selection ends keep their
/// offset from the start of their block's content.
fn swap_with_next(doc: &Document, upper: usize) -> Option<Transaction> {
    let blocks = doc.blocks();
    let first = blocks.get(upper)?;
    let second = blocks.get(upper + 1)?;

    // A header-less block cannot follow another block.
    let added = if first.has_header() {
        String::new()
    } else {
        delimiter::encode(&first.language.name, false)
    };
    let first_text = doc.slice(first.range);
    let second_text = doc.slice(second.range);

    let region = Span::new(first.range.start, second.range.end);
    let second_content = region.start + second.delimiter.len();
    let first_content =
        region.start + second.range.len() + char_len(&added) + first.delimiter.len();
    let grown = char_len(&added);

    let map = |pos: usize| {
        if pos < region.start {
            pos
        } else if first.content.start <= pos && pos <= first.content.end {
            first_content + (pos - first.content.start)
        } else if second.content.start <= pos && pos <= second.content.end {
            second_content + (pos - second.content.start)
        } else {
            pos + grown
        }
    };
    let selection = doc
        .selection()
        .map(|r| SelectionRange::new(map(r.anchor), map(r.head)));

    Some(
        Transaction::new(Origin::BlockOp)
            .with_change(Splice::replace(
                region,
                format!("{second_text}{added}{first_text}"),
            ))
            .with_selection(selection),
    )
}

/// Rewrite the header of `block`, a block as the caller last saw it.
///
/// The live text under the recorded header is checked first; when it is no
/// longer a header the caller's view is stale and nothing happens.
/// Unregistered languages and no-op rewrites are refused too.
pub fn change_language(
    doc: &Document,
    block: &Block,
    language: &str,
    auto: bool,
) -> Option<Transaction> {
    change_language_with_origin(doc, block, language, auto, Origin::LanguageChange)
}

pub(crate) fn change_language_with_origin(
    doc: &Document,
    block: &Block,
    language: &str,
    auto: bool,
    origin: Origin,
) -> Option<Transaction> {
    if !language::is_known(language) {
        return None;
    }
    let header = delimiter::encode(language, auto);

    let splice = if block.has_header() {
        let live = doc.slice(block.delimiter);
        if !delimiter::is_delimiter_shaped(&live) {
            log::debug!("stale header at {}: {live:?}", block.delimiter);
            return None;
        }
        if live == header {
            return None;
        }
        Splice::replace(block.delimiter, header)
    } else {
        let starts_with_marker = doc.slice(Span::new(0, MARKER.chars().count())) == MARKER;
        if block.range.start != 0 || starts_with_marker {
            log::debug!("stale header-less block at {}", block.range);
            return None;
        }
        Splice::insert(0, header)
    };

    Some(Transaction::new(origin).with_change(splice))
}

/// Move the current block to the next registry language, auto off.
pub fn cycle_language(doc: &Document) -> Option<Transaction> {
    let block = doc.current_block()?;
    change_language(
        doc,
        block,
        language::next_language(&block.language.name),
        false,
    )
}

/// Flip the auto-detect flag of the current block.
pub fn toggle_auto(doc: &Document) -> Option<Transaction> {
    let block = doc.current_block()?;
    change_language(doc, block, &block.language.name, !block.language.auto)
}
