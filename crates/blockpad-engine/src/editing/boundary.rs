//! Rules that keep block headers intact and the cursor out of them.
//!
//! Changes are checked before they reach the buffer:
//!
//! - a deletion or replacement that cuts into a header is widened to take
//!   the whole header
//! - an insertion strictly inside a header is refused
//! - ordinary edits may not touch the first block's header
//!
//! The resulting selection is checked after the blocks are rebuilt: ends
//! that land inside a header are redirected, nothing may sit before the
//! first block's content, and a selection may not reach from one block
//! into another.

use crate::editing::{EditError, Origin, Selection, SelectionRange, Splice};
use crate::index::locate;
use crate::parsing::{Block, Span};

/// Bounds and ordering of raw splices.
pub(crate) fn check_changes(changes: &[Splice], len: usize) -> Result<(), EditError> {
    let mut previous: Option<Span> = None;
    for splice in changes {
        let range = splice.range;
        if range.start > range.end || range.end > len {
            return Err(EditError::OutOfBounds { range, len });
        }
        if let Some(previous) = previous
            && range.start < previous.end
        {
            return Err(EditError::UnsortedSplices {
                previous,
                next: range,
            });
        }
        previous = Some(range);
    }
    Ok(())
}

/// Apply the header rules to `changes`, returning the splices to apply.
pub(crate) fn guard_changes(
    blocks: &[Block],
    origin: Origin,
    changes: Vec<Splice>,
) -> Result<Vec<Splice>, EditError> {
    let mut guarded: Vec<Splice> = Vec::with_capacity(changes.len());

    for mut splice in changes {
        for block in blocks.iter().filter(|b| b.has_header()) {
            let delimiter = block.delimiter;
            if splice.range.is_empty() {
                if delimiter.strictly_contains(splice.range.start) {
                    return Err(EditError::SplitsDelimiter {
                        pos: splice.range.start,
                        delimiter,
                    });
                }
            } else if splice.range.overlaps(delimiter) && !splice.range.covers(delimiter) {
                log::debug!("widening {} to cover header {delimiter}", splice.range);
                splice.range = splice.range.union(delimiter);
            }
        }

        match guarded.last_mut() {
            Some(previous) if splice.range.start < previous.range.end => {
                previous.range = previous.range.union(splice.range);
                previous.insert.push_str(&splice.insert);
            }
            _ => guarded.push(splice),
        }
    }

    if origin.is_ordinary_edit()
        && let Some(first) = blocks.first().filter(|b| b.has_header())
        && let Some(splice) = guarded
            .iter()
            .find(|s| s.range.start < first.delimiter.end)
    {
        return Err(EditError::FirstBlockProtected {
            range: splice.range,
        });
    }

    Ok(guarded)
}

/// Move `pos` out of a header it sits strictly inside.
///
/// Forward lands on that block's content start. Backward lands on the end of
/// the previous block's content, or on the header start for the first
/// block.
pub fn redirect(blocks: &[Block], pos: usize, forward: bool) -> usize {
    if !inside_header(blocks, pos) {
        return pos;
    }
    let i = locate(blocks, pos);
    let Some(block) = blocks.get(i) else {
        return pos;
    };

    if forward {
        block.content.start
    } else if i > 0 {
        blocks[i - 1].content.end
    } else {
        block.delimiter.start
    }
}

fn inside_header(blocks: &[Block], pos: usize) -> bool {
    blocks
        .get(locate(blocks, pos))
        .is_some_and(|block| block.delimiter.strictly_contains(pos))
}

/// The selection actually allowed after a transaction.
///
/// Direction for redirection comes from comparing each head with the head
/// it had before the transaction. A range with an end inside a header is
/// redirected and left unclamped.
pub(crate) fn enforce_selection(
    blocks: &[Block],
    selection: &Selection,
    previous: &Selection,
    origin: Origin,
    len: usize,
) -> Selection {
    let floor = blocks.first().map_or(0, |b| b.content.start);

    let ranges = selection
        .ranges()
        .iter()
        .enumerate()
        .map(|(i, range)| {
            let old_head = previous
                .ranges()
                .get(i)
                .map_or(previous.main().head, |r| r.head);
            let forward = range.head >= old_head;

            let raw_anchor = range.anchor.min(len);
            let raw_head = range.head.min(len);
            let redirected = inside_header(blocks, raw_anchor) || inside_header(blocks, raw_head);

            let anchor = redirect(blocks, raw_anchor, forward).max(floor);
            let mut head = redirect(blocks, raw_head, forward).max(floor);

            if origin.clamps_to_block() && !redirected {
                let anchor_block = locate(blocks, anchor);
                if anchor_block != locate(blocks, head)
                    && let Some(block) = blocks.get(anchor_block)
                {
                    head = block.content.clamp(head);
                }
            }

            SelectionRange::new(anchor, head)
        })
        .collect();

    Selection::new(ranges, selection.main_index())
}
