//! Position mapping through an applied set of splices.

use crate::editing::Splice;
use crate::parsing::Span;

/// Which side of text inserted exactly at a position the position ends up
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edit {
    range: Span,
    inserted: usize,
}

/// The shape of a transaction's splices: old ranges and inserted lengths.
///
/// Everything here is in chars. Ranges are in the coordinates of the
/// document before the change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    edits: Vec<Edit>,
}

fn offset(pos: usize, shift: isize) -> usize {
    pos.saturating_add_signed(shift)
}

impl ChangeSet {
    /// Build from sorted, non-overlapping splices. Splices that neither
    /// delete nor insert anything are dropped.
    pub fn new(splices: &[Splice]) -> Self {
        let edits = splices
            .iter()
            .filter(|s| !s.range.is_empty() || !s.insert.is_empty())
            .map(|s| Edit {
                range: s.range,
                inserted: s.insert_len(),
            })
            .collect();
        Self { edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Where `pos` ends up after the change.
    ///
    /// A position strictly inside a replaced range moves to the start of the
    /// replacement (`Before`) or to its end (`After`). A position at the start
    /// of a replaced range stays in front of the replacement.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut shift: isize = 0;
        for edit in &self.edits {
            let Span {
                start: from,
                end: to,
            } = edit.range;
            if pos < from || (pos == from && from < to) {
                break;
            }
            if from == to && pos == from {
                if assoc == Assoc::Before {
                    break;
                }
                shift += edit.inserted as isize;
                continue;
            }
            if pos >= to {
                shift += edit.inserted as isize - (to - from) as isize;
                continue;
            }

            let new_from = offset(from, shift);
            return match assoc {
                Assoc::Before => new_from,
                Assoc::After => new_from + edit.inserted,
            };
        }
        offset(pos, shift)
    }

    /// Where a whole span ends up, if it survived as a unit.
    ///
    /// Text inserted at the span's start pushes it along; text inserted at
    /// its end does not touch it. A splice whose range equals the span
    /// rewrites it in place and the span becomes the replacement. Any other
    /// overlap means the span no longer exists.
    pub fn map_span(&self, span: Span) -> Option<Span> {
        let mut shift: isize = 0;
        for edit in &self.edits {
            let range = edit.range;
            if range == span {
                let start = offset(range.start, shift);
                return Some(Span::new(start, start + edit.inserted));
            }
            if range.start >= span.end {
                break;
            }
            if range.end <= span.start {
                shift += edit.inserted as isize - range.len() as isize;
                continue;
            }
            return None;
        }
        Some(Span::new(offset(span.start, shift), offset(span.end, shift)))
    }

    /// The inserted text of each splice, in new-document coordinates.
    pub fn changed_ranges(&self) -> Vec<Span> {
        let mut shift: isize = 0;
        self.edits
            .iter()
            .map(|edit| {
                let start = offset(edit.range.start, shift);
                shift += edit.inserted as isize - edit.range.len() as isize;
                Span::new(start, start + edit.inserted)
            })
            .collect()
    }
}
