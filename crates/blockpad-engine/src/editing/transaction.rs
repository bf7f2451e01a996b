//! Transactions: the one way text and selection change.

use thiserror::Error;

use crate::parsing::Span;

/// Replace the old-document `range` with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub range: Span,
    pub insert: String,
}

impl Splice {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: Span::point(at),
            insert: text.into(),
        }
    }

    pub fn delete(range: Span) -> Self {
        Self {
            range,
            insert: String::new(),
        }
    }

    pub fn replace(range: Span, text: impl Into<String>) -> Self {
        Self {
            range,
            insert: text.into(),
        }
    }

    /// Inserted length in chars.
    pub fn insert_len(&self) -> usize {
        self.insert.chars().count()
    }
}

/// What produced a transaction. Decides which boundary rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Input,
    Delete,
    Paste,
    Cut,
    ReplaceAll,
    BlockOp,
    LanguageChange,
    AutoLanguage,
    LineOp,
    Format,
    Undo,
    Redo,
    SelectAll,
    Navigate,
    /// A selection made by the user (pointer drag, shift+arrows).
    Select,
}

impl Origin {
    /// Ordinary edits may not touch the first block's header.
    pub fn is_ordinary_edit(self) -> bool {
        matches!(
            self,
            Origin::Input
                | Origin::Delete
                | Origin::Paste
                | Origin::Cut
                | Origin::LineOp
                | Origin::Format
        )
    }

    /// Whether a selection reaching into another block is pulled back into
    /// the anchor's block.
    pub fn clamps_to_block(self) -> bool {
        !matches!(
            self,
            Origin::SelectAll | Origin::ReplaceAll | Origin::Navigate
        )
    }

    pub fn is_history(self) -> bool {
        matches!(self, Origin::Undo | Origin::Redo)
    }
}

/// One selection range. `anchor` stays put while extending, `head` moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn span(&self) -> Span {
        Span::new(self.from(), self.to())
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// A non-empty list of ranges, one of them the main range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
    main: usize,
}

impl Selection {
    /// `main` is clamped into the list; an empty list becomes a cursor at 0.
    pub fn new(ranges: Vec<SelectionRange>, main: usize) -> Self {
        if ranges.is_empty() {
            return Self::cursor(0);
        }
        let main = main.min(ranges.len() - 1);
        Self { ranges, main }
    }

    pub fn single(anchor: usize, head: usize) -> Self {
        Self {
            ranges: vec![SelectionRange::new(anchor, head)],
            main: 0,
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::single(pos, pos)
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    pub fn main(&self) -> SelectionRange {
        self.ranges[self.main]
    }

    pub fn main_index(&self) -> usize {
        self.main
    }

    /// True when every range is a bare cursor.
    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(SelectionRange::is_empty)
    }

    /// A selection with each range replaced by `f(range)`.
    pub fn map(&self, f: impl FnMut(&SelectionRange) -> SelectionRange) -> Selection {
        Selection {
            ranges: self.ranges.iter().map(f).collect(),
            main: self.main,
        }
    }
}

/// A batch of splices plus the selection to end up with.
///
/// Splices are in pre-transaction coordinates, sorted by start and
/// non-overlapping. With no explicit selection the current one is mapped
/// through the changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub changes: Vec<Splice>,
    pub selection: Option<Selection>,
    pub origin: Origin,
}

impl Transaction {
    pub fn new(origin: Origin) -> Self {
        Self {
            changes: Vec::new(),
            selection: None,
            origin,
        }
    }

    /// A transaction that only moves the selection.
    pub fn select(selection: Selection, origin: Origin) -> Self {
        Self::new(origin).with_selection(selection)
    }

    pub fn with_change(mut self, splice: Splice) -> Self {
        self.changes.push(splice);
        self
    }

    pub fn with_changes(mut self, splices: impl IntoIterator<Item = Splice>) -> Self {
        self.changes.extend(splices);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// Why a transaction was refused. The document is unchanged when any of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("splice {range} is outside the document (length {len})")]
    OutOfBounds { range: Span, len: usize },

    #[error("splice {next} starts before the previous splice {previous} ends")]
    UnsortedSplices { previous: Span, next: Span },

    #[error("insertion at {pos} would split the block header at {delimiter}")]
    SplitsDelimiter { pos: usize, delimiter: Span },

    #[error("edit at {range} touches the first block's header")]
    FirstBlockProtected { range: Span },
}
