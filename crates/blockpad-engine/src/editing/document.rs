use blockpad_config::EditorSettings;
use ropey::Rope;

use crate::editing::boundary;
use crate::editing::changes::{Assoc, ChangeSet};
use crate::editing::{EditError, Origin, Patch, Selection, SelectionRange, Transaction};
use crate::index::BlockIndex;
use crate::language;
use crate::parsing::{Block, Span};

/// The editing model: one rope, its block index and the selection.
///
/// ## Edit pipeline
///
/// Every change goes through [`Document::dispatch`]:
///
/// 1. **Check** the splices (bounds, ordering)
/// 2. **Guard** block headers: widen partial header edits, refuse
///    insertions inside a header and edits to the first header
/// 3. **Apply** the splices to the rope, last first so earlier offsets stay
///    valid
/// 4. **Reparse** through the [`BlockIndex`], carrying block ids across
/// 5. **Settle** the selection: redirect out of headers, keep it inside the
///    anchor's block
/// 6. **Version** bump
///
/// A refused transaction leaves the document untouched.
///
/// ```rust
/// # use blockpad_engine::editing::{Document, Origin, Selection, Splice, Transaction};
/// let mut doc = Document::new("\n∞∞∞text\nhello");
///
/// let patch = doc
///     .dispatch(
///         Transaction::new(Origin::Input)
///             .with_change(Splice::insert(14, "!"))
///             .with_selection(Selection::cursor(15)),
///     )
///     .unwrap();
///
/// assert_eq!(doc.text(), "\n∞∞∞text\nhello!");
/// assert_eq!(patch.selection, Selection::cursor(15));
/// ```
pub struct Document {
    buffer: Rope,
    selection: Selection,
    version: u64,
    index: BlockIndex,
    default_language: &'static str,
    default_auto: bool,
}

impl Document {
    /// A document with default editor settings.
    pub fn new(text: &str) -> Self {
        Self::with_settings(text, &EditorSettings::default())
    }

    pub fn with_settings(text: &str, settings: &EditorSettings) -> Self {
        let default_language = language::resolve_default(&settings.default_language);
        let buffer = Rope::from_str(text);
        let mut index = BlockIndex::new(default_language);
        index.rebuild(text);

        let len = buffer.len_chars();
        let end = index.last().map_or(len, |b| b.content.end);
        let selection = boundary::enforce_selection(
            index.blocks(),
            &Selection::cursor(end),
            &Selection::cursor(end),
            Origin::Select,
            len,
        );

        Self {
            buffer,
            selection,
            version: 0,
            index,
            default_language,
            default_auto: settings.default_auto_detect,
        }
    }

    /// Apply a transaction.
    pub fn dispatch(&mut self, transaction: Transaction) -> Result<Patch, EditError> {
        let Transaction {
            changes,
            selection,
            origin,
        } = transaction;

        boundary::check_changes(&changes, self.len_chars())?;
        let requested = changes.clone();
        let changes = boundary::guard_changes(self.index.blocks(), origin, changes)?;
        let change_set = ChangeSet::new(&changes);

        for splice in changes.iter().rev() {
            let Span { start, end } = splice.range;
            if start < end {
                self.buffer.remove(start..end);
            }
            if !splice.insert.is_empty() {
                self.buffer.insert(start, &splice.insert);
            }
        }

        // A selection computed for the requested splices is meaningless once
        // they were widened; follow the edit instead.
        let previous = self.selection.clone();
        let selection = match selection {
            Some(selection) if changes == requested => selection,
            _ => previous.map(|r| {
                SelectionRange::new(
                    change_set.map_pos(r.anchor, Assoc::After),
                    change_set.map_pos(r.head, Assoc::After),
                )
            }),
        };

        let doc_changed = !change_set.is_empty();
        if doc_changed {
            let text = self.buffer.to_string();
            self.index.update(&text, &change_set);
        }

        self.selection = boundary::enforce_selection(
            self.index.blocks(),
            &selection,
            &previous,
            origin,
            self.len_chars(),
        );
        self.version += 1;

        Ok(Patch {
            changed: change_set.changed_ranges(),
            selection: self.selection.clone(),
            version: self.version,
            doc_changed,
            origin,
        })
    }

    /// Dispatch the transaction an operation produced.
    ///
    /// Returns false when the operation declined (`None`) or the
    /// transaction was refused.
    pub fn run(&mut self, transaction: Option<Transaction>) -> bool {
        self.run_patch(transaction).is_some()
    }

    /// Like [`Document::run`] but hands back the patch for observers.
    pub fn run_patch(&mut self, transaction: Option<Transaction>) -> Option<Patch> {
        let transaction = transaction?;
        let origin = transaction.origin;
        match self.dispatch(transaction) {
            Ok(patch) => Some(patch),
            Err(err) => {
                log::debug!("{origin:?} transaction refused: {err}");
                None
            }
        }
    }

    /// Replace the selection (origin [`Origin::Select`]).
    pub fn set_selection(&mut self, selection: Selection) -> Patch {
        let previous = self.selection.clone();
        self.selection = boundary::enforce_selection(
            self.index.blocks(),
            &selection,
            &previous,
            Origin::Select,
            self.len_chars(),
        );
        self.version += 1;
        Patch {
            changed: Vec::new(),
            selection: self.selection.clone(),
            version: self.version,
            doc_changed: false,
            origin: Origin::Select,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Text of `span`, clamped to the document.
    pub fn slice(&self, span: Span) -> String {
        let len = self.len_chars();
        let end = span.end.min(len);
        let start = span.start.min(end);
        self.buffer.slice(start..end).to_string()
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.buffer.get_char(pos)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    pub fn blocks(&self) -> &[Block] {
        self.index.blocks()
    }

    /// Index of the block holding the main cursor.
    pub fn current_block_index(&self) -> usize {
        self.index.position_at(self.selection.main().head)
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.index.get(self.current_block_index())
    }

    pub fn block_content(&self, block: &Block) -> String {
        self.slice(block.content)
    }

    /// Language for new blocks and undecodable headers.
    pub fn default_language(&self) -> &'static str {
        self.default_language
    }

    /// Whether new blocks start with auto-detection on.
    pub fn default_auto(&self) -> bool {
        self.default_auto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Splice;
    use crate::parsing::invariants;
    use pretty_assertions::assert_eq;

    // [0,9) text [9,12) "abc" | [12,21) json [21,23) "{}"
    const DOC: &str = "\n∞∞∞text\nabc\n∞∞∞json\n{}";

    fn typing(at: usize, text: &str) -> Transaction {
        Transaction::new(Origin::Input)
            .with_change(Splice::insert(at, text))
            .with_selection(Selection::cursor(at + text.chars().count()))
    }

    #[test]
    fn new_document_puts_cursor_at_end() {
        let doc = Document::new(DOC);
        assert_eq!(doc.selection(), &Selection::cursor(23));
        assert_eq!(doc.version(), 0);
        invariants::check(doc.len_chars(), doc.blocks());
    }

    #[test]
    fn empty_document_is_one_empty_block() {
        let doc = Document::new("");
        assert_eq!(doc.blocks(), &[Block::headerless(0, 0, "text")]);
        assert_eq!(doc.selection(), &Selection::cursor(0));
    }

    #[test]
    fn typing_updates_text_blocks_and_version() {
        let mut doc = Document::new(DOC);
        let patch = doc.dispatch(typing(12, "d")).unwrap();

        assert_eq!(doc.text(), "\n∞∞∞text\nabcd\n∞∞∞json\n{}");
        assert_eq!(doc.blocks()[0].content, Span::new(9, 13));
        assert_eq!(patch.changed, vec![Span::new(12, 13)]);
        assert_eq!(patch.selection, Selection::cursor(13));
        assert!(patch.doc_changed);
        assert_eq!(patch.version, 1);
        invariants::check(doc.len_chars(), doc.blocks());
    }

    #[test]
    fn refused_transaction_changes_nothing() {
        let mut doc = Document::new(DOC);
        let err = doc.dispatch(typing(15, "x")).unwrap_err();

        assert!(matches!(err, EditError::SplitsDelimiter { .. }));
        assert_eq!(doc.text(), DOC);
        assert_eq!(doc.version(), 0);
        assert!(!doc.run(Some(typing(0, "x"))));
        assert_eq!(doc.text(), DOC);
    }

    #[test]
    fn backspace_into_header_merges_blocks() {
        let mut doc = Document::new(DOC);
        doc.set_selection(Selection::cursor(21));
        let patch = doc
            .dispatch(
                Transaction::new(Origin::Delete)
                    .with_change(Splice::delete(Span::new(20, 21)))
                    .with_selection(Selection::cursor(20)),
            )
            .unwrap();

        assert_eq!(doc.text(), "\n∞∞∞text\nabc{}");
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(patch.selection, Selection::cursor(12));
    }

    #[test]
    fn mapped_selection_follows_insertions() {
        let mut doc = Document::new(DOC);
        doc.set_selection(Selection::cursor(22));
        doc.dispatch(Transaction::new(Origin::Paste).with_change(Splice::insert(22, "xy")))
            .unwrap();
        assert_eq!(doc.selection(), &Selection::cursor(24));
    }

    #[test]
    fn selection_only_transaction_keeps_blocks() {
        let mut doc = Document::new(DOC);
        let index_version = doc.index().version();
        let patch = doc
            .dispatch(Transaction::select(Selection::cursor(10), Origin::Navigate))
            .unwrap();

        assert!(!patch.doc_changed);
        assert_eq!(doc.index().version(), index_version);
        assert_eq!(doc.selection(), &Selection::cursor(10));
    }

    #[test]
    fn current_block_follows_cursor() {
        let mut doc = Document::new(DOC);
        assert_eq!(doc.current_block_index(), 1);
        doc.set_selection(Selection::cursor(12));
        assert_eq!(doc.current_block_index(), 0);
        assert_eq!(doc.block_content(&doc.blocks()[0]), "abc");
    }

    #[test]
    fn selection_into_a_header_skips_past_it() {
        let mut doc = Document::new(DOC);
        doc.set_selection(Selection::cursor(10));
        doc.set_selection(Selection::single(10, 15));
        assert_eq!(doc.selection(), &Selection::single(10, 21));
    }

    #[test]
    fn unknown_default_language_falls_back() {
        let settings = EditorSettings {
            default_language: "klingon".to_string(),
            default_auto_detect: false,
        };
        let doc = Document::with_settings("plain", &settings);
        assert_eq!(doc.default_language(), "text");
        assert!(!doc.default_auto());
        assert_eq!(doc.blocks()[0].language.name, "text");
    }
}
