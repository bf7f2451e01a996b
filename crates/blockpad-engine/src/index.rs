//! The authoritative block list for the current text.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::editing::ChangeSet;
use crate::parsing::{Block, BlockParser, ParseInput, Span};

/// Identity of a block that survives edits elsewhere in the document, block
/// moves and language changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of the block holding `pos`. A position on the boundary between two
/// blocks belongs to the earlier one.
pub(crate) fn locate(blocks: &[Block], pos: usize) -> usize {
    blocks
        .partition_point(|b| b.range.end < pos)
        .min(blocks.len().saturating_sub(1))
}

/// Hash of each block's content text.
fn content_fingerprints(text: &str, blocks: &[Block]) -> Vec<u64> {
    let mut offsets = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .enumerate();
    let mut current = offsets.next();
    let mut to_byte = |pos: usize| {
        while let Some((char_pos, _)) = current
            && char_pos < pos
        {
            current = offsets.next();
        }
        current.map_or(text.len(), |(_, byte)| byte)
    };

    blocks
        .iter()
        .map(|block| {
            let start = to_byte(block.content.start);
            let end = to_byte(block.content.end);
            let mut hasher = DefaultHasher::new();
            text[start..end].hash(&mut hasher);
            hasher.finish()
        })
        .collect()
}

/// Versioned block list, ids alongside.
///
/// The list is replaced wholesale whenever the text changes; it is never
/// patched in place.
pub struct BlockIndex {
    parser: BlockParser,
    default_language: &'static str,
    blocks: Vec<Block>,
    ids: Vec<BlockId>,
    fingerprints: Vec<u64>,
    next_id: u64,
    version: u64,
    strategy: &'static str,
}

impl BlockIndex {
    pub fn new(default_language: &'static str) -> Self {
        Self::with_parser(BlockParser::new(), default_language)
    }

    pub fn with_parser(parser: BlockParser, default_language: &'static str) -> Self {
        Self {
            parser,
            default_language,
            blocks: Vec::new(),
            ids: Vec::new(),
            fingerprints: Vec::new(),
            next_id: 0,
            version: 0,
            strategy: "none",
        }
    }

    /// Drop the current list and parse `text` from scratch with fresh ids.
    pub fn rebuild(&mut self, text: &str) {
        self.blocks.clear();
        self.ids.clear();
        self.fingerprints.clear();
        self.update(text, &ChangeSet::default());
    }

    /// Bring the list up to date after `changes` produced `text`.
    ///
    /// Reparses only when the text changed or there is no list yet. Returns
    /// whether a reparse happened.
    pub fn update(&mut self, text: &str, changes: &ChangeSet) -> bool {
        if changes.is_empty() && !self.blocks.is_empty() {
            return false;
        }

        let tree = blockpad_syntax::parse(text);
        let input = ParseInput::new(text, self.default_language).with_tree(&tree);
        let outcome = self.parser.parse(&input);

        let fingerprints = content_fingerprints(text, &outcome.blocks);
        self.ids = self.carry_ids(&outcome.blocks, &fingerprints, changes);
        self.fingerprints = fingerprints;
        self.blocks = outcome.blocks;
        self.strategy = outcome.strategy;
        self.version += 1;
        true
    }

    /// Ids for `blocks`.
    ///
    /// A new block takes the id of the old block whose header maps onto its
    /// header through `changes`. Blocks left over are matched by identical
    /// content, which covers moves. Everything else gets a fresh id.
    fn carry_ids(
        &mut self,
        blocks: &[Block],
        fingerprints: &[u64],
        changes: &ChangeSet,
    ) -> Vec<BlockId> {
        let mut survivors: HashMap<Span, BlockId> = HashMap::new();
        let mut headerless = None;
        for (old, id) in self.blocks.iter().zip(&self.ids) {
            if !old.has_header() {
                headerless = Some(*id);
            } else if let Some(span) = changes.map_span(old.delimiter) {
                survivors.insert(span, *id);
            }
        }

        let mut ids: Vec<Option<BlockId>> = blocks
            .iter()
            .map(|b| {
                if b.has_header() {
                    survivors.remove(&b.delimiter)
                } else {
                    headerless.take()
                }
            })
            .collect();

        if ids.iter().any(Option::is_none) {
            let taken: Vec<BlockId> = ids.iter().flatten().copied().collect();
            let mut orphans: HashMap<u64, Vec<BlockId>> = HashMap::new();
            for (id, fingerprint) in self.ids.iter().zip(&self.fingerprints).rev() {
                if !taken.contains(id) {
                    orphans.entry(*fingerprint).or_default().push(*id);
                }
            }
            for (id, fingerprint) in ids.iter_mut().zip(fingerprints) {
                if id.is_none() {
                    *id = orphans.get_mut(fingerprint).and_then(Vec::pop);
                    if *id == headerless {
                        headerless = None;
                    }
                }
            }
        }

        // A leading block that just gained a header keeps its identity.
        if let Some(first) = ids.first_mut()
            && first.is_none()
        {
            *first = headerless.take();
        }

        ids.into_iter()
            .map(|id| id.unwrap_or_else(|| self.fresh_id()))
            .collect()
    }

    fn fresh_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Block> {
        self.blocks.get(i)
    }

    pub fn first(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Index of the block holding `pos`, by binary search.
    pub fn position_at(&self, pos: usize) -> usize {
        locate(&self.blocks, pos)
    }

    pub fn block_at(&self, pos: usize) -> Option<&Block> {
        self.blocks.get(self.position_at(pos))
    }

    pub fn id_at(&self, i: usize) -> Option<BlockId> {
        self.ids.get(i).copied()
    }

    pub fn ids(&self) -> &[BlockId] {
        &self.ids
    }

    pub fn position_of(&self, id: BlockId) -> Option<usize> {
        self.ids.iter().position(|&other| other == id)
    }

    pub fn block_by_id(&self, id: BlockId) -> Option<&Block> {
        self.position_of(id).and_then(|i| self.blocks.get(i))
    }

    /// Bumped on every reparse.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Name of the strategy that produced the current list.
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Splice;
    use pretty_assertions::assert_eq;

    const DOC: &str = "\n∞∞∞text\nabc\n∞∞∞json\n{}";

    fn index(text: &str) -> BlockIndex {
        let mut index = BlockIndex::new("text");
        index.rebuild(text);
        index
    }

    fn apply(text: &str, splices: &[Splice]) -> String {
        let mut chars: Vec<char> = text.chars().collect();
        for s in splices.iter().rev() {
            chars.splice(s.range.start..s.range.end, s.insert.chars());
        }
        chars.into_iter().collect()
    }

    #[test]
    fn boundary_positions_belong_to_the_earlier_block() {
        let index = index(DOC);
        // block 0: [0,12), block 1: [12,23)
        assert_eq!(index.position_at(0), 0);
        assert_eq!(index.position_at(12), 0);
        assert_eq!(index.position_at(13), 1);
        assert_eq!(index.position_at(23), 1);
        assert_eq!(index.position_at(99), 1);
    }

    #[test]
    fn no_reparse_without_text_change() {
        let mut index = index(DOC);
        let version = index.version();
        assert!(!index.update(DOC, &ChangeSet::default()));
        assert_eq!(index.version(), version);
    }

    #[test]
    fn ids_survive_typing() {
        let mut index = index(DOC);
        let before = index.ids().to_vec();

        let splices = [Splice::insert(9, "xyz")];
        let text = apply(DOC, &splices);
        assert!(index.update(&text, &ChangeSet::new(&splices)));

        assert_eq!(index.ids(), before.as_slice());
        assert_eq!(index.strategy(), "tree");
    }

    #[test]
    fn ids_survive_language_change() {
        let mut index = index(DOC);
        let before = index.ids().to_vec();

        let splices = [Splice::replace(Span::new(12, 21), "\n∞∞∞python-a\n")];
        let text = apply(DOC, &splices);
        index.update(&text, &ChangeSet::new(&splices));

        assert_eq!(index.ids(), before.as_slice());
        assert_eq!(index.blocks()[1].language.name, "python");
    }

    #[test]
    fn inserted_block_gets_a_fresh_id() {
        let mut index = index(DOC);
        let before = index.ids().to_vec();

        // New block in front of the json block.
        let splices = [Splice::insert(12, "\n∞∞∞text\n")];
        let text = apply(DOC, &splices);
        index.update(&text, &ChangeSet::new(&splices));

        assert_eq!(index.len(), 3);
        assert_eq!(index.id_at(0), Some(before[0]));
        assert_eq!(index.id_at(2), Some(before[1]));
        assert!(!before.contains(&index.ids()[1]));
    }

    #[test]
    fn deleted_block_id_is_not_reused() {
        let mut index = index(DOC);
        let deleted = index.ids()[1];

        let splices = [Splice::delete(Span::new(12, 23))];
        let text = apply(DOC, &splices);
        index.update(&text, &ChangeSet::new(&splices));
        assert_eq!(index.position_of(deleted), None);

        let splices = [Splice::insert(12, "\n∞∞∞json\n")];
        let again = apply(&text, &splices);
        index.update(&again, &ChangeSet::new(&splices));
        assert_eq!(index.len(), 2);
        assert_ne!(index.ids()[1], deleted);
    }

    #[test]
    fn leading_block_keeps_id_when_given_a_header() {
        let text = "notes\n∞∞∞json\n{}";
        let mut index = index(text);
        let leading = index.ids()[0];

        let splices = [Splice::insert(0, "\n∞∞∞text\n")];
        let updated = apply(text, &splices);
        index.update(&updated, &ChangeSet::new(&splices));

        assert!(index.blocks()[0].has_header());
        assert_eq!(index.ids()[0], leading);
        assert_eq!(index.block_by_id(leading).map(|b| b.content), Some(Span::new(9, 14)));
    }

    #[test]
    fn ids_follow_moved_blocks() {
        let mut index = index(DOC);
        let before = index.ids().to_vec();

        // Swap the two blocks in one replacement.
        let splices = [Splice::replace(
            Span::new(0, 23),
            "\n∞∞∞json\n{}\n∞∞∞text\nabc",
        )];
        let text = apply(DOC, &splices);
        index.update(&text, &ChangeSet::new(&splices));

        assert_eq!(index.blocks()[0].language.name, "json");
        assert_eq!(index.ids(), &[before[1], before[0]]);
    }
}
