//! # Block parsing
//!
//! Turns the full document text into the ordered block list. Two
//! strategies exist:
//!
//! - [`TreeStrategy`] reads a [`blockpad_syntax`] tree built over the same
//!   text. It declines (returns `None`) when the tree is missing, out of
//!   date, or holds an `ERROR` node.
//! - [`ScanStrategy`] walks the text looking for the header marker. It
//!   always succeeds and is the reference behaviour.
//!
//! [`BlockParser`] tries its strategies in order and records which one
//! produced the result.
//!
//! ```
//! use blockpad_engine::parsing::{BlockParser, ParseInput, Span};
//!
//! let text = "\n∞∞∞text\nhello";
//! let tree = blockpad_syntax::parse(text);
//! let outcome = BlockParser::new().parse(&ParseInput::new(text, "text").with_tree(&tree));
//!
//! assert_eq!(outcome.strategy, "tree");
//! assert_eq!(outcome.blocks[0].delimiter, Span::new(0, 9));
//! assert_eq!(outcome.blocks[0].content, Span::new(9, 14));
//! ```

pub mod invariants;
mod offsets;
mod span;
pub mod strategy;

use blockpad_syntax::SyntaxNode;

pub use span::Span;
pub use strategy::{BlockStrategy, ScanStrategy, TreeStrategy};

/// A block's language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockLanguage {
    /// Registry token.
    pub name: String,
    /// Whether the detector may change the language.
    pub auto: bool,
}

impl BlockLanguage {
    pub fn new(name: impl Into<String>, auto: bool) -> Self {
        Self {
            name: name.into(),
            auto,
        }
    }
}

/// One language-tagged region of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub language: BlockLanguage,
    /// The header line. Empty only for a leading block in front of the
    /// first header.
    pub delimiter: Span,
    /// The editable body, directly after the header.
    pub content: Span,
    /// `[delimiter.start, content.end)`
    pub range: Span,
}

impl Block {
    pub fn new(language: BlockLanguage, delimiter: Span, content: Span) -> Self {
        Self {
            language,
            delimiter,
            content,
            range: Span::new(delimiter.start, content.end),
        }
    }

    /// A block with no header covering `[start, end)`.
    pub fn headerless(start: usize, end: usize, default_language: &str) -> Self {
        Self::new(
            BlockLanguage::new(default_language, false),
            Span::point(start),
            Span::new(start, end),
        )
    }

    pub fn has_header(&self) -> bool {
        !self.delimiter.is_empty()
    }
}

/// Everything a strategy may look at.
#[derive(Clone, Copy)]
pub struct ParseInput<'a> {
    pub text: &'a str,
    pub tree: Option<&'a SyntaxNode>,
    /// Language for headerless blocks and undecodable headers.
    pub default_language: &'a str,
}

impl<'a> ParseInput<'a> {
    pub fn new(text: &'a str, default_language: &'a str) -> Self {
        Self {
            text,
            tree: None,
            default_language,
        }
    }

    pub fn with_tree(mut self, tree: &'a SyntaxNode) -> Self {
        self.tree = Some(tree);
        self
    }
}

/// Blocks plus the name of the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub blocks: Vec<Block>,
    pub strategy: &'static str,
}

/// Ordered list of strategies, tried until one succeeds.
pub struct BlockParser {
    strategies: Vec<Box<dyn BlockStrategy>>,
}

impl BlockParser {
    /// Tree strategy first, scan as the fallback.
    pub fn new() -> Self {
        Self::with_strategies(vec![Box::new(TreeStrategy), Box::new(ScanStrategy)])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn BlockStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn parse(&self, input: &ParseInput<'_>) -> ParseOutcome {
        for strategy in &self.strategies {
            if let Some(blocks) = strategy.try_parse(input) {
                return ParseOutcome {
                    blocks,
                    strategy: strategy.name(),
                };
            }
            log::debug!("{} strategy declined, falling back", strategy.name());
        }

        // Only reachable with a strategy list that lacks the scan.
        ParseOutcome {
            blocks: strategy::scan(input.text, input.default_language),
            strategy: ScanStrategy.name(),
        }
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `text` the way the block index does: build the syntax tree, then
/// run the default strategy list.
pub fn parse_blocks(text: &str, default_language: &str) -> ParseOutcome {
    let tree = blockpad_syntax::parse(text);
    BlockParser::new().parse(&ParseInput::new(text, default_language).with_tree(&tree))
}
