//! The block strategies.

mod scan;
mod tree;

pub use scan::ScanStrategy;
pub use tree::TreeStrategy;

pub(crate) use scan::scan;

use super::{Block, ParseInput};

/// One way of turning a document into blocks.
pub trait BlockStrategy {
    /// Short name for logs and tests.
    fn name(&self) -> &'static str;

    /// The blocks of `input.text`, or `None` to hand over to the next
    /// strategy.
    fn try_parse(&self, input: &ParseInput<'_>) -> Option<Vec<Block>>;
}
