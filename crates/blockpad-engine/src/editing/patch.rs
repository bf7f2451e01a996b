use crate::editing::{Origin, Selection};
use crate::parsing::Span;

/// Result of a dispatched transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Inserted text ranges, in the new document.
    pub changed: Vec<Span>,
    pub selection: Selection,
    pub version: u64,
    /// False for selection-only transactions.
    pub doc_changed: bool,
    pub origin: Origin,
}
