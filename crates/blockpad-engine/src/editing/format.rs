//! The seam for code formatters. No formatter ships with the engine.

use crate::editing::{Document, Origin, Selection, Splice, Transaction};

/// What a formatter is asked to format: the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRequest<'a> {
    pub language: &'a str,
    pub content: &'a str,
    /// Cursor offset into `content`, in chars.
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    /// Cursor offset into `text`, in chars.
    pub cursor: usize,
}

pub trait Formatter {
    /// `None` for unsupported languages or content that does not parse.
    fn format(&self, request: &FormatRequest<'_>) -> Option<Formatted>;
}

/// Replace the current block's content with its formatted version.
pub fn format_block(doc: &Document, formatter: &dyn Formatter) -> Option<Transaction> {
    let block = doc.current_block()?;
    let content = doc.slice(block.content);
    let request = FormatRequest {
        language: &block.language.name,
        content: &content,
        cursor: block.content.clamp(doc.selection().main().head) - block.content.start,
    };

    let formatted = formatter.format(&request)?;
    if formatted.text == content {
        return None;
    }
    let cursor = block.content.start + formatted.cursor.min(formatted.text.chars().count());

    Some(
        Transaction::new(Origin::Format)
            .with_change(Splice::replace(block.content, formatted.text))
            .with_selection(Selection::cursor(cursor)),
    )
}
