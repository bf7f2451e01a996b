use crate::delimiter::{self, MARKER};
use crate::parsing::offsets::CharCursor;
use crate::parsing::{Block, BlockLanguage, ParseInput, Span};

use super::BlockStrategy;

/// Left-to-right marker scan. Never declines.
pub struct ScanStrategy;

impl BlockStrategy for ScanStrategy {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn try_parse(&self, input: &ParseInput<'_>) -> Option<Vec<Block>> {
        Some(scan(input.text, input.default_language))
    }
}

/// Split `text` at header lines.
///
/// A header runs from a marker to the next line break. A marker with no line
/// break after it ends the scan; the rest of the text stays in the block
/// before it.
pub(crate) fn scan(text: &str, default_language: &str) -> Vec<Block> {
    let mut cursor = CharCursor::new(text);
    let Some(first) = text.find(MARKER) else {
        let len = cursor.to_char(text.len());
        return vec![Block::headerless(0, len, default_language)];
    };

    let mut blocks = Vec::new();
    if first > 0 {
        let end = cursor.to_char(first);
        blocks.push(Block::headerless(0, end, default_language));
    }

    let mut marker = first;
    loop {
        let header_body = marker + MARKER.len();
        let Some(newline) = text[header_body..].find('\n') else {
            let len = cursor.to_char(text.len());
            match blocks.last_mut() {
                Some(last) => {
                    last.content.end = len;
                    last.range.end = len;
                }
                None => blocks.push(Block::headerless(0, len, default_language)),
            }
            break;
        };

        let header_end = header_body + newline + 1;
        let next = text[header_end..].find(MARKER).map(|i| header_end + i);
        let content_end = next.unwrap_or(text.len());

        let language = delimiter::decode(&text[marker..header_end], default_language)
            .unwrap_or_else(|| BlockLanguage::new(default_language, false));
        let delimiter = Span::new(cursor.to_char(marker), cursor.to_char(header_end));
        let content = Span::new(delimiter.end, cursor.to_char(content_end));
        blocks.push(Block::new(language, delimiter, content));

        match next {
            Some(next) => marker = next,
            None => break,
        }
    }

    blocks
}
