use blockpad_syntax::{SyntaxKind, SyntaxNode};

use crate::delimiter;
use crate::parsing::offsets::CharCursor;
use crate::parsing::{Block, BlockLanguage, ParseInput, Span};

use super::BlockStrategy;

/// Reads block boundaries off a prebuilt syntax tree.
pub struct TreeStrategy;

impl BlockStrategy for TreeStrategy {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn try_parse(&self, input: &ParseInput<'_>) -> Option<Vec<Block>> {
        let tree = input.tree?;

        let tree_len = u32::from(tree.text_range().len()) as usize;
        if tree_len != input.text.len() {
            log::debug!(
                "syntax tree covers {tree_len} bytes, document has {}",
                input.text.len()
            );
            return None;
        }
        if tree.descendants().any(|n| n.kind() == SyntaxKind::ERROR) {
            log::debug!("syntax tree has error nodes");
            return None;
        }

        let mut cursor = CharCursor::new(input.text);
        let mut blocks = Vec::new();
        for (i, node) in tree.children().enumerate() {
            if node.kind() != SyntaxKind::BLOCK {
                return None;
            }
            blocks.push(read_block(&node, i == 0, input, &mut cursor)?);
        }

        (!blocks.is_empty()).then_some(blocks)
    }
}

fn read_block(
    node: &SyntaxNode,
    first: bool,
    input: &ParseInput<'_>,
    cursor: &mut CharCursor<'_>,
) -> Option<Block> {
    let mut header = None;
    let mut body = None;
    for child in node.children() {
        match child.kind() {
            SyntaxKind::DELIMITER if header.is_none() && body.is_none() => header = Some(child),
            SyntaxKind::CONTENT if body.is_none() => body = Some(child),
            _ => return None,
        }
    }
    let body = body?;

    let (language, delimiter) = match header {
        Some(header) => {
            let (start, end) = byte_bounds(&header);
            let text = input.text.get(start..end)?;
            let language = delimiter::decode(text, input.default_language)
                .unwrap_or_else(|| BlockLanguage::new(input.default_language, false));
            (language, Span::new(cursor.to_char(start), cursor.to_char(end)))
        }
        // Only the leading block may lack a header.
        None if first => (
            BlockLanguage::new(input.default_language, false),
            Span::point(0),
        ),
        None => return None,
    };

    let (start, end) = byte_bounds(&body);
    input.text.get(start..end)?;
    let content = Span::new(cursor.to_char(start), cursor.to_char(end));
    if content.start != delimiter.end {
        return None;
    }

    Some(Block::new(language, delimiter, content))
}

fn byte_bounds(node: &SyntaxNode) -> (usize, usize) {
    let range = node.text_range();
    (
        u32::from(range.start()) as usize,
        u32::from(range.end()) as usize,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> Option<Vec<Block>> {
        let tree = blockpad_syntax::parse(text);
        TreeStrategy.try_parse(&ParseInput::new(text, "text").with_tree(&tree))
    }

    #[test]
    fn declines_without_tree() {
        assert_eq!(TreeStrategy.try_parse(&ParseInput::new("abc", "text")), None);
    }

    #[test]
    fn declines_on_stale_tree() {
        let tree = blockpad_syntax::parse("\n∞∞∞text\nhello");
        let input = ParseInput::new("\n∞∞∞text\nhello!", "text").with_tree(&tree);
        assert_eq!(TreeStrategy.try_parse(&input), None);
    }

    #[test]
    fn declines_on_glued_headers() {
        assert_eq!(run("\n∞∞∞text\n∞∞∞json\n"), None);
    }

    #[test]
    fn declines_on_empty_document() {
        assert_eq!(run(""), None);
    }

    #[test]
    fn reads_leading_and_headed_blocks() {
        let blocks = run("intro\n∞∞∞python-a\nprint(1)").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].delimiter, Span::point(0));
        assert_eq!(blocks[0].content, Span::new(0, 5));
        assert_eq!(blocks[1].delimiter, Span::new(5, 18));
        assert_eq!(blocks[1].content, Span::new(18, 26));
        assert_eq!(blocks[1].language, BlockLanguage::new("python", true));
    }
}
