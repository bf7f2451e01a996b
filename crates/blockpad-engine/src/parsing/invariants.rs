use crate::language;
use crate::parsing::Block;

/// Validates the block list produced for a document of `len` chars.
///
/// Asserts that:
/// - there is at least one block
/// - blocks are contiguous, the first starting at 0 and the last ending at
///   `len`
/// - each block's header is directly followed by its content, and its range
///   spans both
/// - only the first block may have an empty header
/// - every language is a registry token
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(len: usize, blocks: &[Block]) {
    assert!(!blocks.is_empty(), "block list is empty (document len: {len})");
    assert_eq!(blocks[0].range.start, 0, "first block does not start at 0");

    let mut offset = 0;
    for (i, b) in blocks.iter().enumerate() {
        assert_eq!(
            b.range.start, offset,
            "block {i} starts at {} but previous block ended at {offset}",
            b.range.start
        );
        assert!(
            b.delimiter.start <= b.delimiter.end && b.content.start <= b.content.end,
            "block {i} has an inverted span: delimiter {}, content {}",
            b.delimiter,
            b.content
        );
        assert_eq!(
            b.delimiter.end, b.content.start,
            "block {i}: content does not follow its delimiter"
        );
        assert_eq!(
            (b.range.start, b.range.end),
            (b.delimiter.start, b.content.end),
            "block {i}: range does not span delimiter and content"
        );
        assert!(
            i == 0 || b.has_header(),
            "block {i} has an empty delimiter but is not the first block"
        );
        assert!(
            language::is_known(&b.language.name),
            "block {i} has unregistered language {:?}",
            b.language.name
        );
        offset = b.range.end;
    }

    assert_eq!(offset, len, "last block ends at {offset}, document len is {len}");
}
