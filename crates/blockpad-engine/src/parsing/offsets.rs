/// Converts byte offsets to char offsets for one text.
///
/// Callers ask for offsets in increasing order, so each conversion only
/// counts the chars between the previous offset and the new one. Asking for
/// an earlier offset restarts the count from the beginning.
pub(crate) struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Char offset of `byte`, which must lie on a char boundary.
    pub(crate) fn to_char(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}
