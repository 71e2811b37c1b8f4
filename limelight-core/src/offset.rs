//! Char/byte offset conversion
//!
//! Annotations count chars; Rust slices by bytes. A [`CharIndex`] is built
//! once per text and answers both directions.

use alloc::vec::Vec;

/// Lookup table between char offsets and byte offsets of one text
#[derive(Debug, Clone)]
pub struct CharIndex {
    /// Byte offset of every char boundary, including the end of text.
    /// Empty for ASCII text, where both offsets coincide.
    boundaries: Vec<usize>,
    byte_len: usize,
    char_len: usize,
}

impl CharIndex {
    /// Index `text`
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                boundaries: Vec::new(),
                byte_len: text.len(),
                char_len: text.len(),
            };
        }

        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self {
            char_len: boundaries.len() - 1,
            boundaries,
            byte_len: text.len(),
        }
    }

    /// Number of chars in the text
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Byte offset of the char boundary at `char_offset`
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        if char_offset > self.char_len {
            return None;
        }
        if self.boundaries.is_empty() {
            return Some(char_offset);
        }
        self.boundaries.get(char_offset).copied()
    }

    /// Char offset of the char boundary at `byte_offset`
    ///
    /// Returns `None` when `byte_offset` falls inside a multi-byte char or past
    /// the end.
    pub fn char_offset(&self, byte_offset: usize) -> Option<usize> {
        if byte_offset > self.byte_len {
            return None;
        }
        if self.boundaries.is_empty() {
            return Some(byte_offset);
        }
        self.boundaries.binary_search(&byte_offset).ok()
    }

    /// Slice `text` by char offsets
    pub fn slice<'t>(&self, text: &'t str, start: usize, end: usize) -> Option<&'t str> {
        let start = self.byte_offset(start)?;
        let end = self.byte_offset(end)?;
        text.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_identity() {
        let index = CharIndex::new("hello");
        assert_eq!(index.char_len(), 5);
        assert_eq!(index.byte_offset(3), Some(3));
        assert_eq!(index.char_offset(5), Some(5));
        assert_eq!(index.byte_offset(6), None);
    }

    #[test]
    fn test_multibyte() {
        let text = "café €50";
        let index = CharIndex::new(text);
        assert_eq!(index.char_len(), 8);
        assert_eq!(index.byte_offset(4), Some(5));
        assert_eq!(index.char_offset(5), Some(4));
        // inside the 'é'
        assert_eq!(index.char_offset(4), None);
        assert_eq!(index.slice(text, 5, 8), Some("€50"));
    }

    #[test]
    fn test_empty_text() {
        let index = CharIndex::new("");
        assert_eq!(index.char_len(), 0);
        assert_eq!(index.byte_offset(0), Some(0));
    }
}
