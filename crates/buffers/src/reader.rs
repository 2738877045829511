//! Byte reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A reader over an owned byte buffer.
///
/// The reader keeps a cursor and never moves backwards on its own; callers
/// that need lookahead use [`Reader::peek`] before committing with
/// [`Reader::read_byte`].
///
/// # Example
///
/// ```
/// use json_chain_buffers::Reader;
///
/// let mut reader = Reader::new(b" [1]".to_vec());
/// reader.skip_whitespace();
/// assert_eq!(reader.peek(), Some(b'['));
/// assert_eq!(reader.read_byte(), Ok(b'['));
/// assert_eq!(reader.position(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Reader {
    /// The underlying bytes.
    pub uint8: Vec<u8>,
    /// Current cursor position.
    pub x: usize,
}

impl Reader {
    /// Creates a reader positioned at the start of `uint8`.
    pub fn new(uint8: Vec<u8>) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.x >= self.uint8.len()
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Peeks at the current byte without advancing the cursor.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.uint8.get(self.x).copied()
    }

    /// Reads one byte, failing once the input is exhausted.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, BufferError> {
        let b = self.peek().ok_or(BufferError::EndOfBuffer(self.x))?;
        self.x += 1;
        Ok(b)
    }

    /// Advances the cursor by `length` bytes, clamped to the end.
    pub fn skip(&mut self, length: usize) {
        self.x = (self.x + length).min(self.uint8.len());
    }

    /// Skips JSON insignificant whitespace.
    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.x += 1;
        }
    }

    /// Returns the bytes between two absolute offsets.
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.uint8.len());
        &self.uint8[start.min(end)..end]
    }

    /// Returns the bytes between two absolute offsets as UTF-8, if valid.
    pub fn utf8(&self, start: usize, end: usize) -> Option<&str> {
        str::from_utf8(self.slice(start, end)).ok()
    }
}

impl From<Vec<u8>> for Reader {
    fn from(uint8: Vec<u8>) -> Self {
        Self::new(uint8)
    }
}

impl From<&str> for Reader {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_byte() {
        let mut reader = Reader::new(vec![0x01, 0x02]);
        assert_eq!(reader.read_byte(), Ok(0x01));
        assert_eq!(reader.read_byte(), Ok(0x02));
        assert_eq!(reader.read_byte(), Err(BufferError::EndOfBuffer(2)));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let reader = Reader::from("ab");
        assert_eq!(reader.peek(), Some(b'a'));
        assert_eq!(reader.peek(), Some(b'a'));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut reader = Reader::from(" \t\r\n x");
        reader.skip_whitespace();
        assert_eq!(reader.peek(), Some(b'x'));
        reader.skip(1);
        reader.skip_whitespace();
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_skip_clamps() {
        let mut reader = Reader::from("abc");
        reader.skip(10);
        assert!(reader.is_at_end());
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_utf8_slice() {
        let reader = Reader::from("\"café\"");
        assert_eq!(reader.utf8(1, 6), Some("café"));
        assert_eq!(reader.slice(4, 100), "é\"".as_bytes());
    }
}
