//! Growable output buffer.

use std::{io, mem};

/// An in-memory byte sink that grows automatically.
///
/// `Writer` is the default sink of a codec session. [`Writer::take`] hands
/// the pending bytes to the caller and leaves the writer empty, so a
/// long-lived session does not keep text that was already collected.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use json_chain_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.write_all(b"[1,2]").unwrap();
/// assert_eq!(writer.as_slice(), b"[1,2]");
/// assert_eq!(writer.take(), b"[1,2]");
/// assert!(writer.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default capacity (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4 * 1024)
    }

    /// Creates a new writer with a custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of pending bytes.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Bytes written since construction or the last [`Writer::take`].
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Returns the pending bytes and empties the writer.
    pub fn take(&mut self) -> Vec<u8> {
        mem::take(&mut self.uint8)
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
