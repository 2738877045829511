//! Byte buffers used by the json-chain codec.
//!
//! [`Reader`] owns the input of a read session and hands bytes out one at a
//! time, [`Writer`] is the default growable output sink.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A byte was requested at or past the end of the input.
    #[error("input exhausted at offset {0}")]
    EndOfBuffer(usize),
}
