use json_chain_buffers::BufferError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected byte 0x{byte:02x} at offset {offset}")]
    Unexpected { byte: u8, offset: usize },
    #[error("unexpected end of input at offset {0}")]
    EndOfInput(usize),
    #[error("invalid number at offset {0}")]
    InvalidNumber(usize),
    #[error("invalid string at offset {0}")]
    InvalidString(usize),
    #[error("trailing characters at offset {0}")]
    TrailingCharacters(usize),
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer(offset) => DecodeError::EndOfInput(offset),
        }
    }
}
