use json_chain_buffers::BufferError;
use json_chain_tree::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    /// No handler in the chain claims the value or the target shape.
    #[error("no handler claims shape `{0}`")]
    UnsupportedShape(String),
    /// A token is present but cannot be converted to the target shape.
    #[error("expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },
    /// `read` exhausted the chain without reconstructing a value.
    #[error("read failed for shape `{0}`")]
    ReadFailed(String),
    #[error("input stream exhausted at offset {0}")]
    StreamExhausted(usize),
    #[error("nesting depth exceeded the maximum of {0}")]
    DepthExceeded(usize),
    #[error("malformed JSON: {0}")]
    Syntax(DecodeError),
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl JsonError {
    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        JsonError::ShapeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl From<BufferError> for JsonError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer(offset) => JsonError::StreamExhausted(offset),
        }
    }
}

impl From<DecodeError> for JsonError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::EndOfInput(offset) => JsonError::StreamExhausted(offset),
            DecodeError::TooDeep(max) => JsonError::DepthExceeded(max),
            other => JsonError::Syntax(other),
        }
    }
}
