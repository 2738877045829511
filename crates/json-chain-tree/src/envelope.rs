//! Status envelopes of loosely typed web API responses.
//!
//! Many JSON APIs wrap their payload as
//! `{"status": 0, "msg": "...", "result": {...}}` and signal failure with a
//! non-zero status. [`Envelope`] performs that check on a decoded tree.

use thiserror::Error;

use crate::{decode, DecodeError, JsonNode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("status {code}: {message}")]
    Status { code: i64, message: String },
    #[error("response decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Names of the status, message and result members of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'k> {
    pub status_key: &'k str,
    pub message_key: &'k str,
    pub result_key: &'k str,
}

impl Default for Envelope<'static> {
    fn default() -> Self {
        Self::new("status", "msg", "result")
    }
}

impl<'k> Envelope<'k> {
    pub fn new(status_key: &'k str, message_key: &'k str, result_key: &'k str) -> Self {
        Self {
            status_key,
            message_key,
            result_key,
        }
    }

    /// Checks the status of `response` and returns its result member.
    ///
    /// A missing or non-numeric status counts as success. The result may be
    /// [`JsonNode::Missing`] when the response carries none.
    pub fn open<'a>(&self, response: &'a JsonNode) -> Result<&'a JsonNode, EnvelopeError> {
        if response.as_object().is_none() {
            return Err(EnvelopeError::NotAnObject);
        }
        let code = response[self.status_key].to_int().unwrap_or(0);
        if code != 0 {
            let message = response[self.message_key].to_text().unwrap_or_default();
            return Err(EnvelopeError::Status { code, message });
        }
        Ok(&response[self.result_key])
    }

    /// Decodes `text` and opens the envelope, returning an owned result.
    pub fn decode(&self, text: &str) -> Result<JsonNode, EnvelopeError> {
        let mut response = decode(text)?;
        self.open(&response)?;
        Ok(match &mut response {
            JsonNode::Object(map) => map.remove(self.result_key).unwrap_or_default(),
            _ => JsonNode::Missing,
        })
    }
}
