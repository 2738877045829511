//! JSON text to [`JsonNode`] tree decoding.

use std::collections::HashMap;

use json_chain_buffers::Reader;

use crate::lex::{self, Number};
use crate::{DecodeError, JsonNode};

/// Nesting limit used by [`decode`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Recursive-descent decoder producing untyped trees.
///
/// The decoder is not a validator: it accepts anything it can make sense of
/// (leading zeros, for instance) and rejects only what it cannot.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_depth: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Decodes a complete document. Only whitespace may follow the value.
    pub fn decode(&self, input: &[u8]) -> Result<JsonNode, DecodeError> {
        let mut reader = Reader::new(input.to_vec());
        let node = self.read_any(&mut reader)?;
        reader.skip_whitespace();
        if !reader.is_at_end() {
            return Err(DecodeError::TrailingCharacters(reader.position()));
        }
        Ok(node)
    }

    /// Reads exactly one value starting at the reader's cursor.
    pub fn read_any(&self, reader: &mut Reader) -> Result<JsonNode, DecodeError> {
        self.read_at(reader, 0)
    }

    fn read_at(&self, reader: &mut Reader, depth: usize) -> Result<JsonNode, DecodeError> {
        match lex::peek_token(reader)? {
            b'"' => lex::read_string(reader).map(JsonNode::Str),
            b'[' => self.read_arr(reader, depth + 1),
            b'{' => self.read_obj(reader, depth + 1),
            b't' | b'f' => lex::read_bool(reader).map(JsonNode::Bool),
            b'n' => lex::read_literal(reader, b"null").map(|_| JsonNode::Null),
            b'-' | b'0'..=b'9' => Ok(match lex::read_number(reader)? {
                Number::Integer(i) => JsonNode::Integer(i),
                Number::UInteger(u) => JsonNode::UInteger(u),
                Number::Float(f) => JsonNode::Float(f),
            }),
            byte => Err(DecodeError::Unexpected {
                byte,
                offset: reader.position(),
            }),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::TooDeep(self.max_depth));
        }
        Ok(())
    }

    fn read_arr(&self, reader: &mut Reader, depth: usize) -> Result<JsonNode, DecodeError> {
        self.check_depth(depth)?;
        lex::expect_byte(reader, b'[')?;
        let mut arr = Vec::new();
        loop {
            if lex::peek_token(reader)? == b']' {
                reader.skip(1);
                return Ok(JsonNode::Array(arr));
            }
            if !arr.is_empty() {
                lex::expect_byte(reader, b',')?;
            }
            arr.push(self.read_at(reader, depth)?);
        }
    }

    fn read_obj(&self, reader: &mut Reader, depth: usize) -> Result<JsonNode, DecodeError> {
        self.check_depth(depth)?;
        lex::expect_byte(reader, b'{')?;
        let mut obj = HashMap::new();
        let mut first = true;
        loop {
            if lex::peek_token(reader)? == b'}' {
                reader.skip(1);
                return Ok(JsonNode::Object(obj));
            }
            if !first {
                lex::expect_byte(reader, b',')?;
                lex::peek_token(reader)?;
            }
            let key = lex::read_string(reader)?;
            lex::peek_token(reader)?;
            lex::expect_byte(reader, b':')?;
            let val = self.read_at(reader, depth)?;
            obj.insert(key, val);
            first = false;
        }
    }
}

/// Decodes JSON text into a generic tree.
pub fn decode(text: &str) -> Result<JsonNode, DecodeError> {
    decode_bytes(text.as_bytes())
}

/// Decodes UTF-8 JSON bytes into a generic tree.
pub fn decode_bytes(input: &[u8]) -> Result<JsonNode, DecodeError> {
    Decoder::new().decode(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode("null").unwrap(), JsonNode::Null);
        assert_eq!(decode(" true ").unwrap(), JsonNode::Bool(true));
        assert_eq!(decode("-7").unwrap(), JsonNode::Integer(-7));
        assert_eq!(decode("0.25").unwrap(), JsonNode::Float(0.25));
        assert_eq!(decode("\"hi\"").unwrap(), JsonNode::Str("hi".into()));
    }

    #[test]
    fn test_decode_empty_containers() {
        assert_eq!(decode("[]").unwrap(), JsonNode::Array(vec![]));
        assert_eq!(decode("{ }").unwrap(), JsonNode::Object(HashMap::new()));
    }

    #[test]
    fn test_decode_nested() {
        let node = decode(r#"{"a": [1, {"b": null}], "c": "d"}"#).unwrap();
        assert_eq!(node["a"][0], JsonNode::Integer(1));
        assert!(node["a"][1]["b"].is_null());
        assert_eq!(node["c"].as_str(), Some("d"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let node = decode(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(node["a"], JsonNode::Integer(2));
    }

    #[test]
    fn test_trailing_characters() {
        assert_eq!(decode("1 2"), Err(DecodeError::TrailingCharacters(2)));
    }

    #[test]
    fn test_missing_comma() {
        assert_eq!(
            decode("[1 2]"),
            Err(DecodeError::Unexpected { byte: b'2', offset: 3 })
        );
    }

    #[test]
    fn test_unexpected_byte() {
        assert_eq!(
            decode("  @"),
            Err(DecodeError::Unexpected { byte: b'@', offset: 2 })
        );
    }

    #[test]
    fn test_truncated() {
        assert_eq!(decode("{\"a\":"), Err(DecodeError::EndOfInput(5)));
        assert_eq!(decode(""), Err(DecodeError::EndOfInput(0)));
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(10) + &"]".repeat(10);
        assert!(Decoder::with_max_depth(10).decode(deep.as_bytes()).is_ok());
        assert_eq!(
            Decoder::with_max_depth(9).decode(deep.as_bytes()),
            Err(DecodeError::TooDeep(9))
        );
    }

    #[test]
    fn test_read_any_leaves_cursor_after_value() {
        let mut reader = Reader::from(r#"{"skip":[1,2]},"next""#);
        let node = Decoder::new().read_any(&mut reader).unwrap();
        assert_eq!(node["skip"][1], JsonNode::Integer(2));
        assert_eq!(reader.peek(), Some(b','));
    }
}
