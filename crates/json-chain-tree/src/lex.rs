//! Token scanners over a [`Reader`].
//!
//! Each scanner expects the reader to sit on the first byte of its token
//! (whitespace already skipped) and leaves it just past the token.

use json_chain_buffers::Reader;

use crate::DecodeError;

/// A scanned number token, kept as byte offsets so callers can parse it
/// into whatever representation their target needs without precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberToken {
    pub start: usize,
    pub end: usize,
    /// The token has a fraction or an exponent.
    pub is_float: bool,
}

impl NumberToken {
    /// Token text. Number tokens are ASCII by construction.
    pub fn text<'r>(&self, reader: &'r Reader) -> &'r str {
        reader.utf8(self.start, self.end).unwrap_or_default()
    }
}

/// Parsed numeric leaf, narrowest representation first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    UInteger(u64),
    Float(f64),
}

/// Skips whitespace and returns the next byte without consuming it.
pub fn peek_token(reader: &mut Reader) -> Result<u8, DecodeError> {
    reader.skip_whitespace();
    reader
        .peek()
        .ok_or(DecodeError::EndOfInput(reader.position()))
}

/// Consumes `expected` or fails with the byte that was found instead.
pub fn expect_byte(reader: &mut Reader, expected: u8) -> Result<(), DecodeError> {
    let offset = reader.position();
    let byte = reader.read_byte()?;
    if byte != expected {
        return Err(DecodeError::Unexpected { byte, offset });
    }
    Ok(())
}

/// Consumes an exact keyword such as `null` or `true`.
pub fn read_literal(reader: &mut Reader, literal: &[u8]) -> Result<(), DecodeError> {
    for &expected in literal {
        expect_byte(reader, expected)?;
    }
    Ok(())
}

/// Reads `true` or `false`.
pub fn read_bool(reader: &mut Reader) -> Result<bool, DecodeError> {
    let offset = reader.position();
    match reader.peek() {
        Some(b't') => read_literal(reader, b"true").map(|_| true),
        Some(b'f') => read_literal(reader, b"false").map(|_| false),
        Some(byte) => Err(DecodeError::Unexpected { byte, offset }),
        None => Err(DecodeError::EndOfInput(offset)),
    }
}

/// Consumes `null` if it is the next token. Returns whether it did.
pub fn try_read_null(reader: &mut Reader) -> Result<bool, DecodeError> {
    reader.skip_whitespace();
    if reader.peek() != Some(b'n') {
        return Ok(false);
    }
    read_literal(reader, b"null")?;
    Ok(true)
}

fn scan_digits(reader: &mut Reader) -> usize {
    let mut n = 0;
    while let Some(b'0'..=b'9') = reader.peek() {
        reader.skip(1);
        n += 1;
    }
    n
}

/// Scans a number token: `-? digits (. digits)? ([eE] [+-]? digits)?`.
pub fn scan_number(reader: &mut Reader) -> Result<NumberToken, DecodeError> {
    let start = reader.position();
    if reader.peek() == Some(b'-') {
        reader.skip(1);
    }
    if scan_digits(reader) == 0 {
        return Err(DecodeError::InvalidNumber(start));
    }
    let mut is_float = false;
    if reader.peek() == Some(b'.') {
        is_float = true;
        reader.skip(1);
        if scan_digits(reader) == 0 {
            return Err(DecodeError::InvalidNumber(start));
        }
    }
    if let Some(b'e' | b'E') = reader.peek() {
        is_float = true;
        reader.skip(1);
        if let Some(b'+' | b'-') = reader.peek() {
            reader.skip(1);
        }
        if scan_digits(reader) == 0 {
            return Err(DecodeError::InvalidNumber(start));
        }
    }
    Ok(NumberToken {
        start,
        end: reader.position(),
        is_float,
    })
}

/// Reads a number into the narrowest fitting [`Number`].
pub fn read_number(reader: &mut Reader) -> Result<Number, DecodeError> {
    let token = scan_number(reader)?;
    let text = token.text(reader);
    let invalid = || DecodeError::InvalidNumber(token.start);
    if token.is_float {
        return text.parse().map(Number::Float).map_err(|_| invalid());
    }
    if let Ok(i) = text.parse::<i64>() {
        Ok(Number::Integer(i))
    } else if let Ok(u) = text.parse::<u64>() {
        Ok(Number::UInteger(u))
    } else {
        text.parse().map(Number::Float).map_err(|_| invalid())
    }
}

/// Reads a quoted string and returns its unescaped contents.
pub fn read_string(reader: &mut Reader) -> Result<String, DecodeError> {
    let open = reader.position();
    expect_byte(reader, b'"')?;
    let body = reader.position();
    let mut escaped = false;
    loop {
        match reader.read_byte()? {
            b'"' => break,
            b'\\' => {
                escaped = true;
                reader.read_byte()?;
            }
            _ => {}
        }
    }
    let close = reader.position() - 1;
    decode_string_body(reader.slice(body, close)).ok_or(DecodeError::InvalidString(open))
}

/// Decodes the bytes between the quotes of a JSON string.
///
/// Strings without a backslash are copied straight through; escaped ones are
/// handed to `serde_json`, which handles `\u` surrogate pairs.
fn decode_string_body(bytes: &[u8]) -> Option<String> {
    if !bytes.contains(&b'\\') {
        return std::str::from_utf8(bytes).ok().map(str::to_owned);
    }
    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(bytes);
    quoted.push(b'"');
    serde_json::from_slice(&quoted).ok()
}
