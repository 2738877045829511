//! Per-call state threaded through recursive handler invocations.
//!
//! The engine creates one context per top-level `write` or `read`. Handlers
//! recurse through it, never through the engine, so the engine itself holds
//! no mutable call state.

use json_chain_buffers::Reader;
use json_chain_tree::{lex, DecodeError, Decoder};
use json_chain_util::quote_into;
use log::{debug, trace};

use crate::handler::Handler;
use crate::options::JsonOptions;
use crate::shape::Shape;
use crate::value::Value;
use crate::JsonError;

/// Encoding context: output text, options and current nesting depth.
pub struct WriteContext<'a> {
    chain: &'a [Handler],
    options: &'a JsonOptions,
    out: &'a mut String,
    depth: usize,
}

impl<'a> WriteContext<'a> {
    pub(crate) fn new(chain: &'a [Handler], options: &'a JsonOptions, out: &'a mut String) -> Self {
        Self {
            chain,
            options,
            out,
            depth: 0,
        }
    }

    pub fn options(&self) -> &JsonOptions {
        self.options
    }

    /// Number of enclosing `write` calls, including the one of the handler
    /// currently running. `0` only before the top-level dispatch.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn out(&mut self) -> &mut String {
        self.out
    }

    /// Encodes `value` with the first handler that claims it.
    pub fn write(&mut self, value: &Value) -> Result<(), JsonError> {
        if self.depth == 0 {
            debug!("write {} {:?}", value.kind_name(), value);
        }
        let chain = self.chain;
        let handler = chain
            .iter()
            .find(|h| h.claims_value(value))
            .ok_or_else(|| JsonError::UnsupportedShape(value.kind_name()))?;
        trace!("write {} with {} at depth {}", value.kind_name(), handler.name(), self.depth);
        self.depth += 1;
        let result = handler.write(self, value);
        self.depth -= 1;
        result
    }

    /// Fails once the current container nests deeper than `max_depth`.
    pub fn guard_depth(&self) -> Result<(), JsonError> {
        if self.depth > self.options.max_depth {
            return Err(JsonError::DepthExceeded(self.options.max_depth));
        }
        Ok(())
    }

    /// Starts a new line indented `level` steps when indentation is on.
    pub fn newline(&mut self, level: usize) {
        if self.options.indented {
            self.out.push('\n');
            for _ in 0..level {
                self.out.push_str("  ");
            }
        }
    }

    /// Writes `"key":`, followed by a space when indentation is on.
    pub fn write_key(&mut self, key: &str) {
        quote_into(self.out, key);
        self.out.push(':');
        if self.options.indented {
            self.out.push(' ');
        }
    }
}

/// Decoding context: input cursor, options and current nesting depth.
pub struct ReadContext<'a> {
    chain: &'a [Handler],
    options: &'a JsonOptions,
    input: &'a mut Reader,
    depth: usize,
}

impl<'a> ReadContext<'a> {
    pub(crate) fn new(chain: &'a [Handler], options: &'a JsonOptions, input: &'a mut Reader) -> Self {
        Self {
            chain,
            options,
            input,
            depth: 0,
        }
    }

    pub fn options(&self) -> &JsonOptions {
        self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn input(&mut self) -> &mut Reader {
        self.input
    }

    /// Offers `shape` and `slot` to every claiming handler in order.
    ///
    /// Returns `Ok(true)` as soon as one handler reconstructs the value and
    /// `Ok(false)` when all of them decline.
    pub fn try_read(&mut self, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError> {
        let shape = shape.resolve();
        if self.depth == 0 {
            debug!("read {shape}");
        }
        let chain = self.chain;
        for handler in chain.iter().filter(|h| h.claims(&shape)) {
            self.depth += 1;
            let result = handler.try_read(self, &shape, slot);
            self.depth -= 1;
            if result? {
                trace!("read {shape} with {} at depth {}", handler.name(), self.depth);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Like [`ReadContext::try_read`], but a declined read is an error.
    pub fn read_into(&mut self, shape: &Shape, slot: &mut Value) -> Result<(), JsonError> {
        if self.try_read(shape, slot)? {
            Ok(())
        } else {
            Err(JsonError::UnsupportedShape(shape.to_string()))
        }
    }

    /// Fails once the current container nests deeper than `max_depth`.
    pub fn guard_depth(&self) -> Result<(), JsonError> {
        if self.depth > self.options.max_depth {
            return Err(JsonError::DepthExceeded(self.options.max_depth));
        }
        Ok(())
    }

    /// Skips whitespace and returns the next byte without consuming it.
    pub fn peek_token(&mut self) -> Result<u8, JsonError> {
        Ok(lex::peek_token(self.input)?)
    }

    pub fn read_byte(&mut self) -> Result<u8, JsonError> {
        Ok(self.input.read_byte()?)
    }

    /// Consumes `byte` after optional whitespace.
    pub fn expect(&mut self, byte: u8) -> Result<(), JsonError> {
        lex::peek_token(self.input)?;
        Ok(lex::expect_byte(self.input, byte)?)
    }

    /// Consumes a `null` token if it comes next.
    pub fn try_read_null(&mut self) -> Result<bool, JsonError> {
        Ok(lex::try_read_null(self.input)?)
    }

    /// Decodes and discards one value of any shape. The value may nest only
    /// as deep as the remaining depth budget allows.
    pub fn skip_value(&mut self) -> Result<(), JsonError> {
        let budget = self.options.max_depth.saturating_sub(self.depth);
        match Decoder::with_max_depth(budget).read_any(self.input) {
            Ok(_) => Ok(()),
            Err(DecodeError::TooDeep(_)) => Err(JsonError::DepthExceeded(self.options.max_depth)),
            Err(err) => Err(err.into()),
        }
    }

    /// Error for a token that cannot become a value of `expected`.
    ///
    /// Call with the cursor on the offending token.
    pub fn mismatch(&mut self, expected: &Shape) -> JsonError {
        self.input.skip_whitespace();
        let offset = self.input.position();
        let found = match self.input.peek() {
            Some(b'"') => "string",
            Some(b'[') => "array",
            Some(b'{') => "object",
            Some(b't' | b'f') => "boolean",
            Some(b'n') => "null",
            Some(b'-' | b'0'..=b'9') => "number",
            Some(_) => "unexpected byte",
            None => "end of input",
        };
        JsonError::mismatch(expected, format!("{found} at offset {offset}"))
    }
}
