use std::io;

use json_chain_buffers::{Reader, Writer};
use json_chain_tree::DecodeError;
use json_chain_util::insertion_sort_by_key;
use log::debug;

use crate::context::{ReadContext, WriteContext};
use crate::handler::{default_chain, Handler, JsonHandler};
use crate::options::JsonOptions;
use crate::shape::Shape;
use crate::typed::JsonType;
use crate::value::Value;
use crate::JsonError;

/// JSON codec engine.
///
/// Owns the handler chain, the session options, an output sink and an input
/// buffer. Values are written to the sink with [`Json::write`] and read from
/// the input set by [`Json::set_input`] with [`Json::read`].
///
/// The default sink is an in-memory [`Writer`]; any [`io::Write`] works:
///
/// ```
/// use json_chain::{Json, Value};
///
/// let mut json = Json::with_sink(Vec::new());
/// json.write(&Value::Seq(vec![Value::Int(1), "a".into()])).unwrap();
/// assert_eq!(json.into_sink(), b"[1,\"a\"]");
/// ```
pub struct Json<W = Writer> {
    handlers: Vec<Handler>,
    options: JsonOptions,
    sink: W,
    input: Reader,
}

impl Json<Writer> {
    /// Engine with the scalar, sequence and composite handlers.
    pub fn new() -> Self {
        Self::with_options(JsonOptions::default())
    }

    pub fn with_options(options: JsonOptions) -> Self {
        let mut json = Self::with_sink(Writer::new());
        json.options = options;
        json
    }

    /// Everything written since the last [`Json::take_output`].
    pub fn output(&self) -> &[u8] {
        self.sink.as_slice()
    }

    /// Returns the buffered output and empties the sink.
    pub fn take_output(&mut self) -> Vec<u8> {
        self.sink.take()
    }
}

impl Default for Json<Writer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: io::Write> Json<W> {
    pub fn with_sink(sink: W) -> Self {
        Self {
            handlers: default_chain(),
            options: JsonOptions::default(),
            sink,
            input: Reader::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut JsonOptions {
        &mut self.options
    }

    pub fn indented(&self) -> bool {
        self.options.indented
    }

    pub fn set_indented(&mut self, indented: bool) -> &mut Self {
        self.options.indented = indented;
        self
    }

    pub fn use_property(&self) -> bool {
        self.options.use_property
    }

    pub fn set_use_property(&mut self, use_property: bool) -> &mut Self {
        self.options.use_property = use_property;
        self
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    /// The chain in the order handlers are asked.
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// Adds `handler` to the chain and re-sorts it by priority. Handlers of
    /// equal priority keep their insertion order.
    pub fn add_handler<H: JsonHandler>(&mut self, handler: H) -> &mut Self {
        let handler = handler.into_handler();
        debug!("add handler {handler:?}");
        self.handlers.push(handler);
        self.sort_handlers();
        self
    }

    /// Adds a default `H`, optionally overriding its priority.
    pub fn add_handler_of<H: JsonHandler + Default>(&mut self, priority: Option<i32>) -> &mut Self {
        let mut handler = H::default();
        if let Some(priority) = priority {
            handler.set_priority(priority);
        }
        self.add_handler(handler)
    }

    /// First handler in the chain of concrete type `H`.
    pub fn get_handler<H: JsonHandler>(&self) -> Option<&H> {
        self.handlers.iter().find_map(|h| h.downcast_ref())
    }

    /// Mutable access to the settings of the first `H`. Use
    /// [`Json::set_handler_priority`] to move it in the chain.
    pub fn get_handler_mut<H: JsonHandler>(&mut self) -> Option<&mut H> {
        self.handlers.iter_mut().find_map(|h| h.downcast_mut())
    }

    /// Changes the priority of the first `H` and re-sorts. Returns `false`
    /// if the chain holds no `H`.
    pub fn set_handler_priority<H: JsonHandler>(&mut self, priority: i32) -> bool {
        let Some(handler) = self.handlers.iter_mut().find(|h| h.downcast_ref::<H>().is_some()) else {
            return false;
        };
        handler.set_priority(priority);
        self.sort_handlers();
        true
    }

    fn sort_handlers(&mut self) {
        insertion_sort_by_key(&mut self.handlers, Handler::priority);
    }

    /// Encodes `value` and appends the text to the sink.
    ///
    /// A top-level `Null` writes nothing. The text is built completely
    /// before it reaches the sink, so an encoding error writes nothing.
    pub fn write(&mut self, value: &Value) -> Result<(), JsonError> {
        if value.is_null() {
            return Ok(());
        }
        let mut text = String::new();
        self.write_into(&mut text, value)?;
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Like [`Json::write`], but first checks that `value` conforms to
    /// `shape`.
    pub fn write_as(&mut self, value: &Value, shape: &Shape) -> Result<(), JsonError> {
        if !shape.accepts(value) {
            return Err(JsonError::mismatch(shape, value.kind_name()));
        }
        self.write(value)
    }

    pub fn write_typed<T: JsonType>(&mut self, value: &T) -> Result<(), JsonError> {
        self.write_as(&value.to_value(), &T::shape())
    }

    /// Encodes `value` onto the end of `out`. `Null` encodes as `null`. On
    /// error `out` may hold partial text.
    pub fn write_into(&self, out: &mut String, value: &Value) -> Result<(), JsonError> {
        WriteContext::new(&self.handlers, &self.options, out).write(value)
    }

    pub fn write_to_string(&self, value: &Value) -> Result<String, JsonError> {
        let mut out = String::new();
        self.write_into(&mut out, value)?;
        Ok(out)
    }

    /// Replaces the input buffer.
    pub fn set_input(&mut self, input: impl Into<Vec<u8>>) {
        self.input = Reader::new(input.into());
    }

    pub fn input(&self) -> &Reader {
        &self.input
    }

    /// Reads one value of `shape` from the input.
    ///
    /// Starts from the blank instance of `shape`. If every handler declines
    /// the read fails with [`JsonError::ReadFailed`].
    pub fn read(&mut self, shape: &Shape) -> Result<Value, JsonError> {
        let mut slot = shape.blank();
        if self.try_read(shape, &mut slot)? {
            Ok(slot)
        } else {
            Err(JsonError::ReadFailed(shape.to_string()))
        }
    }

    pub fn read_typed<T: JsonType>(&mut self) -> Result<T, JsonError> {
        T::from_value(self.read(&T::shape())?)
    }

    /// Offers `shape` and `slot` to the chain. Returns `Ok(false)` when no
    /// handler reads it. A failed read may leave `slot` partially filled.
    pub fn try_read(&mut self, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError> {
        ReadContext::new(&self.handlers, &self.options, &mut self.input).try_read(shape, slot)
    }

    /// Pulls one raw byte from the input.
    pub fn read_byte(&mut self) -> Result<u8, JsonError> {
        Ok(self.input.read_byte()?)
    }

    /// Checks that only whitespace is left in the input.
    pub fn finish(&mut self) -> Result<(), JsonError> {
        self.input.skip_whitespace();
        if !self.input.is_at_end() {
            return Err(JsonError::Syntax(DecodeError::TrailingCharacters(self.input.position())));
        }
        Ok(())
    }
}
