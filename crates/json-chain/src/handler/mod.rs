//! The handler chain.
//!
//! A handler encodes and decodes one family of shapes. The engine keeps its
//! handlers in a [`Handler`] list sorted by ascending priority and asks them
//! in that order whether they claim a value or shape.

mod composite;
mod dictionary;
mod scalar;
mod sequence;

use std::any::Any;

pub use composite::CompositeHandler;
pub use dictionary::DictionaryHandler;
pub use scalar::{DateFormat, ScalarHandler};
pub use sequence::SequenceHandler;

use crate::context::{ReadContext, WriteContext};
use crate::shape::Shape;
use crate::value::Value;
use crate::JsonError;

/// Access to a handler as [`Any`], for lookups by concrete type.
///
/// Implemented for every `'static` type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Encode/decode logic for one family of shapes.
///
/// `try_read` returns `Ok(false)` to decline, and may only do so before it
/// has consumed any input.
pub trait JsonHandler: AsAny + 'static {
    /// Position in the chain; lower is asked first.
    fn priority(&self) -> i32;

    fn set_priority(&mut self, priority: i32);

    /// Whether this handler reads values of `shape`.
    fn claims(&self, shape: &Shape) -> bool;

    /// Whether this handler writes `value`.
    fn claims_value(&self, value: &Value) -> bool;

    fn write(&self, cx: &mut WriteContext<'_>, value: &Value) -> Result<(), JsonError>;

    fn try_read(&self, cx: &mut ReadContext<'_>, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError>;

    /// Name used in log records.
    fn name(&self) -> &str {
        "custom"
    }

    /// Wraps the handler for insertion into a chain.
    fn into_handler(self) -> Handler
    where
        Self: Sized,
    {
        Handler::Custom(Box::new(self))
    }
}

/// A handler in the chain: one of the built-ins or a user extension.
pub enum Handler {
    Scalar(ScalarHandler),
    Sequence(SequenceHandler),
    Dictionary(DictionaryHandler),
    Composite(CompositeHandler),
    Custom(Box<dyn JsonHandler>),
}

impl Handler {
    pub fn new<H: JsonHandler>(handler: H) -> Self {
        handler.into_handler()
    }

    fn as_dyn(&self) -> &dyn JsonHandler {
        match self {
            Handler::Scalar(h) => h,
            Handler::Sequence(h) => h,
            Handler::Dictionary(h) => h,
            Handler::Composite(h) => h,
            Handler::Custom(h) => &**h,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn JsonHandler {
        match self {
            Handler::Scalar(h) => h,
            Handler::Sequence(h) => h,
            Handler::Dictionary(h) => h,
            Handler::Composite(h) => h,
            Handler::Custom(h) => &mut **h,
        }
    }

    /// The concrete handler, if it is an `H`.
    pub fn downcast_ref<H: JsonHandler>(&self) -> Option<&H> {
        self.as_dyn().as_any().downcast_ref()
    }

    pub fn downcast_mut<H: JsonHandler>(&mut self) -> Option<&mut H> {
        self.as_dyn_mut().as_any_mut().downcast_mut()
    }

    pub fn priority(&self) -> i32 {
        self.as_dyn().priority()
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.as_dyn_mut().set_priority(priority);
    }

    pub fn name(&self) -> &str {
        self.as_dyn().name()
    }

    pub fn claims(&self, shape: &Shape) -> bool {
        self.as_dyn().claims(shape)
    }

    pub fn claims_value(&self, value: &Value) -> bool {
        self.as_dyn().claims_value(value)
    }

    pub fn write(&self, cx: &mut WriteContext<'_>, value: &Value) -> Result<(), JsonError> {
        self.as_dyn().write(cx, value)
    }

    pub fn try_read(&self, cx: &mut ReadContext<'_>, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError> {
        self.as_dyn().try_read(cx, shape, slot)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name(), self.priority())
    }
}

/// The chain a fresh engine starts with, sorted.
pub(crate) fn default_chain() -> Vec<Handler> {
    vec![
        Handler::Scalar(ScalarHandler::default()),
        Handler::Sequence(SequenceHandler::default()),
        Handler::Composite(CompositeHandler::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper {
        priority: i32,
    }

    impl JsonHandler for Upper {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn set_priority(&mut self, priority: i32) {
            self.priority = priority;
        }

        fn claims(&self, _: &Shape) -> bool {
            false
        }

        fn claims_value(&self, value: &Value) -> bool {
            matches!(value, Value::Str(_))
        }

        fn write(&self, cx: &mut WriteContext<'_>, value: &Value) -> Result<(), JsonError> {
            let text = value.as_str().unwrap_or_default().to_uppercase();
            json_chain_util::quote_into(cx.out(), &text);
            Ok(())
        }

        fn try_read(&self, _: &mut ReadContext<'_>, _: &Shape, _: &mut Value) -> Result<bool, JsonError> {
            Ok(false)
        }
    }

    #[test]
    fn test_builtins_keep_their_variant() {
        assert!(matches!(Handler::new(ScalarHandler::default()), Handler::Scalar(_)));
        assert!(matches!(Handler::new(DictionaryHandler::default()), Handler::Dictionary(_)));
        assert!(matches!(Handler::new(Upper { priority: 1 }), Handler::Custom(_)));
    }

    #[test]
    fn test_downcast() {
        let mut h = Handler::new(Upper { priority: 3 });
        assert!(h.downcast_ref::<ScalarHandler>().is_none());
        h.downcast_mut::<Upper>().unwrap().priority = 7;
        assert_eq!(h.priority(), 7);
        assert_eq!(format!("{h:?}"), "custom@7");
    }

    #[test]
    fn test_default_chain_is_sorted() {
        let chain = default_chain();
        let priorities: Vec<i32> = chain.iter().map(Handler::priority).collect();
        assert_eq!(priorities, [10, 20, 100]);
    }
}
