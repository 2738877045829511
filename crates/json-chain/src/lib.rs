//! json-chain - pluggable JSON codec engine.
//!
//! A [`Json`] engine converts [`Value`]s to JSON text and back by asking an
//! ordered chain of handlers which one is responsible. The default chain
//! holds a [`ScalarHandler`], a [`SequenceHandler`] and a
//! [`CompositeHandler`]; more handlers, including user-defined
//! [`JsonHandler`]s, can be added at runtime and are kept sorted by
//! priority.
//!
//! Records are described by a [`RecordSchema`] registered up front:
//!
//! ```
//! use json_chain::{Json, RecordRef, RecordSchema, Shape, Value};
//!
//! let person = RecordSchema::builder("Person")
//!     .property("name", Shape::Str)
//!     .property("age", Shape::Int)
//!     .property("tags", Shape::seq(Shape::Str))
//!     .build();
//! let ann = RecordRef::blank(person.clone())
//!     .with("name", "Ann")
//!     .with("age", 30)
//!     .with("tags", vec![Value::from("x"), Value::from("y")]);
//!
//! let mut json = Json::new();
//! json.write(&ann.clone().into()).unwrap();
//! assert_eq!(json.output(), br#"{"name":"Ann","age":30,"tags":["x","y"]}"#);
//!
//! json.set_input(json.output().to_vec());
//! let back = json.read(&Shape::Record(person)).unwrap();
//! assert_eq!(back, Value::Record(ann));
//! ```

mod context;
mod error;
mod handler;
mod json;
mod options;
mod shape;
mod typed;
mod value;

pub use context::{ReadContext, WriteContext};
pub use error::JsonError;
pub use handler::{
    AsAny, CompositeHandler, DateFormat, DictionaryHandler, Handler, JsonHandler, ScalarHandler,
    SequenceHandler,
};
pub use json::Json;
pub use options::{JsonOptions, DEFAULT_MAX_DEPTH};
pub use shape::{EnumSchema, Member, MemberKind, RecordSchema, RecordSchemaBuilder, Shape};
pub use typed::{expect_record, JsonType};
pub use value::{CustomValue, EnumValue, Record, RecordRef, Value};

/// Encodes `value` as compact JSON text. `Null` encodes as `null`.
pub fn to_string(value: &Value) -> Result<String, JsonError> {
    Json::new().write_to_string(value)
}

/// Encodes `value` as indented JSON text.
pub fn to_string_pretty(value: &Value) -> Result<String, JsonError> {
    Json::with_options(JsonOptions::default().indented(true)).write_to_string(value)
}

pub fn to_string_typed<T: JsonType>(value: &T) -> Result<String, JsonError> {
    to_string(&value.to_value())
}

/// Decodes `text` as one value of `shape`. Only whitespace may follow it.
pub fn from_str(text: &str, shape: &Shape) -> Result<Value, JsonError> {
    let mut json = Json::new();
    json.set_input(text);
    let value = json.read(shape)?;
    json.finish()?;
    Ok(value)
}

pub fn from_str_typed<T: JsonType>(text: &str) -> Result<T, JsonError> {
    T::from_value(from_str(text, &T::shape())?)
}
