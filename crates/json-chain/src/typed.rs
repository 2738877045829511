//! Typed bridge between Rust types and [`Value`]s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::shape::Shape;
use crate::value::{RecordRef, Value};
use crate::JsonError;

/// A Rust type with a fixed JSON shape.
///
/// Records implement it by hand against a registered
/// [`RecordSchema`](crate::RecordSchema):
///
/// ```
/// use std::sync::{Arc, OnceLock};
/// use json_chain::{JsonError, JsonType, RecordRef, RecordSchema, Shape, Value};
///
/// struct Point { x: i64, y: i64 }
///
/// fn schema() -> Arc<RecordSchema> {
///     static SCHEMA: OnceLock<Arc<RecordSchema>> = OnceLock::new();
///     SCHEMA
///         .get_or_init(|| RecordSchema::builder("Point").property("x", Shape::Int).property("y", Shape::Int).build())
///         .clone()
/// }
///
/// impl JsonType for Point {
///     fn shape() -> Shape {
///         Shape::Record(schema())
///     }
///
///     fn to_value(&self) -> Value {
///         RecordRef::blank(schema()).with("x", self.x).with("y", self.y).into()
///     }
///
///     fn from_value(value: Value) -> Result<Self, JsonError> {
///         let record = json_chain::expect_record::<Self>(&value)?;
///         Ok(Point { x: record.get_typed("x")?, y: record.get_typed("y")? })
///     }
/// }
///
/// let text = json_chain::to_string_typed(&Point { x: 1, y: -2 }).unwrap();
/// assert_eq!(text, r#"{"x":1,"y":-2}"#);
/// let p: Point = json_chain::from_str_typed(&text).unwrap();
/// assert_eq!((p.x, p.y), (1, -2));
/// ```
pub trait JsonType: Sized {
    fn shape() -> Shape;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, JsonError>;
}

fn mismatch<T: JsonType>(value: &Value) -> JsonError {
    JsonError::mismatch(T::shape(), value.kind_name())
}

/// The record inside `value`, or a mismatch against `T`'s shape.
pub fn expect_record<T: JsonType>(value: &Value) -> Result<&RecordRef, JsonError> {
    value.as_record().ok_or_else(|| mismatch::<T>(value))
}

impl RecordRef {
    /// Converts the member called `name` to `T`.
    pub fn get_typed<T: JsonType>(&self, name: &str) -> Result<T, JsonError> {
        let value = self
            .get(name)
            .ok_or_else(|| JsonError::mismatch(T::shape(), format!("no member `{name}` in {}", self.schema().name)))?;
        T::from_value(value)
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl JsonType for $t {
            fn shape() -> Shape {
                Shape::Int
            }

            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, JsonError> {
                value
                    .as_i64()
                    .and_then(|i| <$t>::try_from(i).ok())
                    .ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl JsonType for $t {
            fn shape() -> Shape {
                Shape::UInt
            }

            fn to_value(&self) -> Value {
                Value::UInt(u64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, JsonError> {
                let wide = match value {
                    Value::UInt(u) => Some(u),
                    Value::Int(i) => u64::try_from(i).ok(),
                    _ => None,
                };
                wide.and_then(|u| <$t>::try_from(u).ok())
                    .ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl JsonType for f64 {
    fn shape() -> Shape {
        Shape::Float
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        value.as_f64().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl JsonType for f32 {
    fn shape() -> Shape {
        Shape::Float
    }

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        value
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl JsonType for bool {
    fn shape() -> Shape {
        Shape::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl JsonType for String {
    fn shape() -> Shape {
        Shape::Str
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl JsonType for char {
    fn shape() -> Shape {
        Shape::Char
    }

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl JsonType for DateTime<Utc> {
    fn shape() -> Shape {
        Shape::DateTime
    }

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// Any value, as is.
impl JsonType for Value {
    fn shape() -> Shape {
        Shape::Any
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        Ok(value)
    }
}

/// `None` is `null`.
impl<T: JsonType> JsonType for Option<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: JsonType> JsonType for Vec<T> {
    fn shape() -> Shape {
        Shape::seq(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// Needs a [`DictionaryHandler`](crate::DictionaryHandler) in the chain.
impl<T: JsonType> JsonType for BTreeMap<String, T> {
    fn shape() -> Shape {
        Shape::map(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}
