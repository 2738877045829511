//! Shapes: registration-time descriptions of what a value looks like.
//!
//! A [`Shape`] tells the read path what to construct and lets handlers
//! decide whether they are responsible. Records and enums are described by
//! schemas registered once and shared through `Arc`.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::value::{EnumValue, RecordRef, Value};

/// Target shape of a read, or the declared shape of a record member.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Whatever the input holds.
    Any,
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    UInt,
    /// 64-bit float.
    Float,
    Str,
    Char,
    Enum(Arc<EnumSchema>),
    /// UTC timestamp.
    DateTime,
    /// Ordered collection with the given element shape.
    Seq(Box<Shape>),
    /// String-keyed map with the given value shape.
    Map(Box<Shape>),
    Record(Arc<RecordSchema>),
    /// Deferred shape, for self-referential record schemas.
    Lazy(fn() -> Shape),
    /// Shape served only by user-registered handlers.
    Custom(&'static str),
}

impl Shape {
    pub fn seq(elem: Shape) -> Self {
        Shape::Seq(Box::new(elem))
    }

    pub fn map(value: Shape) -> Self {
        Shape::Map(Box::new(value))
    }

    /// Follows [`Shape::Lazy`] indirections.
    pub fn resolve(&self) -> Cow<'_, Shape> {
        match self {
            Shape::Lazy(f) => Cow::Owned(f().resolve().into_owned()),
            other => Cow::Borrowed(other),
        }
    }

    /// The default-initialized instance a read of this shape starts from.
    ///
    /// Records start with blank members, except nested records, lazy and
    /// custom members, which start as `Null` so recursive schemas stay
    /// finite.
    pub fn blank(&self) -> Value {
        match self {
            Shape::Any | Shape::Lazy(_) | Shape::Custom(_) => Value::Null,
            Shape::Bool => Value::Bool(false),
            Shape::Int => Value::Int(0),
            Shape::UInt => Value::UInt(0),
            Shape::Float => Value::Float(0.0),
            Shape::Str => Value::Str(String::new()),
            Shape::Char => Value::Char('\0'),
            Shape::Enum(schema) => EnumValue::new(schema.clone(), 0)
                .map(Value::Enum)
                .unwrap_or(Value::Null),
            Shape::DateTime => Value::DateTime(Default::default()),
            Shape::Seq(_) => Value::Seq(Vec::new()),
            Shape::Map(_) => Value::Map(Vec::new()),
            Shape::Record(schema) => Value::Record(RecordRef::blank(schema.clone())),
        }
    }

    fn member_blank(&self) -> Value {
        match self {
            Shape::Record(_) => Value::Null,
            other => other.blank(),
        }
    }

    /// Whether `value` conforms to this shape. `Null` conforms to every
    /// shape. Records are matched by schema, not member by member.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) | (Shape::Any, _) => true,
            (Shape::Lazy(f), value) => f().accepts(value),
            (Shape::Bool, Value::Bool(_)) => true,
            (Shape::Int, Value::Int(_)) => true,
            (Shape::Int, Value::UInt(u)) => i64::try_from(*u).is_ok(),
            (Shape::UInt, Value::UInt(_)) => true,
            (Shape::UInt, Value::Int(i)) => *i >= 0,
            (Shape::Float, Value::Float(_) | Value::Int(_) | Value::UInt(_)) => true,
            (Shape::Str, Value::Str(_)) => true,
            (Shape::Char, Value::Char(_)) => true,
            (Shape::Enum(schema), Value::Enum(e)) => EnumSchema::same(schema, e.schema()),
            (Shape::DateTime, Value::DateTime(_)) => true,
            (Shape::Seq(elem), Value::Seq(items)) => items.iter().all(|v| elem.accepts(v)),
            (Shape::Map(elem), Value::Map(entries)) => entries.iter().all(|(_, v)| elem.accepts(v)),
            (Shape::Record(schema), Value::Record(r)) => RecordSchema::same(schema, &r.schema()),
            (Shape::Custom(tag), Value::Custom(c)) => *tag == c.tag,
            _ => false,
        }
    }
}

impl Shape {
    /// Whether both shapes describe the same kind of value. Nested records
    /// and enums compare by name only, so recursive schemas terminate.
    fn same_outline(&self, other: &Shape) -> bool {
        match (&*self.resolve(), &*other.resolve()) {
            (Shape::Seq(a), Shape::Seq(b)) | (Shape::Map(a), Shape::Map(b)) => a.same_outline(b),
            (Shape::Record(a), Shape::Record(b)) => a.name == b.name,
            (Shape::Enum(a), Shape::Enum(b)) => a.name == b.name,
            (Shape::Custom(a), Shape::Custom(b)) => a == b,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Any => f.write_str("any"),
            Shape::Bool => f.write_str("bool"),
            Shape::Int => f.write_str("int"),
            Shape::UInt => f.write_str("uint"),
            Shape::Float => f.write_str("float"),
            Shape::Str => f.write_str("str"),
            Shape::Char => f.write_str("char"),
            Shape::Enum(schema) => write!(f, "enum {}", schema.name),
            Shape::DateTime => f.write_str("datetime"),
            Shape::Seq(elem) => write!(f, "seq<{elem}>"),
            Shape::Map(elem) => write!(f, "map<{elem}>"),
            Shape::Record(schema) => write!(f, "record {}", schema.name),
            Shape::Lazy(resolve) => match resolve() {
                named @ (Shape::Record(_) | Shape::Enum(_)) => fmt::Display::fmt(&named, f),
                _ => f.write_str("lazy"),
            },
            Shape::Custom(tag) => write!(f, "custom {tag}"),
        }
    }
}

/// Finds `key` among `names`: exact match first, then ASCII
/// case-insensitive.
fn find_name<'a>(names: impl Iterator<Item = (usize, &'a str)> + Clone, key: &str) -> Option<usize> {
    names
        .clone()
        .find(|(_, name)| *name == key)
        .or_else(|| names.into_iter().find(|(_, name)| name.eq_ignore_ascii_case(key)))
        .map(|(i, _)| i)
}

/// Named enum with ordered labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    pub name: String,
    pub labels: Vec<String>,
}

impl EnumSchema {
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        })
    }

    /// Ordinal of `label`, matched exactly then case-insensitively.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        find_name(self.labels.iter().map(String::as_str).enumerate(), label)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Same schema instance, or an equal one with the same name and labels.
    pub fn same(a: &Arc<Self>, b: &Arc<Self>) -> bool {
        Arc::ptr_eq(a, b) || a == b
    }
}

/// Whether a record member is a stored field or a property.
///
/// [`JsonOptions::use_property`](crate::JsonOptions::use_property) selects
/// which kind of member is encoded and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub shape: Shape,
    pub kind: MemberKind,
}

/// Named record with ordered members.
///
/// ```
/// use json_chain::{RecordSchema, Shape};
///
/// let person = RecordSchema::builder("Person")
///     .property("name", Shape::Str)
///     .property("age", Shape::Int)
///     .property("tags", Shape::seq(Shape::Str))
///     .build();
/// assert_eq!(person.index_of("age"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub name: String,
    pub members: Vec<Member>,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            schema: RecordSchema {
                name: name.into(),
                members: Vec::new(),
            },
        }
    }

    /// Index of the member called exactly `name`, of any kind.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }

    /// Members of `kind` with their indices, in declaration order.
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = (usize, &Member)> + Clone {
        self.members
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.kind == kind)
    }

    /// Resolves an input key to a member of `kind`: exact match first, then
    /// ASCII case-insensitive.
    pub fn find(&self, kind: MemberKind, key: &str) -> Option<usize> {
        find_name(self.members_of(kind).map(|(i, m)| (i, m.name.as_str())), key)
    }

    pub(crate) fn blank_values(&self) -> Vec<Value> {
        self.members.iter().map(|m| m.shape.member_blank()).collect()
    }

    /// Same schema instance, or a schema with the same name declaring the
    /// same members in the same order.
    pub fn same(a: &Arc<Self>, b: &Arc<Self>) -> bool {
        Arc::ptr_eq(a, b)
            || (a.name == b.name
                && a.members.len() == b.members.len()
                && a.members.iter().zip(&b.members).all(|(x, y)| {
                    x.name == y.name && x.kind == y.kind && x.shape.same_outline(&y.shape)
                }))
    }
}

pub struct RecordSchemaBuilder {
    schema: RecordSchema,
}

impl RecordSchemaBuilder {
    pub fn member(mut self, name: impl Into<String>, shape: Shape, kind: MemberKind) -> Self {
        self.schema.members.push(Member {
            name: name.into(),
            shape,
            kind,
        });
        self
    }

    pub fn field(self, name: impl Into<String>, shape: Shape) -> Self {
        self.member(name, shape, MemberKind::Field)
    }

    pub fn property(self, name: impl Into<String>, shape: Shape) -> Self {
        self.member(name, shape, MemberKind::Property)
    }

    pub fn build(self) -> Arc<RecordSchema> {
        Arc::new(self.schema)
    }
}
