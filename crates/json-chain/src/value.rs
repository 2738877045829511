//! In-memory values the engine encodes and decodes.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::shape::{EnumSchema, Member, MemberKind, RecordSchema};

/// A dynamically shaped value.
///
/// Records are shared ([`RecordRef`]), so a value graph may contain cycles.
/// Equality and `Debug` follow shared records only one level deep through
/// their own members and are not meant for cyclic graphs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value; encodes as `null`.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Char(char),
    Enum(EnumValue),
    DateTime(DateTime<Utc>),
    Seq(Vec<Value>),
    /// String-keyed entries in insertion order.
    Map(Vec<(String, Value)>),
    Record(RecordRef),
    Custom(CustomValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short description of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> String {
        match self {
            Value::Null => "null".into(),
            Value::Bool(_) => "bool".into(),
            Value::Int(_) => "int".into(),
            Value::UInt(_) => "uint".into(),
            Value::Float(_) => "float".into(),
            Value::Str(_) => "str".into(),
            Value::Char(_) => "char".into(),
            Value::Enum(e) => format!("enum {}", e.schema.name),
            Value::DateTime(_) => "datetime".into(),
            Value::Seq(items) => format!("seq[{}]", items.len()),
            Value::Map(entries) => format!("map[{}]", entries.len()),
            Value::Record(r) => format!("record {}", r.schema().name),
            Value::Custom(c) => format!("custom {}", c.tag),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            Value::UInt(u) => i64::try_from(u).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f),
            Value::Int(i) => Some(i as f64),
            Value::UInt(u) => Some(u as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<RecordRef> for Value {
    fn from(r: RecordRef) -> Self {
        Value::Record(r)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

/// A label of an [`EnumSchema`].
#[derive(Clone)]
pub struct EnumValue {
    schema: Arc<EnumSchema>,
    index: usize,
}

impl EnumValue {
    /// `None` if `index` is not a valid ordinal of `schema`.
    pub fn new(schema: Arc<EnumSchema>, index: usize) -> Option<Self> {
        (index < schema.labels.len()).then_some(Self { schema, index })
    }

    /// Looks up `label` with the schema's matching rules.
    pub fn from_label(schema: Arc<EnumSchema>, label: &str) -> Option<Self> {
        let index = schema.index_of(label)?;
        Some(Self { schema, index })
    }

    pub fn schema(&self) -> &Arc<EnumSchema> {
        &self.schema
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.schema.labels[self.index]
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && EnumSchema::same(&self.schema, &other.schema)
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.schema.name, self.label())
    }
}

/// A value of a user-defined shape, served by a custom handler.
///
/// `payload` carries the value in whatever built-in representation the
/// handler chooses.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    pub tag: &'static str,
    pub payload: Box<Value>,
}

impl CustomValue {
    pub fn new(tag: &'static str, payload: impl Into<Value>) -> Self {
        Self {
            tag,
            payload: Box::new(payload.into()),
        }
    }
}

/// Member values of one record instance, indexed like its schema's members.
#[derive(Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl Record {
    pub fn blank(schema: Arc<RecordSchema>) -> Self {
        let values = schema.blank_values();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    /// Replaces the member called `name`. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.schema.index_of(name) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    /// Members of `kind` paired with their values, in declaration order.
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = (&Member, &Value)> {
        self.schema
            .members_of(kind)
            .map(move |(i, m)| (m, &self.values[i]))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        RecordSchema::same(&self.schema, &other.schema) && self.values == other.values
    }
}

/// Prints nested records by name only, so cycles through a member stay
/// finite.
struct Shallow<'a>(&'a Value);

impl fmt::Debug for Shallow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Record(r) => write!(f, "<record {}>", r.schema().name),
            Value::Seq(items) => {
                f.write_str("Seq(")?;
                f.debug_list().entries(items.iter().map(Shallow)).finish()?;
                f.write_str(")")
            }
            Value::Map(entries) => {
                f.write_str("Map(")?;
                f.debug_list()
                    .entries(entries.iter().map(|(k, v)| (k, Shallow(v))))
                    .finish()?;
                f.write_str(")")
            }
            Value::Custom(c) => f
                .debug_struct("CustomValue")
                .field("tag", &c.tag)
                .field("payload", &Shallow(&c.payload))
                .finish(),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.schema.name);
        for (member, value) in self.schema.members.iter().zip(&self.values) {
            s.field(&member.name, &Shallow(value));
        }
        s.finish()
    }
}

/// Shared, mutable handle to a [`Record`].
///
/// ```
/// use json_chain::{RecordRef, RecordSchema, Shape, Value};
///
/// let schema = RecordSchema::builder("Point")
///     .property("x", Shape::Int)
///     .property("y", Shape::Int)
///     .build();
/// let p = RecordRef::blank(schema).with("x", 3).with("y", 4);
/// assert_eq!(p.get("y"), Some(Value::Int(4)));
/// ```
#[derive(Clone)]
pub struct RecordRef(Rc<RefCell<Record>>);

impl RecordRef {
    pub fn new(record: Record) -> Self {
        Self(Rc::new(RefCell::new(record)))
    }

    pub fn blank(schema: Arc<RecordSchema>) -> Self {
        Self::new(Record::blank(schema))
    }

    /// Builder-style [`RecordRef::set`].
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn schema(&self) -> Arc<RecordSchema> {
        self.0.borrow().schema.clone()
    }

    /// Clone of the member called `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> bool {
        self.0.borrow_mut().set(name, value)
    }

    pub fn borrow(&self) -> Ref<'_, Record> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Record> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same record.
    pub fn ptr_eq(&self, other: &RecordRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(record) => fmt::Debug::fmt(&*record, f),
            Err(_) => f.write_str("<record borrowed>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;

    fn person() -> Arc<RecordSchema> {
        RecordSchema::builder("Person")
            .field("name", Shape::Str)
            .field("friend", Shape::Lazy(|| Shape::Str))
            .property("Nick", Shape::Str)
            .build()
    }

    #[test]
    fn test_blank_and_set() {
        let p = RecordRef::blank(person());
        assert_eq!(p.get("name"), Some(Value::Str(String::new())));
        assert!(p.set("name", "Ann"));
        assert!(!p.set("missing", 1));
        assert_eq!(p.get("name").unwrap().as_str(), Some("Ann"));
    }

    #[test]
    fn test_members_of_kind() {
        let p = RecordRef::blank(person()).with("Nick", "A");
        let rec = p.borrow();
        let fields: Vec<&str> = rec
            .members_of(MemberKind::Field)
            .map(|(m, _)| m.name.as_str())
            .collect();
        assert_eq!(fields, ["name", "friend"]);
        let props: Vec<&Value> = rec.members_of(MemberKind::Property).map(|(_, v)| v).collect();
        assert_eq!(props, [&Value::Str("A".into())]);
    }

    #[test]
    fn test_self_reference_debug_is_finite() {
        let schema = RecordSchema::builder("Loop")
            .field("me", Shape::Any)
            .build();
        let r = RecordRef::blank(schema);
        r.set("me", r.clone());
        assert_eq!(format!("{r:?}"), "Loop { me: <record Loop> }");
        assert_eq!(r, r.clone());
    }

    #[test]
    fn test_reference_through_containers_debug_is_finite() {
        let schema = RecordSchema::builder("Tree")
            .property("kids", Shape::Any)
            .property("tagged", Shape::Any)
            .build();
        let r = RecordRef::blank(schema);
        r.set("kids", Value::Seq(vec![r.clone().into(), Value::Map(vec![("up".into(), r.clone().into())])]));
        r.set("tagged", Value::Custom(CustomValue::new("ref", r.clone())));
        assert_eq!(
            format!("{r:?}"),
            "Tree { kids: Seq([<record Tree>, Map([(\"up\", <record Tree>)])]), \
             tagged: CustomValue { tag: \"ref\", payload: <record Tree> } }"
        );
    }

    #[test]
    fn test_enum_value() {
        let schema = EnumSchema::new("Color", ["Red", "Green"]);
        let green = EnumValue::from_label(schema.clone(), "green").unwrap();
        assert_eq!(green.index(), 1);
        assert_eq!(format!("{green:?}"), "Color::Green");
        assert!(EnumValue::new(schema, 2).is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Seq(vec![Value::Null; 3]).kind_name(), "seq[3]");
        assert_eq!(Value::Record(RecordRef::blank(person())).kind_name(), "record Person");
        assert_eq!(Value::Custom(CustomValue::new("uuid", "x")).kind_name(), "custom uuid");
    }
}
