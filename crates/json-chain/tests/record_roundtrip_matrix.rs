use std::sync::{Arc, OnceLock};

use json_chain::{
    expect_record, EnumSchema, EnumValue, Json, JsonError, JsonOptions, JsonType, RecordRef,
    RecordSchema, Shape, Value,
};

fn person_schema() -> Arc<RecordSchema> {
    static SCHEMA: OnceLock<Arc<RecordSchema>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            RecordSchema::builder("Person")
                .property("name", Shape::Str)
                .property("age", Shape::Int)
                .property("tags", Shape::seq(Shape::Str))
                .build()
        })
        .clone()
}

fn node_shape() -> Shape {
    static SCHEMA: OnceLock<Arc<RecordSchema>> = OnceLock::new();
    Shape::Record(
        SCHEMA
            .get_or_init(|| {
                RecordSchema::builder("Node")
                    .property("id", Shape::Int)
                    .property("next", Shape::Lazy(node_shape))
                    .build()
            })
            .clone(),
    )
}

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: i64,
    tags: Vec<String>,
}

impl JsonType for Person {
    fn shape() -> Shape {
        Shape::Record(person_schema())
    }

    fn to_value(&self) -> Value {
        RecordRef::blank(person_schema())
            .with("name", self.name.as_str())
            .with("age", self.age)
            .with("tags", self.tags.to_value())
            .into()
    }

    fn from_value(value: Value) -> Result<Self, JsonError> {
        let record = expect_record::<Self>(&value)?;
        Ok(Person {
            name: record.get_typed("name")?,
            age: record.get_typed("age")?,
            tags: record.get_typed("tags")?,
        })
    }
}

fn ann() -> Person {
    Person {
        name: "Ann".into(),
        age: 30,
        tags: vec!["x".into(), "y".into()],
    }
}

#[test]
fn end_to_end_record_text_is_exact() {
    let mut json = Json::new();
    json.write_typed(&ann()).expect("write must succeed");
    let text = json.take_output();
    assert_eq!(text, br#"{"name":"Ann","age":30,"tags":["x","y"]}"#);

    json.set_input(text);
    let back: Person = json.read_typed().expect("read must succeed");
    assert_eq!(back, ann());
}

#[test]
fn crate_level_helpers_round_trip() {
    let text = json_chain::to_string_typed(&ann()).expect("encode must succeed");
    assert_eq!(json_chain::from_str_typed::<Person>(&text).expect("decode must succeed"), ann());

    let err = json_chain::from_str_typed::<Person>(&format!("{text} x")).unwrap_err();
    assert!(matches!(err, JsonError::Syntax(_)), "{err}");
}

#[test]
fn indented_and_compact_output_decode_identically() {
    let value = ann().to_value();
    let compact = json_chain::to_string(&value).expect("compact must succeed");
    let pretty = json_chain::to_string_pretty(&value).expect("pretty must succeed");
    assert_eq!(
        pretty,
        "{\n  \"name\": \"Ann\",\n  \"age\": 30,\n  \"tags\": [\n    \"x\",\n    \"y\"\n  ]\n}"
    );
    assert_eq!(pretty.split_whitespace().collect::<String>(), compact);

    let shape = Person::shape();
    let a = json_chain::from_str(&compact, &shape).expect("compact must decode");
    let b = json_chain::from_str(&pretty, &shape).expect("pretty must decode");
    assert_eq!(a, b);
    assert_eq!(a, value);

    let tree_a = json_chain_tree::decode(&compact).expect("tree decode");
    let tree_b = json_chain_tree::decode(&pretty).expect("tree decode");
    assert_eq!(tree_a, tree_b);
}

#[test]
fn unknown_keys_are_ignored() {
    let schema = RecordSchema::builder("A").property("a", Shape::Int).build();
    let value = json_chain::from_str(r#"{"a":1,"zzz":2}"#, &Shape::Record(schema)).expect("decode must succeed");
    let record = value.as_record().expect("record");
    assert_eq!(record.get("a"), Some(Value::Int(1)));

    let schema = RecordSchema::builder("A").property("a", Shape::Int).build();
    let noisy = r#"{ "zzz": {"x": [1, 2, {"y": "}"}]}, "a" : 2, "more": null }"#;
    let value = json_chain::from_str(noisy, &Shape::Record(schema)).expect("decode must succeed");
    assert_eq!(value.as_record().expect("record").get("a"), Some(Value::Int(2)));
}

#[test]
fn empty_sequence_round_trips() {
    assert_eq!(json_chain::to_string(&Value::Seq(vec![])).expect("write must succeed"), "[]");
    let value = json_chain::from_str("[]", &Shape::seq(Shape::Int)).expect("read must succeed");
    assert_eq!(value, Value::Seq(vec![]));

    let empty = Person {
        tags: vec![],
        ..ann()
    };
    let text = json_chain::to_string_pretty(&empty.to_value()).expect("write must succeed");
    assert!(text.contains("\"tags\": []"), "{text}");
}

#[test]
fn self_referential_record_hits_depth_guard() {
    let schema = RecordSchema::builder("Loop")
        .property("id", Shape::Int)
        .property("me", Shape::Any)
        .build();
    let looped = RecordRef::blank(schema).with("id", 1);
    looped.set("me", looped.clone());

    let mut json = Json::new();
    let err = json.write(&looped.clone().into()).unwrap_err();
    assert!(matches!(err, JsonError::DepthExceeded(64)), "{err}");
    assert!(json.output().is_empty());

    let mut shallow = Json::with_options(JsonOptions::default().max_depth(3));
    assert!(matches!(shallow.write(&looped.into()), Err(JsonError::DepthExceeded(3))));
}

#[test]
fn recursive_schema_reads_linked_nodes() {
    let text = r#"{"id":1,"next":{"id":2,"next":{"id":3,"next":null}}}"#;
    let value = json_chain::from_str(text, &node_shape()).expect("decode must succeed");
    let first = value.as_record().expect("record");
    let second = first.get("next").expect("member");
    let third = second.as_record().expect("record").get("next").expect("member");
    assert_eq!(third.as_record().expect("record").get("id"), Some(Value::Int(3)));
    assert_eq!(json_chain::to_string(&value).expect("encode must succeed"), text);
}

#[test]
fn deeply_nested_input_fails_with_depth_exceeded() {
    let mut text = String::new();
    for i in 0..100 {
        text.push_str(&format!("{{\"id\":{i},\"next\":"));
    }
    text.push_str("null");
    text.push_str(&"}".repeat(100));

    let err = json_chain::from_str(&text, &node_shape()).unwrap_err();
    assert!(matches!(err, JsonError::DepthExceeded(64)), "{err}");

    let mut json = Json::with_options(JsonOptions::default().max_depth(128));
    json.set_input(text);
    assert!(json.read(&node_shape()).is_ok());
}

#[test]
fn write_as_rejects_nonconforming_value() {
    let mut json = Json::new();
    let err = json.write_as(&Value::Str("x".into()), &Shape::Int).unwrap_err();
    assert_eq!(err.to_string(), "expected int, found str");
    assert!(json.output().is_empty());

    let wrong = RecordRef::blank(RecordSchema::builder("Other").build());
    assert!(matches!(
        json.write_as(&wrong.into(), &Person::shape()),
        Err(JsonError::ShapeMismatch { .. })
    ));
    json.write_as(&Value::Null, &Person::shape()).expect("null conforms to every shape");
    assert!(json.output().is_empty());
}

#[test]
fn enum_members_round_trip() {
    let level = EnumSchema::new("Level", ["Low", "High"]);
    let schema = RecordSchema::builder("Alarm")
        .property("level", Shape::Enum(level.clone()))
        .build();
    let alarm = RecordRef::blank(schema.clone()).with("level", EnumValue::new(level, 1).expect("ordinal"));
    let text = json_chain::to_string(&alarm.clone().into()).expect("encode must succeed");
    assert_eq!(text, r#"{"level":"High"}"#);
    let back = json_chain::from_str(&text, &Shape::Record(schema)).expect("decode must succeed");
    assert_eq!(back, Value::Record(alarm));
}

#[test]
fn truncated_input_is_stream_exhausted() {
    let err = json_chain::from_str(r#"{"name":"Ann","age":"#, &Person::shape()).unwrap_err();
    assert!(matches!(err, JsonError::StreamExhausted(_)), "{err}");
}
