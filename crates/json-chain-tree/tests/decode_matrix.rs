use json_chain_tree::{decode, decode_bytes, DecodeError, Decoder, Envelope, EnvelopeError, JsonNode};
use proptest::prelude::*;

#[test]
fn decode_error_matrix() {
    let cases: [(&str, DecodeError); 9] = [
        ("", DecodeError::EndOfInput(0)),
        ("[1,", DecodeError::EndOfInput(3)),
        ("{\"a\" 1}", DecodeError::Unexpected { byte: b'1', offset: 5 }),
        ("[1,]", DecodeError::Unexpected { byte: b']', offset: 3 }),
        ("tru", DecodeError::EndOfInput(3)),
        ("nul!", DecodeError::Unexpected { byte: b'!', offset: 3 }),
        ("-", DecodeError::InvalidNumber(0)),
        ("\"\\x\"", DecodeError::InvalidString(0)),
        ("{} {}", DecodeError::TrailingCharacters(3)),
    ];
    for (text, expected) in cases {
        assert_eq!(decode(text), Err(expected), "input {text:?}");
    }
}

#[test]
fn decode_bytes_rejects_invalid_utf8_strings() {
    assert_eq!(decode_bytes(b"\"\xff\""), Err(DecodeError::InvalidString(0)));
    assert_eq!(decode_bytes(b"[\"ok\"]").unwrap()[0].as_str(), Some("ok"));
}

#[test]
fn nested_document_lookups() {
    let doc = decode(
        r#"{
            "status": "0",
            "result": {
                "location": {"lng": 116.307, "lat": 40.056},
                "precise": 1,
                "confidence": 80.5,
                "level": "street"
            }
        }"#,
    )
    .expect("document must decode");
    let result = &doc["result"];
    assert_eq!(doc["status"].to_int(), Some(0));
    assert_eq!(result["location"]["lat"].as_f64(), Some(40.056));
    assert_eq!(result["precise"].as_i64(), Some(1));
    assert_eq!(result["confidence"].to_int(), Some(80));
    assert_eq!(result["level"].to_text().as_deref(), Some("street"));
    assert!(result["missing"]["deeper"][0].is_missing());
    assert_eq!(result.as_object().map(|o| o.len()), Some(4));
}

#[test]
fn depth_limit_is_configurable() {
    let deep = format!("{}1{}", "[".repeat(600), "]".repeat(600));
    assert_eq!(decode(&deep), Err(DecodeError::TooDeep(512)));
    let node = Decoder::with_max_depth(600).decode(deep.as_bytes()).expect("within limit");
    assert!(node.as_array().is_some());
}

#[test]
fn envelope_over_decoded_tree() {
    let env = Envelope::default();
    let ok = env
        .decode(r#"{"status":0,"msg":"ok","result":{"city":"Beijing"}}"#)
        .expect("status 0 must open");
    assert_eq!(ok["city"].as_str(), Some("Beijing"));

    let err = env.decode(r#"{"status":302,"msg":"quota exceeded"}"#).unwrap_err();
    assert_eq!(err.to_string(), "status 302: quota exceeded");

    let err = env.decode("[1").unwrap_err();
    assert_eq!(err, EnvelopeError::Decode(DecodeError::EndOfInput(2)));
}

#[test]
fn serde_json_conversion_keeps_values() {
    let node = decode(r#"{"a":[1,-2,3.5,"s",true,null],"b":{}}"#).expect("must decode");
    let value = serde_json::Value::from(node.clone());
    assert_eq!(value["a"][2], serde_json::json!(3.5));
    assert_eq!(JsonNode::from(value), node);
}

fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<String>().prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map(any::<String>(), inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_decode_agrees_with_serde_json(value in arb_json()) {
        let text = serde_json::to_string(&value).expect("serde_json encodes");
        let node = decode(&text).expect("tree decodes serde_json output");
        prop_assert_eq!(serde_json::Value::from(node), value);
    }
}
