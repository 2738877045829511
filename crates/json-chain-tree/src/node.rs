use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// An untyped decoded JSON value.
///
/// Objects are hash maps, so member order is not preserved. Lookups that
/// miss return [`JsonNode::Missing`], which is distinct from a JSON `null`
/// that is actually present in the document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonNode {
    /// Sentinel for an absent key or index. Never produced by the decoder
    /// for a present value.
    #[default]
    Missing,
    Null,
    Bool(bool),
    Integer(i64),
    /// Integer above `i64::MAX`.
    UInteger(u64),
    Float(f64),
    Str(String),
    Array(Vec<JsonNode>),
    Object(HashMap<String, JsonNode>),
}

static MISSING: JsonNode = JsonNode::Missing;

impl JsonNode {
    /// Member lookup; [`JsonNode::Missing`] if this is not an object or the
    /// key is absent.
    pub fn get(&self, key: &str) -> &JsonNode {
        match self {
            JsonNode::Object(map) => map.get(key).unwrap_or(&MISSING),
            _ => &MISSING,
        }
    }

    /// Element lookup; [`JsonNode::Missing`] if this is not an array or the
    /// index is out of range.
    pub fn at(&self, index: usize) -> &JsonNode {
        match self {
            JsonNode::Array(arr) => arr.get(index).unwrap_or(&MISSING),
            _ => &MISSING,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, JsonNode::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonNode::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonNode::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonNode::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonNode]> {
        match self {
            JsonNode::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, JsonNode>> {
        match self {
            JsonNode::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Integer view of a numeric leaf. Floats qualify only when integral
    /// and in range.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            JsonNode::Integer(i) => Some(i),
            JsonNode::UInteger(u) => i64::try_from(u).ok(),
            JsonNode::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Some(f as i64)
            }
            _ => None,
        }
    }

    /// Float view of any numeric leaf.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            JsonNode::Integer(i) => Some(i as f64),
            JsonNode::UInteger(u) => Some(u as f64),
            JsonNode::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Lenient integer coercion for loosely typed API payloads.
    ///
    /// Numbers are truncated toward zero, numeric strings are parsed,
    /// booleans map to 0/1. `Missing` and `null` yield `None`.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            JsonNode::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            JsonNode::Str(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            }
            JsonNode::Bool(b) => Some(i64::from(*b)),
            other => other.as_i64(),
        }
    }

    /// Lenient float coercion: numbers, numeric strings, booleans.
    pub fn to_double(&self) -> Option<f64> {
        match self {
            JsonNode::Str(s) => s.trim().parse().ok(),
            JsonNode::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            other => other.as_f64(),
        }
    }

    /// Text form of a leaf: strings as-is, numbers and booleans formatted,
    /// `null` and `Missing` empty. Containers yield `None`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            JsonNode::Missing | JsonNode::Null => Some(String::new()),
            JsonNode::Bool(b) => Some(b.to_string()),
            JsonNode::Integer(i) => Some(i.to_string()),
            JsonNode::UInteger(u) => Some(u.to_string()),
            JsonNode::Float(f) => Some(f.to_string()),
            JsonNode::Str(s) => Some(s.clone()),
            JsonNode::Array(_) | JsonNode::Object(_) => None,
        }
    }

    /// Short name of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            JsonNode::Missing => "missing",
            JsonNode::Null => "null",
            JsonNode::Bool(_) => "boolean",
            JsonNode::Integer(_) | JsonNode::UInteger(_) => "integer",
            JsonNode::Float(_) => "float",
            JsonNode::Str(_) => "string",
            JsonNode::Array(_) => "array",
            JsonNode::Object(_) => "object",
        }
    }
}

impl Index<&str> for JsonNode {
    type Output = JsonNode;

    fn index(&self, key: &str) -> &JsonNode {
        self.get(key)
    }
}

impl Index<usize> for JsonNode {
    type Output = JsonNode;

    fn index(&self, index: usize) -> &JsonNode {
        self.at(index)
    }
}

impl fmt::Display for JsonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = serde_json::Value::from(self.clone());
        write!(f, "{value}")
    }
}

impl From<JsonNode> for serde_json::Value {
    fn from(node: JsonNode) -> Self {
        match node {
            JsonNode::Missing | JsonNode::Null => serde_json::Value::Null,
            JsonNode::Bool(b) => serde_json::Value::Bool(b),
            JsonNode::Integer(i) => serde_json::json!(i),
            JsonNode::UInteger(u) => serde_json::json!(u),
            JsonNode::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonNode::Str(s) => serde_json::Value::String(s),
            JsonNode::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            JsonNode::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for JsonNode {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonNode::Null,
            serde_json::Value::Bool(b) => JsonNode::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    JsonNode::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    JsonNode::UInteger(u)
                } else {
                    JsonNode::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => JsonNode::Str(s),
            serde_json::Value::Array(arr) => {
                JsonNode::Array(arr.into_iter().map(JsonNode::from).collect())
            }
            serde_json::Value::Object(obj) => {
                JsonNode::Object(obj.into_iter().map(|(k, v)| (k, JsonNode::from(v))).collect())
            }
        }
    }
}
