use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use json_chain_tree::lex::{self, Number};
use json_chain_util::quote_into;
use serde::{Deserialize, Serialize};

use super::{Handler, JsonHandler};
use crate::context::{ReadContext, WriteContext};
use crate::shape::Shape;
use crate::value::{EnumValue, Value};
use crate::JsonError;

/// How date/time values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// Quoted RFC 3339 text in UTC.
    #[default]
    Rfc3339,
    /// Unquoted milliseconds since the Unix epoch.
    UnixMillis,
}

/// Handles null, booleans, numbers, strings, chars, enums and date/times.
#[derive(Debug, Clone)]
pub struct ScalarHandler {
    priority: i32,
    /// Write enums as their ordinal instead of their label.
    pub enum_as_ordinal: bool,
    pub date_format: DateFormat,
}

impl Default for ScalarHandler {
    fn default() -> Self {
        Self {
            priority: 10,
            enum_as_ordinal: false,
            date_format: DateFormat::default(),
        }
    }
}

/// Integral floats below this magnitude are written without a fraction.
const INTEGRAL_FLOAT_LIMIT: f64 = 1e15;

fn format_float(out: &mut String, f: f64) {
    if !f.is_finite() {
        out.push_str("null");
    } else if f == 0.0 && f.is_sign_negative() {
        out.push_str("-0");
    } else if f.fract() == 0.0 && f.abs() < INTEGRAL_FLOAT_LIMIT {
        out.push_str(&(f as i64).to_string());
    } else {
        // Debug is the shortest representation that parses back exactly.
        out.push_str(&format!("{f:?}"));
    }
}

fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

impl ScalarHandler {
    fn read_integer(&self, cx: &mut ReadContext<'_>, shape: &Shape) -> Result<Value, JsonError> {
        if !matches!(cx.peek_token()?, b'-' | b'0'..=b'9') {
            return Err(cx.mismatch(shape));
        }
        let reader = cx.input();
        let token = lex::scan_number(reader)?;
        let text = token.text(reader);
        let value = match shape {
            Shape::UInt => text
                .parse::<u64>()
                .ok()
                .or_else(|| integral(text).filter(|f| *f >= 0.0 && *f < u64::MAX as f64).map(|f| f as u64))
                .map(Value::UInt),
            _ => text
                .parse::<i64>()
                .ok()
                .or_else(|| integral(text).filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64).map(|f| f as i64))
                .map(Value::Int),
        };
        value.ok_or_else(|| JsonError::mismatch(shape, format!("number {text} at offset {}", token.start)))
    }

    fn read_float(&self, cx: &mut ReadContext<'_>) -> Result<Value, JsonError> {
        if !matches!(cx.peek_token()?, b'-' | b'0'..=b'9') {
            return Err(cx.mismatch(&Shape::Float));
        }
        let reader = cx.input();
        let token = lex::scan_number(reader)?;
        let text = token.text(reader);
        text.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| JsonError::mismatch(Shape::Float, format!("number {text} at offset {}", token.start)))
    }

    fn read_str(&self, cx: &mut ReadContext<'_>) -> Result<Value, JsonError> {
        match cx.peek_token()? {
            b'"' => Ok(Value::Str(lex::read_string(cx.input())?)),
            b't' | b'f' => Ok(Value::Str(lex::read_bool(cx.input())?.to_string())),
            b'-' | b'0'..=b'9' => {
                let reader = cx.input();
                let token = lex::scan_number(reader)?;
                Ok(Value::Str(token.text(reader).to_owned()))
            }
            _ => Err(cx.mismatch(&Shape::Str)),
        }
    }

    fn read_char(&self, cx: &mut ReadContext<'_>) -> Result<Value, JsonError> {
        if cx.peek_token()? != b'"' {
            return Err(cx.mismatch(&Shape::Char));
        }
        let offset = cx.input().position();
        let text = lex::read_string(cx.input())?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Char(c)),
            _ => Err(JsonError::mismatch(
                Shape::Char,
                format!("string of length {} at offset {offset}", text.chars().count()),
            )),
        }
    }

    fn read_enum(&self, cx: &mut ReadContext<'_>, shape: &Shape) -> Result<Value, JsonError> {
        let Shape::Enum(schema) = shape else {
            return Err(cx.mismatch(shape));
        };
        let next = cx.peek_token()?;
        let offset = cx.input().position();
        let found = match next {
            b'"' => {
                let label = lex::read_string(cx.input())?;
                match EnumValue::from_label(schema.clone(), &label) {
                    Some(e) => return Ok(Value::Enum(e)),
                    None => format!("label {label:?}"),
                }
            }
            b'-' | b'0'..=b'9' => {
                let reader = cx.input();
                let token = lex::scan_number(reader)?;
                let text = token.text(reader);
                match text.parse().ok().and_then(|i| EnumValue::new(schema.clone(), i)) {
                    Some(e) => return Ok(Value::Enum(e)),
                    None => format!("ordinal {text}"),
                }
            }
            _ => return Err(cx.mismatch(shape)),
        };
        Err(JsonError::mismatch(shape, format!("{found} at offset {offset}")))
    }

    fn read_date_time(&self, cx: &mut ReadContext<'_>) -> Result<Value, JsonError> {
        let next = cx.peek_token()?;
        let offset = cx.input().position();
        let parsed = match next {
            b'"' => {
                let text = lex::read_string(cx.input())?;
                parse_date_time(&text).ok_or_else(|| format!("string {text:?}"))
            }
            b'-' | b'0'..=b'9' => {
                let reader = cx.input();
                let token = lex::scan_number(reader)?;
                let text = token.text(reader);
                text.parse()
                    .ok()
                    .and_then(DateTime::from_timestamp_millis)
                    .ok_or_else(|| format!("number {text}"))
            }
            _ => return Err(cx.mismatch(&Shape::DateTime)),
        };
        parsed
            .map(Value::DateTime)
            .map_err(|found| JsonError::mismatch(Shape::DateTime, format!("{found} at offset {offset}")))
    }

    /// Any scalar token, in its natural representation.
    fn read_any(&self, cx: &mut ReadContext<'_>) -> Result<Value, JsonError> {
        Ok(match cx.peek_token()? {
            b'"' => Value::Str(lex::read_string(cx.input())?),
            b't' | b'f' => Value::Bool(lex::read_bool(cx.input())?),
            b'-' | b'0'..=b'9' => match lex::read_number(cx.input())? {
                Number::Integer(i) => Value::Int(i),
                Number::UInteger(u) => Value::UInt(u),
                Number::Float(f) => Value::Float(f),
            },
            _ => return Err(cx.mismatch(&Shape::Any)),
        })
    }
}

/// Value of a float token that holds an integral number, like `3.0` or `1e3`.
fn integral(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|f| f.fract() == 0.0)
}

impl JsonHandler for ScalarHandler {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    fn name(&self) -> &str {
        "scalar"
    }

    fn into_handler(self) -> Handler {
        Handler::Scalar(self)
    }

    fn claims(&self, shape: &Shape) -> bool {
        matches!(
            shape,
            Shape::Any
                | Shape::Bool
                | Shape::Int
                | Shape::UInt
                | Shape::Float
                | Shape::Str
                | Shape::Char
                | Shape::Enum(_)
                | Shape::DateTime
        )
    }

    fn claims_value(&self, value: &Value) -> bool {
        matches!(
            value,
            Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::UInt(_)
                | Value::Float(_)
                | Value::Str(_)
                | Value::Char(_)
                | Value::Enum(_)
                | Value::DateTime(_)
        )
    }

    fn write(&self, cx: &mut WriteContext<'_>, value: &Value) -> Result<(), JsonError> {
        let out = cx.out();
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::UInt(u) => out.push_str(&u.to_string()),
            Value::Float(f) => format_float(out, *f),
            Value::Str(s) => quote_into(out, s),
            Value::Char(c) => quote_into(out, c.encode_utf8(&mut [0; 4])),
            Value::Enum(e) if self.enum_as_ordinal => out.push_str(&e.index().to_string()),
            Value::Enum(e) => quote_into(out, e.label()),
            Value::DateTime(dt) => match self.date_format {
                DateFormat::Rfc3339 => quote_into(out, &dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
                DateFormat::UnixMillis => out.push_str(&dt.timestamp_millis().to_string()),
            },
            other => return Err(JsonError::UnsupportedShape(other.kind_name())),
        }
        Ok(())
    }

    fn try_read(&self, cx: &mut ReadContext<'_>, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError> {
        if !self.claims(shape) {
            return Ok(false);
        }
        let next = cx.peek_token()?;
        if matches!(shape, Shape::Any) && matches!(next, b'[' | b'{') {
            return Ok(false);
        }
        if cx.try_read_null()? {
            *slot = Value::Null;
            return Ok(true);
        }
        *slot = match shape {
            Shape::Bool => match next {
                b't' | b'f' => Value::Bool(lex::read_bool(cx.input())?),
                _ => return Err(cx.mismatch(shape)),
            },
            Shape::Int | Shape::UInt => self.read_integer(cx, shape)?,
            Shape::Float => self.read_float(cx)?,
            Shape::Str => self.read_str(cx)?,
            Shape::Char => self.read_char(cx)?,
            Shape::Enum(_) => self.read_enum(cx, shape)?,
            Shape::DateTime => self.read_date_time(cx)?,
            Shape::Any => self.read_any(cx)?,
            _ => return Ok(false),
        };
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Json;
    use chrono::TimeZone;
    use json_chain_buffers::Reader;

    fn write(value: impl Into<Value>) -> String {
        Json::new().write_to_string(&value.into()).unwrap()
    }

    fn read(text: &str, shape: Shape) -> Result<Value, JsonError> {
        let mut json = Json::new();
        json.set_input(text);
        json.read(&shape)
    }

    #[test]
    fn test_format_float() {
        assert_eq!(write(3.0), "3");
        assert_eq!(write(-0.5), "-0.5");
        assert_eq!(write(0.1), "0.1");
        assert_eq!(write(1e20), "1e20");
        assert_eq!(write(-0.0), "-0");
        assert_eq!(write(0.0), "0");
        assert_eq!(write(f64::NAN), "null");
        assert_eq!(write(f64::NEG_INFINITY), "null");
    }

    #[test]
    fn test_write_text() {
        assert_eq!(write("a\"b\n"), r#""a\"b\n""#);
        assert_eq!(write('é'), r#""é""#);
        assert_eq!(write(u64::MAX), "18446744073709551615");
    }

    #[test]
    fn test_read_numbers() {
        assert_eq!(read("42", Shape::Int).unwrap(), Value::Int(42));
        assert_eq!(read("4.0", Shape::Int).unwrap(), Value::Int(4));
        assert_eq!(read("1e3", Shape::UInt).unwrap(), Value::UInt(1000));
        assert_eq!(read("7", Shape::Float).unwrap(), Value::Float(7.0));
        let zero = read(&write(-0.0), Shape::Float).unwrap().as_f64().unwrap();
        assert!(zero == 0.0 && zero.is_sign_negative());
        assert!(matches!(read("4.5", Shape::Int), Err(JsonError::ShapeMismatch { .. })));
        assert!(matches!(read("-1", Shape::UInt), Err(JsonError::ShapeMismatch { .. })));
        assert!(matches!(read("\"4\"", Shape::Int), Err(JsonError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_read_null_into_scalar() {
        assert_eq!(read("null", Shape::Int).unwrap(), Value::Null);
        assert_eq!(read(" null", Shape::Str).unwrap(), Value::Null);
    }

    #[test]
    fn test_mismatch_names_token_and_offset() {
        let err = read("  true", Shape::Float).unwrap_err();
        assert_eq!(err.to_string(), "expected float, found boolean at offset 2");
    }

    #[test]
    fn test_char() {
        assert_eq!(read("\"x\"", Shape::Char).unwrap(), Value::Char('x'));
        let err = read("\"xy\"", Shape::Char).unwrap_err();
        assert_eq!(err.to_string(), "expected char, found string of length 2 at offset 0");
    }

    #[test]
    fn test_str_accepts_number_and_bool_text() {
        assert_eq!(read("12.50", Shape::Str).unwrap(), Value::Str("12.50".into()));
        assert_eq!(read("false", Shape::Str).unwrap(), Value::Str("false".into()));
    }

    #[test]
    fn test_enum_label_and_ordinal() {
        let color = crate::EnumSchema::new("Color", ["Red", "Green", "Blue"]);
        let shape = Shape::Enum(color.clone());
        let blue = Value::Enum(EnumValue::new(color.clone(), 2).unwrap());
        assert_eq!(read("\"Blue\"", shape.clone()).unwrap(), blue);
        assert_eq!(read("\"blue\"", shape.clone()).unwrap(), blue);
        assert_eq!(read("2", shape.clone()).unwrap(), blue);
        assert!(matches!(read("3", shape.clone()), Err(JsonError::ShapeMismatch { .. })));
        assert!(matches!(read("\"Pink\"", shape), Err(JsonError::ShapeMismatch { .. })));

        let mut json = Json::new();
        assert_eq!(json.write_to_string(&blue).unwrap(), "\"Blue\"");
        json.get_handler_mut::<ScalarHandler>().unwrap().enum_as_ordinal = true;
        assert_eq!(json.write_to_string(&blue).unwrap(), "2");
    }

    #[test]
    fn test_date_time_formats() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(write(dt), "\"2024-05-01T08:30:00Z\"");
        assert_eq!(read("\"2024-05-01T10:30:00+02:00\"", Shape::DateTime).unwrap(), Value::DateTime(dt));
        assert_eq!(read("\"2024-05-01 08:30:00\"", Shape::DateTime).unwrap(), Value::DateTime(dt));
        assert_eq!(read("1714552200000", Shape::DateTime).unwrap(), Value::DateTime(dt));

        let mut json = Json::new();
        json.get_handler_mut::<ScalarHandler>().unwrap().date_format = DateFormat::UnixMillis;
        assert_eq!(json.write_to_string(&Value::DateTime(dt)).unwrap(), "1714552200000");
    }

    #[test]
    fn test_any_declines_containers() {
        assert_eq!(read("-3", Shape::Any).unwrap(), Value::Int(-3));
        assert_eq!(read("\"s\"", Shape::Any).unwrap(), Value::Str("s".into()));

        let handler = ScalarHandler::default();
        let chain = [Handler::Scalar(handler.clone())];
        let opts = crate::JsonOptions::default();
        let mut input = Reader::from(" {}");
        let mut cx = ReadContext::new(&chain, &opts, &mut input);
        let mut slot = Value::Null;
        assert!(!handler.try_read(&mut cx, &Shape::Any, &mut slot).unwrap());
        assert_eq!(cx.input().peek(), Some(b'{'));
    }
}
