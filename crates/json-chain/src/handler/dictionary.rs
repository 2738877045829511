use json_chain_tree::lex;

use super::{Handler, JsonHandler};
use crate::context::{ReadContext, WriteContext};
use crate::shape::Shape;
use crate::value::Value;
use crate::JsonError;

/// Handles string-keyed maps.
///
/// Not part of the default chain. Once added it also claims [`Shape::Any`]
/// for `{`-led input, which otherwise no built-in handler reads.
#[derive(Debug, Clone)]
pub struct DictionaryHandler {
    priority: i32,
}

impl Default for DictionaryHandler {
    fn default() -> Self {
        Self { priority: 50 }
    }
}

impl JsonHandler for DictionaryHandler {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    fn name(&self) -> &str {
        "dictionary"
    }

    fn into_handler(self) -> Handler {
        Handler::Dictionary(self)
    }

    fn claims(&self, shape: &Shape) -> bool {
        matches!(shape, Shape::Map(_) | Shape::Any)
    }

    fn claims_value(&self, value: &Value) -> bool {
        matches!(value, Value::Map(_))
    }

    fn write(&self, cx: &mut WriteContext<'_>, value: &Value) -> Result<(), JsonError> {
        let Value::Map(entries) = value else {
            return Err(JsonError::UnsupportedShape(value.kind_name()));
        };
        cx.guard_depth()?;
        if entries.is_empty() {
            cx.out().push_str("{}");
            return Ok(());
        }
        let depth = cx.depth();
        cx.out().push('{');
        for (i, (key, entry)) in entries.iter().enumerate() {
            if i > 0 {
                cx.out().push(',');
            }
            cx.newline(depth);
            cx.write_key(key);
            cx.write(entry)?;
        }
        cx.newline(depth - 1);
        cx.out().push('}');
        Ok(())
    }

    fn try_read(&self, cx: &mut ReadContext<'_>, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError> {
        let elem: &Shape = match shape {
            Shape::Map(elem) => elem,
            Shape::Any => &Shape::Any,
            _ => return Ok(false),
        };
        let next = cx.peek_token()?;
        if matches!(shape, Shape::Any) && next != b'{' {
            return Ok(false);
        }
        if cx.try_read_null()? {
            *slot = Value::Null;
            return Ok(true);
        }
        if next != b'{' {
            return Err(cx.mismatch(shape));
        }
        cx.guard_depth()?;
        cx.expect(b'{')?;
        let mut entries: Vec<(String, Value)> = Vec::new();
        loop {
            if cx.peek_token()? == b'}' {
                cx.read_byte()?;
                break;
            }
            if !entries.is_empty() {
                cx.expect(b',')?;
                cx.peek_token()?;
            }
            let key = lex::read_string(cx.input())?;
            cx.expect(b':')?;
            let mut entry = elem.blank();
            cx.read_into(elem, &mut entry)?;
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => *existing = entry,
                None => entries.push((key, entry)),
            }
        }
        *slot = Value::Map(entries);
        Ok(true)
    }
}
