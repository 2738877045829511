use super::{Handler, JsonHandler};
use crate::context::{ReadContext, WriteContext};
use crate::shape::Shape;
use crate::value::Value;
use crate::JsonError;

/// Handles ordered collections, recursing through the context per element.
///
/// Besides [`Shape::Seq`] it claims [`Shape::Any`], reading `[`-led input as
/// a heterogeneous sequence.
#[derive(Debug, Clone)]
pub struct SequenceHandler {
    priority: i32,
}

impl Default for SequenceHandler {
    fn default() -> Self {
        Self { priority: 20 }
    }
}

impl JsonHandler for SequenceHandler {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    fn name(&self) -> &str {
        "sequence"
    }

    fn into_handler(self) -> Handler {
        Handler::Sequence(self)
    }

    fn claims(&self, shape: &Shape) -> bool {
        matches!(shape, Shape::Seq(_) | Shape::Any)
    }

    fn claims_value(&self, value: &Value) -> bool {
        matches!(value, Value::Seq(_))
    }

    fn write(&self, cx: &mut WriteContext<'_>, value: &Value) -> Result<(), JsonError> {
        let Value::Seq(items) = value else {
            return Err(JsonError::UnsupportedShape(value.kind_name()));
        };
        cx.guard_depth()?;
        if items.is_empty() {
            cx.out().push_str("[]");
            return Ok(());
        }
        let depth = cx.depth();
        cx.out().push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                cx.out().push(',');
            }
            cx.newline(depth);
            cx.write(item)?;
        }
        cx.newline(depth - 1);
        cx.out().push(']');
        Ok(())
    }

    fn try_read(&self, cx: &mut ReadContext<'_>, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError> {
        let elem: &Shape = match shape {
            Shape::Seq(elem) => elem,
            Shape::Any => &Shape::Any,
            _ => return Ok(false),
        };
        let next = cx.peek_token()?;
        if matches!(shape, Shape::Any) && next != b'[' {
            return Ok(false);
        }
        if cx.try_read_null()? {
            *slot = Value::Null;
            return Ok(true);
        }
        if next != b'[' {
            return Err(cx.mismatch(shape));
        }
        cx.guard_depth()?;
        cx.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            if cx.peek_token()? == b']' {
                cx.read_byte()?;
                break;
            }
            if !items.is_empty() {
                cx.expect(b',')?;
            }
            let mut item = elem.blank();
            cx.read_into(elem, &mut item)?;
            items.push(item);
        }
        *slot = Value::Seq(items);
        Ok(true)
    }
}
