use std::mem;

use json_chain_tree::lex;
use log::trace;

use super::{Handler, JsonHandler};
use crate::context::{ReadContext, WriteContext};
use crate::shape::{RecordSchema, Shape};
use crate::value::{RecordRef, Value};
use crate::JsonError;

/// Handles records, member by member.
///
/// Only members of the kind selected by
/// [`JsonOptions::use_property`](crate::JsonOptions::use_property) are
/// written and matched on read. Input keys are matched exactly first, then
/// case-insensitively; keys matching no member are skipped.
#[derive(Debug, Clone)]
pub struct CompositeHandler {
    priority: i32,
}

impl Default for CompositeHandler {
    fn default() -> Self {
        Self { priority: 100 }
    }
}

impl JsonHandler for CompositeHandler {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    fn name(&self) -> &str {
        "composite"
    }

    fn into_handler(self) -> Handler {
        Handler::Composite(self)
    }

    fn claims(&self, shape: &Shape) -> bool {
        matches!(shape, Shape::Record(_))
    }

    fn claims_value(&self, value: &Value) -> bool {
        matches!(value, Value::Record(_))
    }

    fn write(&self, cx: &mut WriteContext<'_>, value: &Value) -> Result<(), JsonError> {
        let Value::Record(record) = value else {
            return Err(JsonError::UnsupportedShape(value.kind_name()));
        };
        cx.guard_depth()?;
        let kind = cx.options().member_kind();
        let record = record.borrow();
        let depth = cx.depth();
        let mut empty = true;
        cx.out().push('{');
        for (member, member_value) in record.members_of(kind) {
            if !empty {
                cx.out().push(',');
            }
            empty = false;
            cx.newline(depth);
            cx.write_key(&member.name);
            cx.write(member_value)?;
        }
        if !empty {
            cx.newline(depth - 1);
        }
        cx.out().push('}');
        Ok(())
    }

    fn try_read(&self, cx: &mut ReadContext<'_>, shape: &Shape, slot: &mut Value) -> Result<bool, JsonError> {
        let Shape::Record(schema) = shape else {
            return Ok(false);
        };
        if cx.try_read_null()? {
            *slot = Value::Null;
            return Ok(true);
        }
        if cx.peek_token()? != b'{' {
            return Err(cx.mismatch(shape));
        }
        cx.guard_depth()?;
        cx.expect(b'{')?;

        let record = match slot {
            Value::Record(r) if RecordSchema::same(&r.schema(), schema) => r.clone(),
            _ => RecordRef::blank(schema.clone()),
        };
        *slot = Value::Record(record.clone());

        let kind = cx.options().member_kind();
        let mut first = true;
        loop {
            if cx.peek_token()? == b'}' {
                cx.read_byte()?;
                break;
            }
            if !first {
                cx.expect(b',')?;
                cx.peek_token()?;
            }
            first = false;
            let key = lex::read_string(cx.input())?;
            cx.expect(b':')?;
            let Some(index) = schema.find(kind, &key) else {
                trace!("skip unknown key {key:?} of {}", schema.name);
                cx.skip_value()?;
                continue;
            };
            // No borrow is held across the nested read: the member may refer
            // back to this record.
            let mut member = record
                .borrow_mut()
                .value_at_mut(index)
                .map(mem::take)
                .unwrap_or_default();
            let result = cx.read_into(&schema.members[index].shape, &mut member);
            if let Some(stored) = record.borrow_mut().value_at_mut(index) {
                *stored = member;
            }
            result?;
        }
        Ok(true)
    }
}
