//! Array functions (`array::`).

use super::{Call, Dispatch};
use crate::evaluator::equals;
use crate::value::{Value, format_number};

pub(super) const FUNCTIONS: &[&str] = &["compact", "intersects", "join", "unique"];

/// Call an array function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    let result = match name {
        "compact" => {
            if call.len() != 1 {
                return Ok(Some(Value::Null));
            }
            match call.arg(0)? {
                Value::Array(items) => {
                    Value::Array(items.into_iter().filter(|item| !item.is_null()).collect())
                }
                _ => Value::Null,
            }
        }

        "join" => {
            if call.len() != 2 {
                return Ok(Some(Value::Null));
            }
            match (call.arg(0)?, call.arg(1)?) {
                (Value::Array(items), Value::String(separator)) => join(&items, &separator),
                _ => Value::Null,
            }
        }

        "unique" => {
            if call.len() != 1 {
                return Ok(Some(Value::Null));
            }
            match call.arg(0)? {
                Value::Array(items) => {
                    let mut seen: Vec<Value> = Vec::with_capacity(items.len());
                    for item in items {
                        if !seen.iter().any(|s| equals(s, &item)) {
                            seen.push(item);
                        }
                    }
                    Value::Array(seen)
                }
                _ => Value::Null,
            }
        }

        "intersects" => {
            if call.len() != 2 {
                return Ok(Some(Value::Null));
            }
            match (call.arg(0)?, call.arg(1)?) {
                (Value::Array(left), Value::Array(right)) => Value::Boolean(
                    left.iter()
                        .any(|l| right.iter().any(|r| equals(l, r))),
                ),
                _ => Value::Null,
            }
        }

        _ => return Ok(None),
    };

    Ok(Some(result))
}

/// Join scalars with a separator; any non-scalar element makes it null.
fn join(items: &[Value], separator: &str) -> Value {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let part = match item {
            Value::String(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Boolean(b) => b.to_string(),
            _ => return Value::Null,
        };
        parts.push(part);
    }
    Value::String(parts.join(separator))
}
