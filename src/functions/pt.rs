//! Portable text functions (`pt::`).

use super::{Call, Dispatch};
use crate::value::Value;

pub(super) const FUNCTIONS: &[&str] = &["text"];

/// Call a portable text function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    let result = match name {
        "text" => {
            if call.len() != 1 {
                return Ok(Some(Value::Null));
            }
            text(&call.arg(0)?)
        }
        _ => return Ok(None),
    };

    Ok(Some(result))
}

/// A block object, or an array made only of block objects.
pub(super) fn is_portable_text(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(is_block),
        other => is_block(other),
    }
}

fn is_block(value: &Value) -> bool {
    value.as_object().is_some() && value.get("_type").and_then(Value::as_str).is_some()
}

/// Plain text of the blocks: span texts concatenated, blocks separated by a
/// blank line. Non-text blocks are skipped.
fn text(value: &Value) -> Value {
    if !is_portable_text(value) {
        return Value::Null;
    }
    let blocks = match value {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    let paragraphs: Vec<String> = blocks
        .iter()
        .filter(|block| block.get("_type").and_then(Value::as_str) == Some("block"))
        .filter_map(|block| block.get("children").and_then(Value::as_array))
        .map(|children| {
            children
                .iter()
                .filter_map(|child| child.get("text").and_then(Value::as_str))
                .collect()
        })
        .collect();

    Value::String(paragraphs.join("\n\n"))
}
