//! Pipe functions (`base | name(args)`).

use std::cmp::Ordering;

use super::{Call, Dispatch};
use crate::ast::ExprNode;
use crate::evaluator::Halt;
use crate::value::Value;

pub(super) const FUNCTIONS: &[&str] = &["order"];

/// Call a pipe function. Returns None if function not found.
pub(super) fn call(name: &str, base: Value, call: &Call<'_>) -> Dispatch {
    let result = match name {
        "order" => order(base, call)?,
        _ => return Ok(None),
    };

    Ok(Some(result))
}

/// Stable sort by one or more keys, each evaluated with the element as `@`.
/// Nulls go last whatever the direction.
fn order(base: Value, call: &Call<'_>) -> Result<Value, Halt> {
    let Value::Array(items) = base else {
        return Ok(Value::Null);
    };
    if call.len() == 0 {
        return Ok(Value::Null);
    }
    let scope = call.scope()?;

    let keys: Vec<(&ExprNode, bool)> = call
        .nodes()
        .iter()
        .map(|node| match node {
            ExprNode::Asc { base } => (&**base, false),
            ExprNode::Desc { base } => (&**base, true),
            other => (other, false),
        })
        .collect();

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let frame = scope.nested(item)?;
        let sort_values = keys
            .iter()
            .map(|(node, _)| call.evaluate_in(node, &frame))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push((sort_values, frame.into_this()));
    }

    rows.sort_by(|(a, _), (b, _)| {
        a.iter()
            .zip(b)
            .zip(&keys)
            .map(|((x, y), (_, descending))| compare_keys(x, y, *descending))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    Ok(Value::Array(rows.into_iter().map(|(_, item)| item).collect()))
}

fn compare_keys(a: &Value, b: &Value, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = total_order(a, b);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

/// Order across types: booleans, numbers, strings, date-times, then the rest.
fn total_order(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Boolean(_) => 0,
            Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::DateTime(_) => 3,
            _ => 4,
        }
    }

    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
