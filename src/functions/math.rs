//! Math functions (`math::`).
//!
//! All of them take one array. Nulls in the array are skipped; any other
//! non-number makes the result null.

use super::{Call, Dispatch};
use crate::value::Value;

pub(super) const FUNCTIONS: &[&str] = &["avg", "max", "min", "sum"];

/// Call a math function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    if !FUNCTIONS.contains(&name) {
        return Ok(None);
    }
    if call.len() != 1 {
        return Ok(Some(Value::Null));
    }
    let Some(numbers) = numbers(&call.arg(0)?) else {
        return Ok(Some(Value::Null));
    };

    let result = match name {
        "sum" => Some(numbers.iter().sum()),
        "avg" if numbers.is_empty() => None,
        "avg" => Some(numbers.iter().sum::<f64>() / numbers.len() as f64),
        "min" => numbers.iter().copied().reduce(f64::min),
        "max" => numbers.iter().copied().reduce(f64::max),
        _ => None,
    };

    Ok(Some(result.map_or(Value::Null, Value::Number)))
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    let Value::Array(items) = value else {
        return None;
    };
    items
        .iter()
        .filter(|item| !item.is_null())
        .map(Value::as_f64)
        .collect()
}
