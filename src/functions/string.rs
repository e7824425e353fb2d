//! String functions (`string::`).

use super::{Call, Dispatch};
use crate::evaluator::Halt;
use crate::value::Value;

pub(super) const FUNCTIONS: &[&str] = &["lower", "split", "startsWith", "upper"];

/// Call a string function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    let result = match name {
        "lower" => lower(call)?,
        "upper" => upper(call)?,

        "split" => {
            if call.len() != 2 {
                return Ok(Some(Value::Null));
            }
            match (call.arg(0)?, call.arg(1)?) {
                (Value::String(s), Value::String(sep)) if sep.is_empty() => {
                    Value::Array(s.chars().map(|c| Value::String(c.to_string())).collect())
                }
                (Value::String(s), Value::String(sep)) => {
                    Value::Array(s.split(sep.as_str()).map(Value::from).collect())
                }
                _ => Value::Null,
            }
        }

        "startsWith" => {
            if call.len() != 2 {
                return Ok(Some(Value::Null));
            }
            match (call.arg(0)?, call.arg(1)?) {
                (Value::String(s), Value::String(prefix)) => Value::Boolean(s.starts_with(&prefix)),
                _ => Value::Null,
            }
        }

        _ => return Ok(None),
    };

    Ok(Some(result))
}

pub(super) fn lower(call: &Call<'_>) -> Result<Value, Halt> {
    map_string(call, str::to_lowercase)
}

pub(super) fn upper(call: &Call<'_>) -> Result<Value, Halt> {
    map_string(call, str::to_uppercase)
}

fn map_string(call: &Call<'_>, f: fn(&str) -> String) -> Result<Value, Halt> {
    if call.len() != 1 {
        return Ok(Value::Null);
    }
    Ok(match call.arg(0)? {
        Value::String(s) => Value::String(f(&s)),
        _ => Value::Null,
    })
}
