//! Date-time functions (`dateTime::`).

use super::{Call, Dispatch};
use crate::value::Value;

pub(super) const FUNCTIONS: &[&str] = &["now"];

/// Call a date-time function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    let result = match name {
        // unlike global::now() this is a date-time value, usable in arithmetic
        "now" if call.len() == 0 => Value::DateTime(call.context()?.now()),
        "now" => Value::Null,
        _ => return Ok(None),
    };

    Ok(Some(result))
}
