//! Unqualified functions (`global::`).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use super::{Call, Dispatch, string_set};
use crate::evaluator::Halt;
use crate::value::{Value, format_datetime, format_number, parse_datetime};

pub(super) const FUNCTIONS: &[&str] = &[
    "after",
    "before",
    "coalesce",
    "count",
    "dateTime",
    "defined",
    "geo",
    "length",
    "lower",
    "now",
    "operation",
    "pt",
    "references",
    "round",
    "string",
    "upper",
];

/// Call a global function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    let result = match name {
        "after" => {
            if call.len() != 0 {
                return Ok(Some(Value::Null));
            }
            call.context()?.delta().after.clone()
        }

        "before" => {
            if call.len() != 0 {
                return Ok(Some(Value::Null));
            }
            call.context()?.delta().before.clone()
        }

        "coalesce" => {
            for i in 0..call.len() {
                let value = call.arg(i)?;
                if !value.is_null() {
                    return Ok(Some(value));
                }
            }
            Value::Null
        }

        "count" => match single(call)? {
            Some(Value::Array(items)) => Value::from(items.len()),
            _ => Value::Null,
        },

        "dateTime" => match single(call)? {
            Some(Value::String(s)) => parse_datetime(&s).map_or(Value::Null, Value::DateTime),
            Some(dt @ Value::DateTime(_)) => dt,
            _ => Value::Null,
        },

        "defined" => match single(call)? {
            Some(value) => Value::Boolean(!value.is_null()),
            None => Value::Null,
        },

        "geo" => match single(call)? {
            Some(value) if super::geo::is_geo(&value) => value,
            _ => Value::Null,
        },

        "length" => match single(call)? {
            Some(Value::String(s)) => Value::from(s.chars().count()),
            Some(Value::Array(items)) => Value::from(items.len()),
            _ => Value::Null,
        },

        "lower" => super::string::lower(call)?,
        "upper" => super::string::upper(call)?,

        "now" => {
            if call.len() != 0 {
                return Ok(Some(Value::Null));
            }
            Value::String(format_datetime(&call.context()?.now()))
        }

        "operation" => {
            if call.len() != 0 {
                return Ok(Some(Value::Null));
            }
            let delta = call.context()?.delta();
            let operation = match (delta.before.is_null(), delta.after.is_null()) {
                (true, false) => "create",
                (false, false) => "update",
                (false, true) => "delete",
                (true, true) => return Ok(Some(Value::Null)),
            };
            Value::from(operation)
        }

        "pt" => match single(call)? {
            Some(value) if super::pt::is_portable_text(&value) => value,
            _ => Value::Null,
        },

        "references" => references(call)?,

        "round" => round(call)?,

        "string" => match single(call)? {
            Some(Value::String(s)) => Value::String(s),
            Some(Value::Number(n)) => Value::String(format_number(n)),
            Some(Value::Boolean(b)) => Value::String(b.to_string()),
            Some(Value::DateTime(dt)) => Value::String(format_datetime(&dt)),
            _ => Value::Null,
        },

        _ => return Ok(None),
    };

    Ok(Some(result))
}

/// The only argument of a one-argument call; `None` for any other arity.
fn single(call: &Call<'_>) -> Result<Option<Value>, Halt> {
    if call.len() != 1 {
        return Ok(None);
    }
    call.arg(0).map(Some)
}

/// `references(ids...)`: does `@` contain a reference to any of the ids,
/// at any depth?
fn references(call: &Call<'_>) -> Result<Value, Halt> {
    if call.len() == 0 {
        return Ok(Value::Null);
    }
    let this = call.scope()?.this();

    let values = call.values()?;
    let mut ids = Vec::new();
    for value in &values {
        match string_set(value) {
            Some(set) => ids.extend(set),
            None => return Ok(Value::Null),
        }
    }

    Ok(Value::Boolean(contains_reference(this, &ids)))
}

fn contains_reference(value: &Value, ids: &[&str]) -> bool {
    if let Some(reference) = value.as_reference() {
        if ids.contains(&reference.id) {
            return true;
        }
    }
    match value {
        Value::Array(items) => items.iter().any(|item| contains_reference(item, ids)),
        Value::Object(fields) => fields.values().any(|field| contains_reference(field, ids)),
        _ => false,
    }
}

/// `round(n, precision?)`, half away from zero.
fn round(call: &Call<'_>) -> Result<Value, Halt> {
    if call.len() != 1 && call.len() != 2 {
        return Ok(Value::Null);
    }
    let Value::Number(n) = call.arg(0)? else {
        return Ok(Value::Null);
    };
    let precision = match call.arg(1)? {
        Value::Null => 0,
        value => match value.as_integer().and_then(|p| u32::try_from(p).ok()) {
            Some(p) => p,
            None => return Ok(Value::Null),
        },
    };

    let rounded = Decimal::from_f64(n)
        .map(|d| d.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64());
    Ok(match rounded {
        Some(r) => Value::Number(r),
        // out of Decimal range: already integral at any precision we could show
        None if n.is_finite() => Value::Number(n.round()),
        None => Value::Null,
    })
}
