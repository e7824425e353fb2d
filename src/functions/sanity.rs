//! Project information (`sanity::`).

use super::{Call, Dispatch};
use crate::value::Value;

pub(super) const FUNCTIONS: &[&str] = &["dataset", "projectId"];

/// Call a project function. Returns None if function not found.
pub(super) fn call(name: &str, call: &Call<'_>) -> Dispatch {
    if !FUNCTIONS.contains(&name) {
        return Ok(None);
    }
    if call.len() != 0 {
        return Ok(Some(Value::Null));
    }

    let client = call.context()?.client();
    let result = match name {
        "projectId" => Value::from(client.project_id.as_str()),
        _ => Value::from(client.dataset.as_str()),
    };

    Ok(Some(result))
}
