//! JSON output for query results.
//!
//! Results are rendered through [`Value`]'s `Serialize` implementation, so the
//! text matches what a host would get from `serde_json` directly:
//!
//! - **Compact output** via [`to_json()`]
//! - **Pretty output** via [`to_json_pretty()`] with 2-space indentation
//! - **Key order** - object keys keep the order the query produced them in
//! - **Numbers** - whole numbers print without a fraction, non-finite ones as `null`
//! - **Date-times** - ISO-8601 strings in UTC
//!
//! # Examples
//!
//! ```
//! use groq_lang::Value;
//! use groq_lang::output::{to_json, to_json_pretty};
//!
//! let value = Value::from(vec![Value::from(1), Value::from("a")]);
//!
//! assert_eq!(to_json(&value), r#"[1,"a"]"#);
//! assert_eq!(to_json_pretty(&value), "[\n  1,\n  \"a\"\n]");
//! ```

use crate::value::Value;

/// Convert a value to compact JSON.
pub fn to_json(value: &Value) -> String {
    // a `Value` always has string keys, so serialization cannot fail
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Convert a value to indented JSON.
pub fn to_json_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
