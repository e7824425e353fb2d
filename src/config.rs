//! Resource limits for parsing and evaluation.
//!
//! Parsing and evaluation are both recursive, so a pathologically nested query
//! (or a deeply nested dataset walked by nested filters) could otherwise run
//! the stack dry. The limits turn that into a reported error.

use serde::{Deserialize, Serialize};

/// Configuration for query parsing and evaluation limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    /// Maximum recursion depth of the parser (default: 256)
    ///
    /// This bounds parser frames, not visible nesting. Every operator of a
    /// chain at one precedence level (`a && b && c`) and every traversal step
    /// (`.x`, `[0]`, `->`, `{...}`) takes a frame, and a bracketed group takes
    /// one frame per precedence level, about nine. A flat filter with a few
    /// hundred `&&` conditions needs a larger value.
    pub max_parse_depth: usize,
    /// Maximum expression nesting walked by the evaluator (default: 512)
    pub max_eval_depth: usize,
    /// Maximum length of the scope chain (default: 256)
    pub max_scope_depth: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_parse_depth: 256,
            max_eval_depth: 512,
            max_scope_depth: 256,
        }
    }
}

impl QueryLimits {
    /// Use the same bound for every limit.
    pub fn uniform(depth: usize) -> Self {
        Self {
            max_parse_depth: depth,
            max_eval_depth: depth,
            max_scope_depth: depth,
        }
    }
}
