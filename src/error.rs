//! Error types for groq-lang.
//!
//! Only two things can go wrong from a caller's point of view: the query text
//! does not parse, or evaluation ran into one of the configured resource
//! limits. Every semantic mismatch during evaluation is a `null` value, not an
//! error.

use thiserror::Error;

/// The normalizer could not produce a canonical query string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unterminated string literal starting at position {0}")]
    UnterminatedString(usize),

    #[error("unicode escape sequences are not supported (position {0})")]
    UnsupportedEscape(usize),
}

/// The query text does not match the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("syntax error: `{query}` does not match the GROQ grammar")]
    Syntax { query: String },

    #[error("query nesting exceeds the configured limit of {0}")]
    DepthExceeded(usize),
}

/// Hard evaluation failures. These are resource limits, never data shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("expression nesting exceeds the configured limit of {0}")]
    DepthExceeded(usize),

    #[error("scope chain exceeds the configured limit of {0}")]
    ScopeDepthExceeded(usize),
}

/// A dataset document is missing one of the fields every document carries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("expected a document object, found {0}")]
    NotAnObject(&'static str),

    #[error("document has no string `{0}` field")]
    MissingField(&'static str),
}

/// Error returned by [`crate::query`], which parses and evaluates in one go.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroqError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Result type for one-shot query execution
pub type GroqResult<T> = Result<T, GroqError>;

impl serde::Serialize for GroqError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
