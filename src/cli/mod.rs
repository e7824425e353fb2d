//! CLI support for groq-lang
//!
//! Provides programmatic access to the `groq` command line functionality for
//! embedding in other tools.

mod check;

pub use check::{CheckOptions, CheckResult, execute_check, load_dataset, parse_param};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid dataset line {line}: {source}")]
    Dataset {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid parameter `{0}`: expected name=<json>")]
    Param(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
