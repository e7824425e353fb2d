//! Execute GROQ queries against a JSON dataset

use super::CliError;
use crate::functions::unknown_functions;
use crate::{Context, Evaluator, ExprNode, QueryLimits, Value, parse_with_limits};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The GROQ query to execute
    pub query: String,
    /// Dataset as a JSON array or NDJSON; an empty dataset when absent
    pub input: Option<String>,
    /// Query parameters as `name=<json>`
    pub params: Vec<String>,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
    /// Resource limits for parsing and evaluation
    pub limits: QueryLimits,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid(ExprNode),
    /// Query executed successfully
    Success(Value),
}

/// Execute a groq check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let ast = parse_with_limits(&options.query, options.limits)?;

    for name in unknown_functions(&ast) {
        tracing::warn!(function = %name, "unknown function, it will evaluate to null");
    }

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(ast));
    }

    let dataset = match &options.input {
        Some(input) => load_dataset(input)?,
        None => Vec::new(),
    };
    let params = options
        .params
        .iter()
        .map(|param| parse_param(param))
        .collect::<Result<Vec<_>, _>>()?;

    let context = Context::new(dataset).with_parameters(params);
    let result = Evaluator::with_limits(options.limits).evaluate(&ast, &context)?;

    Ok(CheckResult::Success(result))
}

/// Read a dataset given either as one JSON array or as one JSON document per
/// line. A single JSON object is a one-document dataset.
pub fn load_dataset(input: &str) -> Result<Vec<Value>, CliError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let documents: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
        return Ok(documents.into_iter().map(Value::from).collect());
    }
    if let Ok(document) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return Ok(vec![Value::from(document)]);
    }

    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<serde_json::Value>(line)
                .map(Value::from)
                .map_err(|source| CliError::Dataset { line: i + 1, source })
        })
        .collect()
}

/// Split `name=<json>` into a parameter. A value that is not valid JSON is
/// taken as a plain string.
pub fn parse_param(param: &str) -> Result<(String, Value), CliError> {
    let Some((name, raw)) = param.split_once('=') else {
        return Err(CliError::Param(param.to_string()));
    };
    if name.is_empty() {
        return Err(CliError::Param(param.to_string()));
    }

    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw));
    Ok((name.to_string(), value))
}
