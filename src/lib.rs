//! # groq-lang
//!
//! A GROQ parser and evaluator. Queries are normalized, parsed into an
//! [`ExprNode`] tree, and evaluated against an in-memory [`Context`] holding
//! the dataset, parameters and change delta.
//!
//! ```
//! use groq_lang::{Context, Value, query};
//! use serde_json::json;
//!
//! let dataset = vec![
//!     Value::from(json!({"_id": "m1", "_type": "movie", "title": "Alien", "year": 1979})),
//!     Value::from(json!({"_id": "m2", "_type": "movie", "title": "Aliens", "year": 1986})),
//! ];
//! let context = Context::new(dataset).with_parameter("from", 1980);
//!
//! let titles = query("*[_type == 'movie' && year >= $from].title", &context).unwrap();
//! assert_eq!(titles, Value::from(json!(["Aliens"])));
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod normalizer;
pub mod output;
pub mod parser;
pub mod scope;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ArrayElement, BinOp, ExprNode, ObjectAttribute};
pub use config::QueryLimits;
pub use error::{DocumentError, EvalError, GroqError, GroqResult, NormalizeError, ParseError};
pub use evaluator::{Constant, Evaluator, evaluate};
pub use normalizer::normalize;
pub use output::{to_json, to_json_pretty};
pub use parser::{Parser, parse, parse_with_limits};
pub use scope::{Client, Context, Delta, Scope, validate_document};
pub use value::{Map, Reference, Value};

/// Parse and evaluate a query in one step, with the default limits.
pub fn query(query: &str, context: &Context) -> GroqResult<Value> {
    let ast = parse(query)?;
    Ok(evaluate(&ast, context)?)
}

/// Parse and evaluate a query in one step, with explicit limits.
pub fn query_with_limits(query: &str, context: &Context, limits: QueryLimits) -> GroqResult<Value> {
    let ast = parse_with_limits(query, limits)?;
    Ok(Evaluator::with_limits(limits).evaluate(&ast, context)?)
}
