//! Built-in functions.
//!
//! Ordinary functions are grouped by namespace; an unqualified call such as
//! `count(*)` lives in `global`. Pipe functions (`x | order(k)`) form their own
//! surface. Every function is total: wrong arity or argument types give
//! `null`.
//!
//! Each namespace module exposes `call(name, call)`, returning `Ok(None)` when
//! it does not know the name, and a `FUNCTIONS` list of the names it defines.

mod array;
mod datetime;
mod geo;
mod global;
mod math;
mod pipe;
mod pt;
mod sanity;
mod string;

use crate::ast::ExprNode;
use crate::evaluator::{Env, Evaluator, Halt, Step};
use crate::scope::{Context, Scope};
use crate::value::Value;

/// Result of dispatching a call by name.
pub(crate) type Dispatch = Result<Option<Value>, Halt>;

/// Arguments of one function call, evaluated on demand.
pub(crate) struct Call<'a> {
    evaluator: &'a Evaluator,
    env: Env<'a>,
    args: &'a [ExprNode],
    depth: usize,
}

impl<'a> Call<'a> {
    pub(crate) fn new(
        evaluator: &'a Evaluator,
        env: Env<'a>,
        args: &'a [ExprNode],
        depth: usize,
    ) -> Self {
        Call {
            evaluator,
            env,
            args,
            depth,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.args.len()
    }

    pub(crate) fn nodes(&self) -> &'a [ExprNode] {
        self.args
    }

    /// Evaluate the argument at `index`; a missing argument is null.
    pub(crate) fn arg(&self, index: usize) -> Step {
        match self.args.get(index) {
            Some(node) => self.evaluator.eval(node, self.env, self.depth),
            None => Ok(Value::Null),
        }
    }

    /// Evaluate every argument, left to right.
    pub(crate) fn values(&self) -> Result<Vec<Value>, Halt> {
        (0..self.args.len()).map(|i| self.arg(i)).collect()
    }

    /// The calling scope. Not available during constant folding.
    pub(crate) fn scope(&self) -> Result<&'a Scope<'a>, Halt> {
        self.env.scope()
    }

    pub(crate) fn context(&self) -> Result<&'a Context, Halt> {
        Ok(self.scope()?.context())
    }

    /// Evaluate a node in another frame, e.g. a sort key per element.
    pub(crate) fn evaluate_in(&self, node: &ExprNode, frame: &Scope<'_>) -> Step {
        self.evaluator.eval(node, Env::Scoped(frame), self.depth)
    }
}

/// Dispatch an ordinary function call.
pub(crate) fn call(namespace: &str, name: &str, call: &Call<'_>) -> Dispatch {
    match namespace {
        "global" => global::call(name, call),
        "array" => array::call(name, call),
        "string" => string::call(name, call),
        "math" => math::call(name, call),
        "dateTime" => datetime::call(name, call),
        "geo" => geo::call(name, call),
        "pt" => pt::call(name, call),
        "sanity" => sanity::call(name, call),
        _ => Ok(None),
    }
}

/// Dispatch a pipe function call on an already evaluated base.
pub(crate) fn call_pipe(name: &str, base: Value, call: &Call<'_>) -> Dispatch {
    pipe::call(name, base, call)
}

/// Whether `namespace::name` is a built-in ordinary function.
///
/// # Examples
///
/// ```
/// use groq_lang::functions::is_defined;
///
/// assert!(is_defined("global", "count"));
/// assert!(is_defined("math", "sum"));
/// assert!(!is_defined("math", "count"));
/// ```
pub fn is_defined(namespace: &str, name: &str) -> bool {
    let names: &[&str] = match namespace {
        "global" => global::FUNCTIONS,
        "array" => array::FUNCTIONS,
        "string" => string::FUNCTIONS,
        "math" => math::FUNCTIONS,
        "dateTime" => datetime::FUNCTIONS,
        "geo" => geo::FUNCTIONS,
        "pt" => pt::FUNCTIONS,
        "sanity" => sanity::FUNCTIONS,
        _ => &[],
    };
    names.contains(&name)
}

/// Whether `name` is a built-in pipe function.
pub fn is_pipe_defined(name: &str) -> bool {
    pipe::FUNCTIONS.contains(&name)
}

/// Ordinary function calls in `node` that name no built-in, as
/// `namespace::name`.
pub fn unknown_functions(node: &ExprNode) -> Vec<String> {
    let mut unknown = Vec::new();
    collect_unknown(node, &mut unknown);
    unknown
}

fn collect_unknown(node: &ExprNode, unknown: &mut Vec<String>) {
    use crate::ast::ObjectAttribute;

    match node {
        ExprNode::FuncCall {
            namespace,
            name,
            args,
        } => {
            if !is_defined(namespace, name) {
                unknown.push(format!("{namespace}::{name}"));
            }
            args.iter().for_each(|arg| collect_unknown(arg, unknown));
        }
        ExprNode::PipeFuncCall { name, base, args } => {
            if !is_pipe_defined(name) {
                unknown.push(format!("|{name}"));
            }
            collect_unknown(base, unknown);
            args.iter().for_each(|arg| collect_unknown(arg, unknown));
        }
        ExprNode::Array { elements } => elements
            .iter()
            .for_each(|element| collect_unknown(&element.value, unknown)),
        ExprNode::Object { attributes } => attributes.iter().for_each(|attribute| match attribute {
            ObjectAttribute::Value { value, .. } | ObjectAttribute::Splat { value } => {
                collect_unknown(value, unknown)
            }
        }),
        ExprNode::AccessAttribute { base, .. } => {
            if let Some(base) = base {
                collect_unknown(base, unknown);
            }
        }
        ExprNode::AccessElement { base, .. }
        | ExprNode::Slice { base, .. }
        | ExprNode::Deref { base }
        | ExprNode::ArrayCoerce { base }
        | ExprNode::Group { base }
        | ExprNode::Not { base }
        | ExprNode::Neg { base }
        | ExprNode::Pos { base }
        | ExprNode::Asc { base }
        | ExprNode::Desc { base } => collect_unknown(base, unknown),
        ExprNode::Filter { base, expr } | ExprNode::Projection { base, expr } => {
            collect_unknown(base, unknown);
            collect_unknown(expr, unknown);
        }
        ExprNode::And { left, right }
        | ExprNode::Or { left, right }
        | ExprNode::OpCall { left, right, .. } => {
            collect_unknown(left, unknown);
            collect_unknown(right, unknown);
        }
        ExprNode::Literal(_)
        | ExprNode::This
        | ExprNode::Parent { .. }
        | ExprNode::Everything
        | ExprNode::Parameter { .. } => {}
    }
}

/// Strings of a string-or-array-of-strings argument.
pub(crate) fn string_set(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::String(s) => Some(vec![s.as_str()]),
        Value::Array(items) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}
