use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

use crate::ast::{ArrayElement, BinOp, ExprNode, ObjectAttribute};
use crate::config::QueryLimits;
use crate::error::EvalError;
use crate::functions::{self, Call};
use crate::scope::{Context, Scope};
use crate::value::{Map, Value, parse_datetime};

/// Outcome of evaluating an expression without a scope.
///
/// `Null` and `NotConstant` are different answers: `null` is a constant whose
/// value happens to be null, while `NotConstant` means the expression reads
/// something only known at evaluation time (`@`, `^`, `*`, `$param`, a bare
/// attribute, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Value(Value),
    Null,
    NotConstant,
}

/// Why a node stopped without producing a value.
#[derive(Debug)]
pub(crate) enum Halt {
    /// Constant evaluation reached a node that needs a scope
    NotConstant,
    /// A resource limit was exceeded
    Failed(EvalError),
}

impl From<EvalError> for Halt {
    fn from(err: EvalError) -> Self {
        Halt::Failed(err)
    }
}

pub(crate) type Step = Result<Value, Halt>;

/// Where a node is evaluated.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Env<'s> {
    /// Parse-time folding: no scope, no dataset
    Constant,
    Scoped(&'s Scope<'s>),
}

impl<'s> Env<'s> {
    pub(crate) fn scope(self) -> Result<&'s Scope<'s>, Halt> {
        match self {
            Env::Constant => Err(Halt::NotConstant),
            Env::Scoped(scope) => Ok(scope),
        }
    }
}

/// The GROQ evaluator.
///
/// A tree-walking interpreter from [`ExprNode`] to [`Value`]. Evaluation is
/// total: type mismatches, missing fields, unknown functions and dangling
/// references all produce `null`. The only errors are the resource limits in
/// [`QueryLimits`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    limits: QueryLimits,
}

impl Evaluator {
    /// Creates an evaluator with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: QueryLimits) -> Self {
        Evaluator { limits }
    }

    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    /// Evaluates a parsed query against a context.
    ///
    /// Evaluation starts in the root scope, where `@` is `null` and `^` runs
    /// off the top of the chain.
    ///
    /// # Arguments
    ///
    /// * `node` - The parsed query
    /// * `context` - Dataset, parameters and the rest of the environment
    ///
    /// # Examples
    ///
    /// ```
    /// use groq_lang::{Context, Evaluator, Value, parse};
    /// use serde_json::json;
    ///
    /// let context = Context::new(vec![
    ///     Value::from(json!({"_id": "a", "_type": "post", "title": "Hello"})),
    ///     Value::from(json!({"_id": "b", "_type": "page", "title": "About"})),
    /// ]);
    /// let ast = parse("*[_type == 'post'].title").unwrap();
    ///
    /// let result = Evaluator::new().evaluate(&ast, &context).unwrap();
    /// assert_eq!(result, Value::from(json!(["Hello"])));
    /// ```
    pub fn evaluate(&self, node: &ExprNode, context: &Context) -> Result<Value, EvalError> {
        tracing::debug!(documents = context.dataset().len(), "evaluating query");
        let root = Scope::root(context, self.limits.max_scope_depth);
        match self.eval(node, Env::Scoped(&root), 0) {
            Ok(value) => Ok(value),
            Err(Halt::Failed(err)) => Err(err),
            // only constant evaluation asks for a missing scope
            Err(Halt::NotConstant) => Ok(Value::Null),
        }
    }

    /// Evaluates a node without any scope, for parse-time folding.
    pub fn evaluate_constant(&self, node: &ExprNode) -> Constant {
        match self.eval(node, Env::Constant, 0) {
            Ok(Value::Null) => Constant::Null,
            Ok(value) => Constant::Value(value),
            Err(_) => Constant::NotConstant,
        }
    }

    pub(crate) fn eval(&self, node: &ExprNode, env: Env<'_>, depth: usize) -> Step {
        let depth = depth + 1;
        if depth > self.limits.max_eval_depth {
            tracing::warn!(
                limit = self.limits.max_eval_depth,
                "expression nesting limit reached while evaluating"
            );
            return Err(EvalError::DepthExceeded(self.limits.max_eval_depth).into());
        }

        match node {
            ExprNode::Literal(value) => Ok(value.clone()),
            ExprNode::This => Ok(env.scope()?.this().clone()),
            ExprNode::Parent { levels } => Ok(env
                .scope()?
                .ancestor(*levels)
                .map(|frame| frame.this().clone())
                .unwrap_or(Value::Null)),
            ExprNode::Everything => Ok(Value::Array(env.scope()?.context().dataset().to_vec())),
            ExprNode::Parameter { name } => Ok(env
                .scope()?
                .context()
                .parameter(name)
                .cloned()
                .unwrap_or(Value::Null)),

            ExprNode::Array { elements } => self.eval_array(elements, env, depth),
            ExprNode::Object { attributes } => self.eval_object(attributes, env, depth),

            ExprNode::AccessAttribute { base: None, name } => {
                Ok(access_attribute(env.scope()?.this(), name))
            }
            ExprNode::AccessAttribute {
                base: Some(base),
                name,
            } => {
                let base = self.eval(base, env, depth)?;
                Ok(access_attribute(&base, name))
            }
            ExprNode::AccessElement { base, index } => {
                let base = self.eval(base, env, depth)?;
                Ok(access_element(&base, *index))
            }
            ExprNode::Slice {
                base,
                left,
                right,
                is_inclusive,
            } => {
                let base = self.eval(base, env, depth)?;
                Ok(slice(&base, *left, *right, *is_inclusive))
            }
            ExprNode::Filter { base, expr } => self.eval_filter(base, expr, env, depth),
            ExprNode::Projection { base, expr } => self.eval_projection(base, expr, env, depth),
            ExprNode::Deref { base } => {
                let context = env.scope()?.context();
                let base = self.eval(base, env, depth)?;
                Ok(dereference(&base, context))
            }
            ExprNode::ArrayCoerce { base } => match self.eval(base, env, depth)? {
                array @ Value::Array(_) => Ok(array),
                _ => Ok(Value::Null),
            },
            ExprNode::Group { base } => self.eval(base, env, depth),

            ExprNode::FuncCall {
                namespace,
                name,
                args,
            } => match functions::call(namespace, name, &Call::new(self, env, args, depth))? {
                Some(value) => Ok(value),
                None => {
                    tracing::trace!(%namespace, %name, "unknown function evaluates to null");
                    Ok(Value::Null)
                }
            },
            ExprNode::PipeFuncCall { name, base, args } => {
                let base = self.eval(base, env, depth)?;
                match functions::call_pipe(name, base, &Call::new(self, env, args, depth))? {
                    Some(value) => Ok(value),
                    None => {
                        tracing::trace!(%name, "unknown pipe function evaluates to null");
                        Ok(Value::Null)
                    }
                }
            }

            ExprNode::And { left, right } => {
                let left = self.eval(left, env, depth)?;
                let right = self.eval(right, env, depth)?;
                Ok(and(&left, &right))
            }
            ExprNode::Or { left, right } => {
                let left = self.eval(left, env, depth)?;
                let right = self.eval(right, env, depth)?;
                Ok(or(&left, &right))
            }
            ExprNode::Not { base } => match self.eval(base, env, depth)? {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                _ => Ok(Value::Null),
            },
            ExprNode::Neg { base } => match self.eval(base, env, depth)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Ok(Value::Null),
            },
            ExprNode::Pos { base } => match self.eval(base, env, depth)? {
                number @ Value::Number(_) => Ok(number),
                _ => Ok(Value::Null),
            },
            ExprNode::OpCall { op, left, right } => {
                let left = self.eval(left, env, depth)?;
                let right = self.eval(right, env, depth)?;
                Ok(apply_binop(*op, &left, &right))
            }

            // sort keys only mean something to `order()`
            ExprNode::Asc { .. } | ExprNode::Desc { .. } => Ok(Value::Null),
        }
    }

    // ========================================
    // Composite literals
    // ========================================

    fn eval_array(&self, elements: &[ArrayElement], env: Env<'_>, depth: usize) -> Step {
        let mut result = Vec::with_capacity(elements.len());
        for element in elements {
            let value = self.eval(&element.value, env, depth)?;
            match value {
                Value::Array(items) if element.is_splat => result.extend(items),
                other => result.push(other),
            }
        }
        Ok(Value::Array(result))
    }

    fn eval_object(&self, attributes: &[ObjectAttribute], env: Env<'_>, depth: usize) -> Step {
        let mut map = Map::with_capacity(attributes.len());
        for attribute in attributes {
            match attribute {
                ObjectAttribute::Value { name, value } => {
                    let value = self.eval(value, env, depth)?;
                    map.insert(name.clone(), value);
                }
                ObjectAttribute::Splat { value } => {
                    if let Value::Object(fields) = self.eval(value, env, depth)? {
                        map.extend(fields);
                    }
                }
            }
        }
        Ok(Value::Object(map))
    }

    // ========================================
    // Traversals that open a scope
    // ========================================

    fn eval_filter(&self, base: &ExprNode, expr: &ExprNode, env: Env<'_>, depth: usize) -> Step {
        let scope = env.scope()?;

        // `*` is walked in place; only the kept documents are copied
        if let ExprNode::Everything = base {
            let mut kept = Vec::new();
            for document in scope.context().dataset() {
                let frame = scope.nested_ref(document)?;
                if self.eval(expr, Env::Scoped(&frame), depth)? == Value::Boolean(true) {
                    kept.push(document.clone());
                }
            }
            return Ok(Value::Array(kept));
        }

        let Value::Array(items) = self.eval(base, env, depth)? else {
            return Ok(Value::Null);
        };

        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            let frame = scope.nested(item)?;
            let keep = self.eval(expr, Env::Scoped(&frame), depth)? == Value::Boolean(true);
            if keep {
                kept.push(frame.into_this());
            }
        }
        Ok(Value::Array(kept))
    }

    fn eval_projection(
        &self,
        base: &ExprNode,
        expr: &ExprNode,
        env: Env<'_>,
        depth: usize,
    ) -> Step {
        let scope = env.scope()?;

        if let ExprNode::Everything = base {
            return scope
                .context()
                .dataset()
                .iter()
                .map(|document| {
                    let frame = scope.nested_ref(document)?;
                    self.eval(expr, Env::Scoped(&frame), depth)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        }

        match self.eval(base, env, depth)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    let frame = scope.nested(item)?;
                    self.eval(expr, Env::Scoped(&frame), depth)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Null => Ok(Value::Null),
            single => {
                let frame = scope.nested(single)?;
                self.eval(expr, Env::Scoped(&frame), depth)
            }
        }
    }
}

/// Evaluate a parsed query with the default limits.
pub fn evaluate(node: &ExprNode, context: &Context) -> Result<Value, EvalError> {
    Evaluator::new().evaluate(node, context)
}

// ========================================
// Traversal helpers
// ========================================

fn access_attribute(value: &Value, name: &str) -> Value {
    match value {
        Value::Object(fields) => fields.get(name).cloned().unwrap_or(Value::Null),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| item.get(name).cloned().unwrap_or(Value::Null))
                .collect(),
        ),
        _ => Value::Null,
    }
}

fn access_element(value: &Value, index: i64) -> Value {
    match value {
        Value::Array(items) => usize::try_from(index)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Negative bounds count from the end; both bounds are clamped to the array.
fn slice(value: &Value, left: i64, right: i64, is_inclusive: bool) -> Value {
    let Value::Array(items) = value else {
        return Value::Null;
    };
    let len = items.len() as i64;
    let resolve = |bound: i64| if bound < 0 { bound + len } else { bound };

    let start = resolve(left).clamp(0, len);
    let end = (resolve(right) + i64::from(is_inclusive)).clamp(0, len);
    if start >= end {
        return Value::Array(Vec::new());
    }
    Value::Array(items[start as usize..end as usize].to_vec())
}

fn dereference(value: &Value, context: &Context) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| dereference(item, context))
                .collect(),
        ),
        other => other
            .as_reference()
            .and_then(|reference| context.resolve(reference))
            .cloned()
            .unwrap_or(Value::Null),
    }
}

// ========================================
// Operators
// ========================================

fn and(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Boolean(false), _) | (_, Value::Boolean(false)) => Value::Boolean(false),
        (Value::Boolean(true), Value::Boolean(true)) => Value::Boolean(true),
        _ => Value::Null,
    }
}

fn or(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Boolean(true), _) | (_, Value::Boolean(true)) => Value::Boolean(true),
        (Value::Boolean(false), Value::Boolean(false)) => Value::Boolean(false),
        _ => Value::Null,
    }
}

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Value {
    match op {
        BinOp::Equal => Value::Boolean(equals(left, right)),
        BinOp::NotEqual => Value::Boolean(!equals(left, right)),
        BinOp::LessThan => compare_with(left, right, Ordering::is_lt),
        BinOp::LessEqual => compare_with(left, right, Ordering::is_le),
        BinOp::GreaterThan => compare_with(left, right, Ordering::is_gt),
        BinOp::GreaterEqual => compare_with(left, right, Ordering::is_ge),
        BinOp::In => match right {
            Value::Array(items) => Value::Boolean(items.iter().any(|item| equals(left, item))),
            _ => Value::Null,
        },
        BinOp::Match => text_match(left, right),
        BinOp::Add => add(left, right),
        BinOp::Subtract => subtract(left, right),
        BinOp::Multiply => numeric(left, right, |a, b| a * b),
        BinOp::Divide => numeric(left, right, |a, b| a / b),
        BinOp::Modulo => numeric(left, right, |a, b| a % b),
        BinOp::Power => numeric(left, right, f64::powf),
    }
}

/// Equality as `==` sees it: deep equality tried in both directions.
pub(crate) fn equals(left: &Value, right: &Value) -> bool {
    deep_equals(left, right) || deep_equals(right, left)
}

/// Structural equality where a date-time on the left also equals a string
/// that parses to the same instant.
fn deep_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::DateTime(a), Value::String(s)) => parse_datetime(s).is_some_and(|b| *a == b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| deep_equals(x, y)))
        }
        _ => left == right,
    }
}

/// Ordering of two numbers or two date-times; anything else is unordered.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_with(left: &Value, right: &Value, predicate: fn(Ordering) -> bool) -> Value {
    compare(left, right)
        .map(|ordering| Value::Boolean(predicate(ordering)))
        .unwrap_or(Value::Null)
}

fn finite(n: f64) -> Value {
    if n.is_finite() {
        Value::Number(n)
    } else {
        Value::Null
    }
}

fn numeric(left: &Value, right: &Value, op: fn(f64, f64) -> f64) -> Value {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => finite(op(*a, *b)),
        _ => Value::Null,
    }
}

fn add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => finite(a + b),
        (Value::String(a), Value::String(b)) => Value::String(format!("{a}{b}")),
        (Value::Array(a), Value::Array(b)) => Value::Array(a.iter().chain(b).cloned().collect()),
        (Value::Object(a), Value::Object(b)) => {
            let mut merged = a.clone();
            merged.extend(b.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Object(merged)
        }
        (Value::DateTime(dt), Value::Number(seconds)) => shift(dt, *seconds),
        _ => Value::Null,
    }
}

fn subtract(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => finite(a - b),
        (Value::DateTime(a), Value::DateTime(b)) => {
            Value::Number((*a - *b).num_milliseconds() as f64 / 1000.0)
        }
        (Value::DateTime(dt), Value::Number(seconds)) => shift(dt, -seconds),
        _ => Value::Null,
    }
}

/// Move an instant by a (possibly fractional) number of seconds.
fn shift(dt: &DateTime<Utc>, seconds: f64) -> Value {
    if !seconds.is_finite() {
        return Value::Null;
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
        .and_then(|delta| dt.checked_add_signed(delta))
        .map(Value::DateTime)
        .unwrap_or(Value::Null)
}

// ========================================
// Full-text match
// ========================================

fn text_match(text: &Value, pattern: &Value) -> Value {
    let (Some(texts), Some(patterns)) = (string_list(text), string_list(pattern)) else {
        return Value::Null;
    };

    let words: Vec<String> = texts.iter().flat_map(|t| tokenize(t, false)).collect();
    let terms: Vec<String> = patterns.iter().flat_map(|p| tokenize(p, true)).collect();
    if terms.is_empty() {
        return Value::Boolean(false);
    }

    for term in terms {
        let Some(regex) = glob_regex(&term) else {
            return Value::Null;
        };
        if !words.iter().any(|word| regex.is_match(word)) {
            return Value::Boolean(false);
        }
    }
    Value::Boolean(true)
}

/// A string, or the strings in an array; `None` for any other shape.
fn string_list(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::String(s) => Some(vec![s.as_str()]),
        Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
        _ => None,
    }
}

/// Lower-cased word tokens. Patterns keep `*` as part of a token.
fn tokenize(text: &str, keep_wildcards: bool) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || (keep_wildcards && c == '*')))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn glob_regex(term: &str) -> Option<Regex> {
    let body = term
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$")).ok()
}
