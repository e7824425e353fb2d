//! Evaluation context and scope frames.
//!
//! A [`Context`] is everything one evaluation can see besides the query: the
//! dataset, the change delta, parameters and client information. It is built
//! once and shared read-only by every frame.
//!
//! A [`Scope`] is one frame of the lexical environment. Frames only ever
//! borrow their parent, so the chain is a stack that lives on the Rust stack
//! and a frame stays valid for every sibling iteration that borrows it. A
//! frame opened over a dataset document borrows it instead of copying it.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, EvalError};
use crate::value::{Reference, Value};

/// Reserved fields every stored document is expected to carry.
const REQUIRED_FIELDS: [&str; 2] = ["_id", "_type"];
const SYSTEM_FIELDS: [&str; 3] = ["_rev", "_createdAt", "_updatedAt"];

/// Identifies the project and dataset a query runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub project_id: String,
    pub dataset: String,
}

/// Document versions around a mutation, for change-triggered queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delta {
    pub before: Value,
    pub after: Value,
}

/// Shared, read-only input of one evaluation.
///
/// # Examples
///
/// ```
/// use groq_lang::{Context, Value};
/// use serde_json::json;
///
/// let context = Context::new(vec![Value::from(json!({"_id": "a", "_type": "post"}))])
///     .with_parameter("limit", 10);
///
/// assert!(context.document("a").is_some());
/// assert_eq!(context.parameter("limit"), Some(&Value::from(10)));
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    dataset: Vec<Value>,
    index: HashMap<String, usize>,
    delta: Delta,
    parameters: HashMap<String, Value>,
    client: Client,
    reference_types: Option<HashSet<String>>,
    now: DateTime<Utc>,
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Vec::new())
    }
}

impl Context {
    /// Build a context over a dataset. Documents are indexed by `_id`; when an
    /// id occurs twice the first document wins.
    pub fn new(dataset: Vec<Value>) -> Self {
        let mut index = HashMap::with_capacity(dataset.len());
        let mut incomplete = 0usize;

        for (position, document) in dataset.iter().enumerate() {
            if let Some(id) = document.get("_id").and_then(Value::as_str) {
                index.entry(id.to_string()).or_insert(position);
            }
            if SYSTEM_FIELDS.iter().any(|field| document.get(field).is_none()) {
                incomplete += 1;
            }
        }

        if incomplete > 0 {
            tracing::warn!(
                documents = incomplete,
                "dataset documents lack one of _rev, _createdAt, _updatedAt"
            );
        }

        Context {
            dataset,
            index,
            delta: Delta::default(),
            parameters: HashMap::new(),
            client: Client::default(),
            reference_types: None,
            now: Utc::now(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.parameters.extend(parameters);
        self
    }

    pub fn with_delta(mut self, before: Value, after: Value) -> Self {
        self.delta = Delta { before, after };
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Restrict dereferencing to documents of these `_type`s.
    pub fn with_reference_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Pin the instant `now()` reports.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn dataset(&self) -> &[Value] {
        &self.dataset
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Document with the given `_id`.
    pub fn document(&self, id: &str) -> Option<&Value> {
        self.index.get(id).and_then(|&i| self.dataset.get(i))
    }

    /// Follow a reference to its target, if the target exists and has an
    /// allowed `_type`.
    pub fn resolve(&self, reference: Reference<'_>) -> Option<&Value> {
        let document = self.document(reference.id)?;
        match &self.reference_types {
            None => Some(document),
            Some(types) => {
                let doc_type = document.get("_type").and_then(Value::as_str)?;
                types.contains(doc_type).then_some(document)
            }
        }
    }
}

/// Check that a value can be stored as a dataset document.
pub fn validate_document(document: &Value) -> Result<(), DocumentError> {
    if document.as_object().is_none() {
        return Err(DocumentError::NotAnObject(document.type_name()));
    }
    for field in REQUIRED_FIELDS {
        if document.get(field).and_then(Value::as_str).is_none() {
            return Err(DocumentError::MissingField(field));
        }
    }
    Ok(())
}

/// One frame of the scope chain.
#[derive(Debug)]
pub struct Scope<'a> {
    context: &'a Context,
    parent: Option<&'a Scope<'a>>,
    this: Cow<'a, Value>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Scope<'a> {
    /// Root frame: no parent, `this` is null.
    pub fn root(context: &'a Context, max_depth: usize) -> Self {
        Scope {
            context,
            parent: None,
            this: Cow::Owned(Value::Null),
            depth: 0,
            max_depth,
        }
    }

    /// Push a frame whose `this` is `this`.
    pub fn nested(&'a self, this: Value) -> Result<Scope<'a>, EvalError> {
        self.push(Cow::Owned(this))
    }

    /// Push a frame over a value that outlives the frame, such as a document
    /// of the dataset.
    pub fn nested_ref(&'a self, this: &'a Value) -> Result<Scope<'a>, EvalError> {
        self.push(Cow::Borrowed(this))
    }

    fn push(&'a self, this: Cow<'a, Value>) -> Result<Scope<'a>, EvalError> {
        if self.depth >= self.max_depth {
            tracing::warn!(limit = self.max_depth, "scope chain limit reached");
            return Err(EvalError::ScopeDepthExceeded(self.max_depth));
        }
        Ok(Scope {
            context: self.context,
            parent: Some(self),
            this,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.parent
    }

    pub fn this(&self) -> &Value {
        &self.this
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The frame `levels` parents up, `None` past the root.
    pub fn ancestor(&self, levels: usize) -> Option<&Scope<'a>> {
        let mut frame = self;
        for _ in 0..levels {
            frame = frame.parent?;
        }
        Some(frame)
    }

    /// Give back the value this frame was created for.
    pub fn into_this(self) -> Value {
        self.this.into_owned()
    }
}
