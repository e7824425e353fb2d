use crate::ast::BinOp;
use crate::value::Value;

/// Abstract Syntax Tree node representing a parsed GROQ expression.
///
/// The AST is the internal representation of a query after parsing.
/// It captures the structure and meaning of the query for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    // Literals
    /// Literal value (number, string, boolean, null)
    ///
    /// # Example
    /// ```text
    /// 42
    /// "hello"
    /// ```
    Literal(Value),

    // Identity
    /// Current scope value (`@`)
    This,

    /// Enclosing scope value (`^`, `^.^`, ...)
    ///
    /// `levels` is the number of scope frames to walk up.
    Parent { levels: usize },

    /// The whole dataset (`*`)
    Everything,

    /// Query parameter (`$name`)
    Parameter { name: String },

    // Composite literals
    /// Array literal
    ///
    /// # Example
    /// ```text
    /// [1, title, ...tags]
    /// ```
    Array { elements: Vec<ArrayElement> },

    /// Object literal, also the body of a projection
    ///
    /// # Example
    /// ```text
    /// {"name": title, ...rest}
    /// ```
    Object { attributes: Vec<ObjectAttribute> },

    // Traversal
    /// Attribute access. Without a base the attribute is read from `@`.
    ///
    /// # Examples
    /// ```text
    /// title
    /// author.name
    /// book["title"]
    /// ```
    AccessAttribute {
        base: Option<Box<ExprNode>>,
        name: String,
    },

    /// Array element access with a non-negative, parse-time constant index
    AccessElement { base: Box<ExprNode>, index: i64 },

    /// Filter traversal (`base[expr]`)
    Filter {
        base: Box<ExprNode>,
        expr: Box<ExprNode>,
    },

    /// Slice traversal with parse-time constant bounds (`base[1..3]`)
    Slice {
        base: Box<ExprNode>,
        left: i64,
        right: i64,
        is_inclusive: bool,
    },

    /// Projection (`base{...}`, `base | {...}`)
    Projection {
        base: Box<ExprNode>,
        expr: Box<ExprNode>,
    },

    /// Dereference (`base->`)
    Deref { base: Box<ExprNode> },

    /// Array coercion (`base[]`)
    ArrayCoerce { base: Box<ExprNode> },

    /// Parenthesized expression
    Group { base: Box<ExprNode> },

    // Calls
    /// Function call; unqualified names live in the `global` namespace
    ///
    /// # Examples
    /// ```text
    /// count(*)
    /// math::sum(prices)
    /// ```
    FuncCall {
        namespace: String,
        name: String,
        args: Vec<ExprNode>,
    },

    /// Pipe function call (`base | name(args)`)
    PipeFuncCall {
        name: String,
        base: Box<ExprNode>,
        args: Vec<ExprNode>,
    },

    // Operators
    /// Three-valued logical AND (`&&`)
    And {
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },

    /// Three-valued logical OR (`||`)
    Or {
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },

    /// Logical NOT (`!`)
    Not { base: Box<ExprNode> },

    /// Numeric negation (`-`)
    Neg { base: Box<ExprNode> },

    /// Numeric identity (`+`)
    Pos { base: Box<ExprNode> },

    /// Binary operation (comparison, membership, arithmetic)
    OpCall {
        op: BinOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },

    // Sort modifiers
    /// Ascending sort key, only meaningful as an `order()` argument
    Asc { base: Box<ExprNode> },

    /// Descending sort key, only meaningful as an `order()` argument
    Desc { base: Box<ExprNode> },
}

/// One entry of an array literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayElement {
    pub value: ExprNode,
    /// `...value` spreads an array into the surrounding one
    pub is_splat: bool,
}

/// One entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectAttribute {
    /// `"name": value`, or a bare expression with an implicit name
    Value { name: String, value: ExprNode },
    /// `...value` merges an object into the surrounding one
    Splat { value: ExprNode },
}

impl ExprNode {
    pub fn literal(value: impl Into<Value>) -> Self {
        ExprNode::Literal(value.into())
    }

    /// Unqualified attribute lookup on `@`
    pub fn attribute(name: impl Into<String>) -> Self {
        ExprNode::AccessAttribute {
            base: None,
            name: name.into(),
        }
    }

    /// Build `-base`, folding numeric literals so that `--5` is `5` again.
    pub fn negate(base: ExprNode) -> Self {
        match base {
            ExprNode::Literal(Value::Number(n)) => ExprNode::Literal(Value::Number(-n)),
            other => ExprNode::Neg {
                base: Box::new(other),
            },
        }
    }

    /// Build `+base`, folding numeric literals.
    pub fn positive(base: ExprNode) -> Self {
        match base {
            lit @ ExprNode::Literal(Value::Number(_)) => lit,
            other => ExprNode::Pos {
                base: Box::new(other),
            },
        }
    }

    /// Key used when this expression appears bare inside an object literal
    /// (`{title}`, `{author->name}`, `{tags[]}`).
    pub fn implicit_key(&self) -> Option<&str> {
        match self {
            ExprNode::AccessAttribute { name, .. } => Some(name),
            ExprNode::Deref { base }
            | ExprNode::ArrayCoerce { base }
            | ExprNode::AccessElement { base, .. }
            | ExprNode::Filter { base, .. }
            | ExprNode::Slice { base, .. }
            | ExprNode::Projection { base, .. } => base.implicit_key(),
            _ => None,
        }
    }
}
