//! GROQ parser.
//!
//! The parser works on the text produced by the [normalizer](crate::normalizer)
//! and never tokenizes it. Each precedence level looks for its operators on the
//! *surface* of the span it was given (outside strings and brackets), tries the
//! candidate split points in associativity order, and accepts the first split
//! whose two sides both parse. A level with no acceptable split falls through
//! to the next tighter level. Results are memoised per `(span, level)`, so the
//! backtracking stays polynomial.
//!
//! Each level entered and each traversal step counts against
//! [`QueryLimits::max_parse_depth`], which bounds both the parser's recursion
//! and the height of the tree it builds.
//!
//! Levels, weakest first:
//!
//! | Level          | Operators                                   | Split     |
//! |----------------|---------------------------------------------|-----------|
//! | pipe           | `\|` followed by a call or a projection      | right-most|
//! | or             | `\|\|`                                       | right-most|
//! | and            | `&&`                                        | right-most|
//! | comparison     | `== != < <= > >= in match`                  | none      |
//! | additive       | `+ -`                                       | right-most|
//! | multiplicative | `* / %`                                     | right-most|
//! | prefix         | `! - +`                                     |           |
//! | power          | `**`                                        | left-most |
//! | postfix        | primaries and traversals                    |           |
//!
//! The `=>` pair level is not supported, and ranges (`..`, `...`) are only
//! recognised inside slice brackets.
//!
//! Two productions depend on a value rather than on the text alone: slice
//! bounds and the content of `base[...]`, which is an element index, an
//! attribute name or a filter depending on what it evaluates to. Those are
//! resolved by calling [`Evaluator::evaluate_constant`]; this is the only place
//! the parser depends on the evaluator.

use std::collections::HashMap;

use crate::ast::{ArrayElement, BinOp, ExprNode, ObjectAttribute};
use crate::config::QueryLimits;
use crate::error::ParseError;
use crate::evaluator::{Constant, Evaluator};
use crate::normalizer::normalize;
use crate::value::Value;

mod scan;

/// Outcome of trying one production on one span. `Ok(None)` means the span
/// does not match and the caller should try something else; `Err` aborts the
/// whole parse.
type Attempt<T = ExprNode> = Result<Option<T>, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Level {
    Pipe,
    Or,
    And,
    Comparison,
    Additive,
    Multiplicative,
    Prefix,
    Power,
    Postfix,
}

impl Level {
    fn tighter(self) -> Level {
        match self {
            Level::Pipe => Level::Or,
            Level::Or => Level::And,
            Level::And => Level::Comparison,
            Level::Comparison => Level::Additive,
            Level::Additive => Level::Multiplicative,
            Level::Multiplicative => Level::Prefix,
            Level::Prefix => Level::Power,
            Level::Power | Level::Postfix => Level::Postfix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
    NonAssoc,
}

/// An infix operator found at a split point.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Or,
    And,
    Op(BinOp),
}

impl Infix {
    fn build(self, left: ExprNode, right: ExprNode) -> ExprNode {
        let left = Box::new(left);
        let right = Box::new(right);
        match self {
            Infix::Or => ExprNode::Or { left, right },
            Infix::And => ExprNode::And { left, right },
            Infix::Op(op) => ExprNode::OpCall { op, left, right },
        }
    }
}

/// Recognises the operator of a level at a byte offset: the operator and the
/// number of bytes it spans.
type Matcher = fn(&[u8], usize) -> Option<(Infix, usize)>;

fn match_or(bytes: &[u8], i: usize) -> Option<(Infix, usize)> {
    bytes[i..].starts_with(b"||").then_some((Infix::Or, 2))
}

fn match_and(bytes: &[u8], i: usize) -> Option<(Infix, usize)> {
    bytes[i..].starts_with(b"&&").then_some((Infix::And, 2))
}

fn match_comparison(bytes: &[u8], i: usize) -> Option<(Infix, usize)> {
    let rest = &bytes[i..];
    let prev = i.checked_sub(1).map(|p| bytes[p]);
    let (op, len) = if rest.starts_with(b"==") {
        if prev == Some(b'=') {
            return None;
        }
        (BinOp::Equal, 2)
    } else if rest.starts_with(b"!=") {
        (BinOp::NotEqual, 2)
    } else if rest.starts_with(b"<=") {
        (BinOp::LessEqual, 2)
    } else if rest.starts_with(b">=") {
        (BinOp::GreaterEqual, 2)
    } else if rest.starts_with(b"<") {
        (BinOp::LessThan, 1)
    } else if rest.starts_with(b">") {
        // `->` and `=>` are not comparisons
        if matches!(prev, Some(b'-' | b'=')) {
            return None;
        }
        (BinOp::GreaterThan, 1)
    } else if rest.starts_with(b" in ") {
        (BinOp::In, 4)
    } else if rest.starts_with(b" match ") {
        (BinOp::Match, 7)
    } else {
        return None;
    };
    Some((Infix::Op(op), len))
}

fn match_additive(bytes: &[u8], i: usize) -> Option<(Infix, usize)> {
    match bytes[i] {
        b'+' => Some((Infix::Op(BinOp::Add), 1)),
        b'-' if bytes.get(i + 1) != Some(&b'>') => Some((Infix::Op(BinOp::Subtract), 1)),
        _ => None,
    }
}

fn match_multiplicative(bytes: &[u8], i: usize) -> Option<(Infix, usize)> {
    let op = match bytes[i] {
        b'*' if !is_doubled(bytes, i) => BinOp::Multiply,
        b'/' => BinOp::Divide,
        b'%' => BinOp::Modulo,
        _ => return None,
    };
    Some((Infix::Op(op), 1))
}

fn match_power(bytes: &[u8], i: usize) -> Option<(Infix, usize)> {
    bytes[i..]
        .starts_with(b"**")
        .then_some((Infix::Op(BinOp::Power), 2))
}

/// Is the byte at `i` one half of a doubled character (`**`, `||`)?
fn is_doubled(bytes: &[u8], i: usize) -> bool {
    let ch = bytes[i];
    bytes.get(i + 1) == Some(&ch) || (i > 0 && bytes[i - 1] == ch)
}

/// A byte range of the normalized query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn len(self) -> usize {
        self.end - self.start
    }

    fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Sub-span with offsets relative to this span.
    fn slice(self, from: usize, to: usize) -> Span {
        Span {
            start: self.start + from,
            end: self.start + to,
        }
    }

    /// Everything from a relative offset to the end.
    fn tail(self, from: usize) -> Span {
        self.slice(from, self.len())
    }
}

/// Parser over one normalized query.
pub struct Parser<'a> {
    source: &'a str,
    limits: QueryLimits,
    evaluator: Evaluator,
    depth: usize,
    memo: HashMap<(Span, Level), Option<ExprNode>>,
}

impl<'a> Parser<'a> {
    /// Create a parser for already normalized text.
    pub fn new(normalized: &'a str) -> Self {
        Self::with_limits(normalized, QueryLimits::default())
    }

    pub fn with_limits(normalized: &'a str, limits: QueryLimits) -> Self {
        Parser {
            source: normalized,
            limits,
            evaluator: Evaluator::with_limits(limits),
            depth: 0,
            memo: HashMap::new(),
        }
    }

    /// Parse the whole input as one expression.
    pub fn parse(&mut self) -> Result<ExprNode, ParseError> {
        let whole = Span {
            start: 0,
            end: self.source.len(),
        };
        match self.level(Level::Pipe, whole)? {
            Some(node) => Ok(node),
            None => {
                tracing::debug!(query = %self.source, "query does not match the grammar");
                Err(ParseError::Syntax {
                    query: self.source.to_string(),
                })
            }
        }
    }

    fn text(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    fn level(&mut self, level: Level, span: Span) -> Attempt {
        if span.is_empty() {
            return Ok(None);
        }
        if let Some(hit) = self.memo.get(&(span, level)) {
            return Ok(hit.clone());
        }

        self.descend()?;
        let result = match level {
            Level::Pipe => self.pipe(span),
            Level::Or => self.binary(level, span, Assoc::Left, match_or),
            Level::And => self.binary(level, span, Assoc::Left, match_and),
            Level::Comparison => self.binary(level, span, Assoc::NonAssoc, match_comparison),
            Level::Additive => self.binary(level, span, Assoc::Left, match_additive),
            Level::Multiplicative => self.binary(level, span, Assoc::Left, match_multiplicative),
            Level::Prefix => self.prefix(span),
            Level::Power => self.binary(level, span, Assoc::Right, match_power),
            Level::Postfix => self.postfix(span),
        };
        self.depth -= 1;

        let result = result?;
        self.memo.insert((span, level), result.clone());
        Ok(result)
    }

    /// Enter one more level of nesting.
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.limits.max_parse_depth {
            tracing::warn!(
                limit = self.limits.max_parse_depth,
                "query nesting limit reached while parsing"
            );
            return Err(ParseError::DepthExceeded(self.limits.max_parse_depth));
        }
        Ok(())
    }

    fn pipe(&mut self, span: Span) -> Attempt {
        let text = self.text(span);
        let Some(surface) = scan::surface(text) else {
            return Ok(None);
        };
        let bytes = text.as_bytes();

        for &i in surface.iter().rev() {
            if bytes[i] != b'|' || is_doubled(bytes, i) {
                continue;
            }
            let Some(base) = self.level(Level::Pipe, span.slice(0, i))? else {
                continue;
            };
            if let Some(node) = self.pipe_target(base, span.tail(i + 1))? {
                return Ok(Some(node));
            }
        }

        self.level(Level::Or, span)
    }

    /// The right-hand side of `|`: a pipe function call or a projection,
    /// either one followed by traversals.
    fn pipe_target(&mut self, base: ExprNode, span: Span) -> Attempt {
        let text = self.text(span);

        if text.starts_with('{') {
            let Some(close) = scan::matching_close(text, 0) else {
                return Ok(None);
            };
            let Some(body) = self.object(span.slice(1, close))? else {
                return Ok(None);
            };
            let node = ExprNode::Projection {
                base: Box::new(base),
                expr: Box::new(body),
            };
            return self.traversals(node, span.tail(close + 1));
        }

        let name_len = scan::identifier_len(text);
        if name_len == 0 || text.as_bytes().get(name_len) != Some(&b'(') {
            return Ok(None);
        }
        let Some(close) = scan::matching_close(text, name_len) else {
            return Ok(None);
        };
        let Some(args) = self.arguments(span.slice(name_len + 1, close), true)? else {
            return Ok(None);
        };
        let node = ExprNode::PipeFuncCall {
            name: text[..name_len].to_string(),
            base: Box::new(base),
            args,
        };
        self.traversals(node, span.tail(close + 1))
    }

    fn binary(&mut self, level: Level, span: Span, assoc: Assoc, matcher: Matcher) -> Attempt {
        let text = self.text(span);
        let Some(surface) = scan::surface(text) else {
            return Ok(None);
        };
        let bytes = text.as_bytes();

        let mut candidates: Vec<(usize, Infix, usize)> = surface
            .into_iter()
            .filter_map(|i| matcher(bytes, i).map(|(op, len)| (i, op, len)))
            .collect();
        if assoc != Assoc::Right {
            candidates.reverse();
        }

        let tighter = level.tighter();
        let (left_level, right_level) = match assoc {
            Assoc::Left => (level, tighter),
            Assoc::Right => (tighter, level),
            Assoc::NonAssoc => (tighter, tighter),
        };

        for (i, op, len) in candidates {
            let Some(right) = self.level(right_level, span.tail(i + len))? else {
                continue;
            };
            let Some(left) = self.level(left_level, span.slice(0, i))? else {
                continue;
            };
            return Ok(Some(op.build(left, right)));
        }

        self.level(tighter, span)
    }

    fn prefix(&mut self, span: Span) -> Attempt {
        let rest = span.tail(1);
        let node = match self.text(span).as_bytes()[0] {
            b'!' => self.level(Level::Prefix, rest)?.map(|base| ExprNode::Not {
                base: Box::new(base),
            }),
            b'-' => self.level(Level::Prefix, rest)?.map(ExprNode::negate),
            b'+' => self.level(Level::Prefix, rest)?.map(ExprNode::positive),
            _ => None,
        };
        match node {
            Some(node) => Ok(Some(node)),
            None => self.level(Level::Power, span),
        }
    }

    fn postfix(&mut self, span: Span) -> Attempt {
        match self.text(span).as_bytes()[0] {
            b'-' => return Ok(self.level(Level::Postfix, span.tail(1))?.map(ExprNode::negate)),
            b'+' => return Ok(self.level(Level::Postfix, span.tail(1))?.map(ExprNode::positive)),
            _ => {}
        }

        let Some((head, consumed)) = self.primary(span)? else {
            return Ok(None);
        };
        self.traversals(head, span.tail(consumed))
    }

    /// Parse the primary expression at the start of `span`. Returns the node
    /// and the number of bytes it used.
    fn primary(&mut self, span: Span) -> Attempt<(ExprNode, usize)> {
        let text = self.text(span);
        let bytes = text.as_bytes();

        let primary = match bytes[0] {
            b'"' | b'\'' => {
                let Some(end) = scan::string_end(text, 0) else {
                    return Ok(None);
                };
                let Some(s) = scan::unescape(&text[1..end - 1]) else {
                    return Ok(None);
                };
                (ExprNode::literal(s), end)
            }
            b'0'..=b'9' => {
                let len = scan::number_len(text);
                let Ok(n) = text[..len].parse::<f64>() else {
                    return Ok(None);
                };
                (ExprNode::literal(n), len)
            }
            b'$' => {
                let len = scan::identifier_len(&text[1..]);
                if len == 0 {
                    return Ok(None);
                }
                let name = text[1..=len].to_string();
                (ExprNode::Parameter { name }, len + 1)
            }
            b'@' => (ExprNode::This, 1),
            b'^' => {
                let mut levels = 1;
                let mut len = 1;
                while text[len..].starts_with(".^") {
                    levels += 1;
                    len += 2;
                }
                (ExprNode::Parent { levels }, len)
            }
            b'*' => (ExprNode::Everything, 1),
            b'(' => {
                let Some(close) = scan::matching_close(text, 0) else {
                    return Ok(None);
                };
                let Some(inner) = self.level(Level::Pipe, span.slice(1, close))? else {
                    return Ok(None);
                };
                let node = ExprNode::Group {
                    base: Box::new(inner),
                };
                (node, close + 1)
            }
            b'[' => {
                let Some(close) = scan::matching_close(text, 0) else {
                    return Ok(None);
                };
                let Some(elements) = self.array_elements(span.slice(1, close))? else {
                    return Ok(None);
                };
                (ExprNode::Array { elements }, close + 1)
            }
            b'{' => {
                let Some(close) = scan::matching_close(text, 0) else {
                    return Ok(None);
                };
                let Some(object) = self.object(span.slice(1, close))? else {
                    return Ok(None);
                };
                (object, close + 1)
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                return self.identifier_primary(span);
            }
            _ => return Ok(None),
        };

        Ok(Some(primary))
    }

    /// Keywords, bare attributes and function calls.
    fn identifier_primary(&mut self, span: Span) -> Attempt<(ExprNode, usize)> {
        let text = self.text(span);
        let mut len = scan::identifier_len(text);
        let mut namespace = None;
        let mut name = &text[..len];

        if text[len..].starts_with("::") {
            let name_len = scan::identifier_len(&text[len + 2..]);
            if name_len == 0 {
                return Ok(None);
            }
            namespace = Some(name);
            name = &text[len + 2..len + 2 + name_len];
            len += 2 + name_len;
        }

        if text.as_bytes().get(len) == Some(&b'(') {
            let Some(close) = scan::matching_close(text, len) else {
                return Ok(None);
            };
            let Some(args) = self.arguments(span.slice(len + 1, close), false)? else {
                return Ok(None);
            };
            let node = ExprNode::FuncCall {
                namespace: namespace.unwrap_or("global").to_string(),
                name: name.to_string(),
                args,
            };
            return Ok(Some((node, close + 1)));
        }

        if namespace.is_some() {
            return Ok(None);
        }

        let node = match name {
            "true" => ExprNode::literal(true),
            "false" => ExprNode::literal(false),
            "null" => ExprNode::Literal(Value::Null),
            _ => ExprNode::attribute(name),
        };
        Ok(Some((node, len)))
    }

    /// Apply `.name`, `->`, `[...]` and `{...}` traversals to `node` until the
    /// span is used up. Every step nests the tree one level deeper and counts
    /// against the parse depth like a recursive call would.
    fn traversals(&mut self, node: ExprNode, span: Span) -> Attempt {
        let depth = self.depth;
        let result = self.traversal_chain(node, span);
        self.depth = depth;
        result
    }

    fn traversal_chain(&mut self, mut node: ExprNode, span: Span) -> Attempt {
        let text = self.text(span);
        let bytes = text.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            self.descend()?;
            match bytes[pos] {
                b'.' => {
                    let len = scan::identifier_len(&text[pos + 1..]);
                    if len == 0 {
                        return Ok(None);
                    }
                    node = ExprNode::AccessAttribute {
                        base: Some(Box::new(node)),
                        name: text[pos + 1..pos + 1 + len].to_string(),
                    };
                    pos += 1 + len;
                }
                b'-' if bytes.get(pos + 1) == Some(&b'>') => {
                    pos += 2;
                    node = ExprNode::Deref {
                        base: Box::new(node),
                    };
                    let len = scan::identifier_len(&text[pos..]);
                    if len > 0 {
                        node = ExprNode::AccessAttribute {
                            base: Some(Box::new(node)),
                            name: text[pos..pos + len].to_string(),
                        };
                        pos += len;
                    }
                }
                b'[' => {
                    let Some(close) = scan::matching_close(text, pos) else {
                        return Ok(None);
                    };
                    let Some(next) = self.bracket(node, span.slice(pos + 1, close))? else {
                        return Ok(None);
                    };
                    node = next;
                    pos = close + 1;
                }
                b'{' => {
                    let Some(close) = scan::matching_close(text, pos) else {
                        return Ok(None);
                    };
                    let Some(body) = self.object(span.slice(pos + 1, close))? else {
                        return Ok(None);
                    };
                    node = ExprNode::Projection {
                        base: Box::new(node),
                        expr: Box::new(body),
                    };
                    pos = close + 1;
                }
                _ => return Ok(None),
            }
        }

        Ok(Some(node))
    }

    /// `base[...]`: array coercion, slice, element, attribute or filter.
    fn bracket(&mut self, base: ExprNode, span: Span) -> Attempt {
        let base = Box::new(base);
        if span.is_empty() {
            return Ok(Some(ExprNode::ArrayCoerce { base }));
        }

        let bytes = self.text(span).as_bytes();
        if let Some(surface) = scan::surface(self.text(span)) {
            if let Some(&i) = surface.iter().find(|&&i| bytes[i..].starts_with(b"..")) {
                let is_inclusive = !bytes[i..].starts_with(b"...");
                let after = if is_inclusive { i + 2 } else { i + 3 };
                return self.slice(base, span.slice(0, i), span.tail(after), is_inclusive);
            }
        }

        let Some(inner) = self.level(Level::Pipe, span)? else {
            return Ok(None);
        };

        let node = match self.evaluator.evaluate_constant(&inner) {
            Constant::Value(Value::Number(n)) => {
                let Some(index) = Value::Number(n).as_integer() else {
                    tracing::trace!(index = n, "non-integral constant index");
                    return Ok(None);
                };
                tracing::trace!(index, "constant index folded to element access");
                if index >= 0 {
                    ExprNode::AccessElement { base, index }
                } else {
                    let last = ExprNode::Slice {
                        base,
                        left: index,
                        right: index,
                        is_inclusive: true,
                    };
                    ExprNode::AccessElement {
                        base: Box::new(last),
                        index: 0,
                    }
                }
            }
            Constant::Value(Value::String(name)) => {
                tracing::trace!(name = %name, "constant key folded to attribute access");
                ExprNode::AccessAttribute {
                    base: Some(base),
                    name,
                }
            }
            _ => ExprNode::Filter {
                base,
                expr: Box::new(inner),
            },
        };

        Ok(Some(node))
    }

    fn slice(
        &mut self,
        base: Box<ExprNode>,
        left: Span,
        right: Span,
        is_inclusive: bool,
    ) -> Attempt {
        let Some(left) = self.constant_bound(left)? else {
            return Ok(None);
        };
        let Some(right) = self.constant_bound(right)? else {
            return Ok(None);
        };
        Ok(Some(ExprNode::Slice {
            base,
            left,
            right,
            is_inclusive,
        }))
    }

    fn constant_bound(&mut self, span: Span) -> Attempt<i64> {
        let Some(node) = self.level(Level::Additive, span)? else {
            return Ok(None);
        };
        let bound = match self.evaluator.evaluate_constant(&node) {
            Constant::Value(value) => value.as_integer(),
            Constant::Null | Constant::NotConstant => None,
        };
        tracing::trace!(?bound, "slice bound");
        Ok(bound)
    }

    /// Comma separated call arguments. Pipe calls accept `asc`/`desc`
    /// suffixes on their arguments.
    fn arguments(&mut self, span: Span, sort_keys: bool) -> Attempt<Vec<ExprNode>> {
        if span.is_empty() {
            return Ok(Some(Vec::new()));
        }
        let Some(pieces) = scan::split_surface(self.text(span), b',') else {
            return Ok(None);
        };

        let mut args = Vec::with_capacity(pieces.len());
        for (start, end) in pieces {
            let piece = span.slice(start, end);
            let text = self.text(piece);
            let arg = if sort_keys && text.ends_with(" desc ") {
                let key = piece.slice(0, piece.len() - " desc ".len());
                self.level(Level::Pipe, key)?.map(|base| ExprNode::Desc {
                    base: Box::new(base),
                })
            } else if sort_keys && text.ends_with(" asc ") {
                let key = piece.slice(0, piece.len() - " asc ".len());
                self.level(Level::Pipe, key)?.map(|base| ExprNode::Asc {
                    base: Box::new(base),
                })
            } else {
                self.level(Level::Pipe, piece)?
            };
            let Some(arg) = arg else {
                return Ok(None);
            };
            args.push(arg);
        }

        Ok(Some(args))
    }

    /// Pieces of a bracketed list, allowing one trailing comma.
    fn list_items(&self, span: Span) -> Option<Vec<Span>> {
        if span.is_empty() {
            return Some(Vec::new());
        }
        let mut items: Vec<Span> = scan::split_surface(self.text(span), b',')?
            .into_iter()
            .map(|(start, end)| span.slice(start, end))
            .collect();
        if items.len() > 1 && items.last().is_some_and(|last| last.is_empty()) {
            items.pop();
        }
        Some(items)
    }

    fn array_elements(&mut self, span: Span) -> Attempt<Vec<ArrayElement>> {
        let Some(items) = self.list_items(span) else {
            return Ok(None);
        };

        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            let is_splat = self.text(item).starts_with("...");
            let value_span = if is_splat { item.tail(3) } else { item };
            let Some(value) = self.level(Level::Pipe, value_span)? else {
                return Ok(None);
            };
            elements.push(ArrayElement { value, is_splat });
        }

        Ok(Some(elements))
    }

    /// Body of an object literal or projection, without the braces.
    fn object(&mut self, span: Span) -> Attempt {
        let Some(items) = self.list_items(span) else {
            return Ok(None);
        };

        let mut attributes = Vec::with_capacity(items.len());
        for item in items {
            let Some(attribute) = self.object_attribute(item)? else {
                return Ok(None);
            };
            attributes.push(attribute);
        }

        Ok(Some(ExprNode::Object { attributes }))
    }

    fn object_attribute(&mut self, span: Span) -> Attempt<ObjectAttribute> {
        let text = self.text(span);

        if text.starts_with("...") {
            let rest = span.tail(3);
            let value = if rest.is_empty() {
                ExprNode::This
            } else {
                let Some(value) = self.level(Level::Pipe, rest)? else {
                    return Ok(None);
                };
                value
            };
            return Ok(Some(ObjectAttribute::Splat { value }));
        }

        if let Some(colon) = key_separator(text) {
            let key = &text[..colon];
            if scan::string_end(key, 0) != Some(key.len()) {
                return Ok(None);
            }
            let Some(name) = scan::unescape(&key[1..key.len() - 1]) else {
                return Ok(None);
            };
            let Some(value) = self.level(Level::Pipe, span.tail(colon + 1))? else {
                return Ok(None);
            };
            return Ok(Some(ObjectAttribute::Value { name, value }));
        }

        let Some(value) = self.level(Level::Pipe, span)? else {
            return Ok(None);
        };
        let Some(name) = value.implicit_key().map(str::to_string) else {
            return Ok(None);
        };
        Ok(Some(ObjectAttribute::Value { name, value }))
    }
}

/// First surface `:` that is not part of a `::` namespace separator.
fn key_separator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    scan::surface(text)?.into_iter().find(|&i| {
        bytes[i] == b':'
            && bytes.get(i + 1) != Some(&b':')
            && (i == 0 || bytes[i - 1] != b':')
    })
}

/// Normalize and parse a query with the default limits.
///
/// # Examples
///
/// ```
/// use groq_lang::{parse, ExprNode};
///
/// let ast = parse("*[_type == 'movie']").unwrap();
/// assert!(matches!(ast, ExprNode::Filter { .. }));
/// assert!(parse("1 == 2 == 3").is_err());
/// ```
pub fn parse(query: &str) -> Result<ExprNode, ParseError> {
    parse_with_limits(query, QueryLimits::default())
}

/// Normalize and parse a query with explicit resource limits.
pub fn parse_with_limits(query: &str, limits: QueryLimits) -> Result<ExprNode, ParseError> {
    let normalized = normalize(query)?;
    tracing::debug!(normalized = %normalized, "parsing query");
    Parser::with_limits(&normalized, limits).parse()
}
