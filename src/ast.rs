//! # GROQ - Abstract Syntax Tree
//!
//! This module defines the abstract syntax tree produced by the
//! [parser](crate::parser) and walked by the [evaluator](crate::evaluator).
//!
//! The tree is immutable once built: the parser constructs it bottom-up and
//! nothing rewrites it afterwards, so a parsed query can be cached and
//! evaluated any number of times, from any number of threads.
//!
//! ## Architecture Overview
//!
//! - **[expressions]** - The [`ExprNode`] sum type plus the array element and
//!   object attribute helpers
//! - **[operators]** - Binary operators carried by [`ExprNode::OpCall`]
//!
//! ## Quick Start
//!
//! ```text
//! *[_type == "movie" && releaseYear >= 1980]{title, "director": director->name} | order(title)
//! ```
//!
//! reads as: every document, filtered, projected, then piped through `order`.
//!
//! ## Node Groups
//!
//! - **Literals** - `Literal(Value)`
//! - **Identity** - `This` (`@`), `Parent` (`^`, `^.^`), `Everything` (`*`),
//!   `Parameter` (`$name`)
//! - **Composite literals** - `Array`, `Object`
//! - **Traversal** - `AccessAttribute`, `AccessElement`, `Filter`, `Slice`,
//!   `Projection`, `Deref`, `ArrayCoerce`, `Group`
//! - **Calls** - `FuncCall` (`ns::name(args)`), `PipeFuncCall` (`x | order(k)`)
//! - **Operators** - `And`, `Or`, `Not`, `Neg`, `Pos`, `OpCall`
//! - **Sort modifiers** - `Asc`, `Desc`, only valid as `order()` arguments
//!
//! ## Examples
//!
//! ### Attribute access on the current document
//!
//! ```text
//! title               // AccessAttribute { base: None, name: "title" }
//! ```
//!
//! ### Dereference with implicit projection key
//!
//! ```text
//! {author->name}      // Object { "name": AccessAttribute(Deref(author), name) }
//! ```
//!
//! ### Slices are folded at parse time
//!
//! ```text
//! *[0...10]           // Slice { left: 0, right: 10, is_inclusive: false }
//! ```
pub mod expressions;
pub mod operators;

pub use expressions::{ArrayElement, ExprNode, ObjectAttribute};
pub use operators::BinOp;
