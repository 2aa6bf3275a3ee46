//! Structural input model for the quill formatting engine.
//!
//! The engine does not parse source text. An external parser builds a
//! [`SourceTree`] — an immutable, arena-backed tree whose leaves are the
//! terminal tokens of the document and whose interior nodes mirror
//! syntactic nesting — and the engine consumes it through a read-only
//! traversal interface.
//!
//! # Modules
//!
//! - [`span`]: compact byte spans
//! - [`kind`]: the closed set of structural and token kinds
//! - [`tree`]: the source tree, its builder, and structural validation
//! - [`line_index`]: byte offset / line number conversion

pub mod kind;
pub mod line_index;
pub mod span;
pub mod tree;

pub use kind::SyntaxKind;
pub use line_index::LineIndex;
pub use span::{Span, SpanError};
pub use tree::{NodeId, SourceTree, Token, TreeBuilder, TreeError};
