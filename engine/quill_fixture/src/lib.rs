//! Java-like fixture parser for the quill engine test suites.
//!
//! The formatting engine consumes pre-built [`SourceTree`]s; in production
//! an IDE host supplies them. This crate stands in for that host during
//! testing: it tokenizes and structures a small Java-like dialect so
//! before/after formatting tests can be written as literal source text.
//!
//! It is a test harness, not a compiler front end — the grammar is
//! lenient and unknown constructs are attached flat rather than rejected.

mod lexer;
mod parser;

pub use lexer::{tokenize, RawToken};
use quill_tree::{SourceTree, TreeError};

/// Fixture parsing failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixtureError {
    #[error("unterminated comment starting at byte {at}")]
    UnterminatedComment { at: usize },
    #[error("unterminated string or char literal starting at byte {at}")]
    UnterminatedLiteral { at: usize },
    #[error("unexpected character '{ch}' at byte {at}")]
    UnexpectedChar { at: usize, ch: char },
    #[error("tree construction failed: {0}")]
    Tree(#[from] TreeError),
}

/// Parse a fixture source into a [`SourceTree`].
pub fn parse(source: &str) -> Result<SourceTree, FixtureError> {
    let tokens = lexer::tokenize(source)?;
    parser::Parser::new(source, &tokens).parse()
}
