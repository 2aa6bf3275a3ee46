//! Error taxonomy for format invocations.
//!
//! Two fatal classes and one advisory:
//!
//! - [`FormatError::Structural`] — the input tree is malformed. The
//!   invocation aborts and no edits are returned.
//! - [`FormatError::Design`] — an internal invariant was violated (an
//!   engine bug, e.g. a detached indent scope). Also aborts; surfaced to
//!   the caller so it can be reported, never silently papered over.
//! - [`MarginViolation`] — the configured right margin is narrower than an
//!   unbreakable token. Formatting continues; violations are collected
//!   alongside the edits.
//!
//! Fatal errors are all-or-nothing: a failed invocation never applies a
//! partial edit list.

use quill_tree::{Span, TreeError};

/// Fatal formatting failure. The document is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Malformed input tree.
    #[error("malformed input tree: {0}")]
    Structural(String),

    /// Internal invariant violated; a bug in the engine or its caller.
    #[error("formatter invariant violated: {0}")]
    Design(String),
}

impl From<TreeError> for FormatError {
    fn from(err: TreeError) -> Self {
        FormatError::Structural(err.to_string())
    }
}

/// Non-fatal advisory: an atomic token is wider than the right margin
/// allows at its position, so the line could not be brought within budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarginViolation {
    /// The token that exceeds the margin.
    pub span: Span,
    /// Rendered end column of the token.
    pub width: usize,
    /// The configured right margin.
    pub margin: usize,
}

/// Result of a successful format invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOutcome {
    /// Whitespace replacements, in document order.
    pub edits: Vec<crate::edits::Edit>,
    /// Margin advisories collected during wrapping.
    pub violations: Vec<MarginViolation>,
}

impl FormatOutcome {
    /// True when the document is already formatted.
    pub fn is_clean(&self) -> bool {
        self.edits.is_empty()
    }
}
