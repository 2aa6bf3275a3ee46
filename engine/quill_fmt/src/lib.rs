//! quill formatting engine
//!
//! A deterministic whitespace formatter driven by declarative style
//! configuration. The engine consumes a pre-built structural tree (an
//! external parser supplies it) and produces a list of whitespace edits;
//! it never rewrites token text and never mutates its input.
//!
//! # Architecture
//!
//! One invocation runs five passes over the token sequence:
//!
//! 1. **Blocks** ([`blocks`]): the structural tree becomes a tree of
//!    formatting blocks carrying indent rules, wrap policies, brace
//!    styles, and alignment groups.
//! 2. **Spacing** ([`spacing`], [`gaps`]): every token boundary gets a
//!    whitespace requirement — spaces, break status, blank-line budget —
//!    from a declarative rule table plus structural decisions.
//! 3. **Layout** ([`layout`]): breaks are decided and every token gets a
//!    tab-aware column, with indentation and alignment resolved.
//! 4. **Wrapping** ([`wrap`]): overlong lines break at designated wrap
//!    points, outermost scope first, collecting margin advisories.
//! 5. **Edits** ([`edits`]): assignments are diffed against the original
//!    text, optionally limited to a caller-supplied range.
//!
//! Formatting an already-formatted document yields zero edits, and the
//! result is a pure function of (tree, settings, range).

pub mod align;
pub mod blocks;
pub mod edits;
pub mod engine;
pub mod error;
pub mod gaps;
pub mod layout;
pub mod measure;
pub mod spacing;
pub mod wrap;

pub use blocks::{AlignmentId, Block, BlockId, BlockTree, IndentRule};
pub use edits::{apply_edits, Edit, EditRange};
pub use engine::{format, format_range, FormatSession};
pub use error::{FormatError, FormatOutcome, MarginViolation};
pub use gaps::{BreakKind, GapSpec};
