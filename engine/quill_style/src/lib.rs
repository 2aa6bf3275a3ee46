//! Style configuration for the quill formatting engine.
//!
//! A [`StyleSettings`] value is the single source of truth for a format
//! run: brace placement, spacing flags, wrap policies, alignment flags,
//! blank-line budgets, and indentation. The option set is closed and
//! versioned — [`schema`] rejects unknown options and invalid values when
//! a configuration is built, never during formatting.

pub mod schema;
pub mod settings;

pub use schema::{lookup, OptionDef, OptionKind, OptionValue, StyleError, OPTIONS, SCHEMA_VERSION};
pub use settings::{BraceStyle, StyleSettings, WrapMode};
