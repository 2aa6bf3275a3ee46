//! Token-pair spacing (the innermost layer of whitespace computation).
//!
//! A declarative rule table decides how many spaces separate two adjacent
//! tokens when they share a line, given the construct that encloses the
//! boundary. The structural layer in [`crate::gaps`] builds on this with
//! line breaks, blank-line budgets, and brace placement.

mod matcher;
mod rules;

pub use matcher::KindMatcher;
pub use rules::{find_rule, rule_count, spaces_between, SpaceAction, SpacingRule, SPACING_RULES};

#[cfg(test)]
mod tests;
