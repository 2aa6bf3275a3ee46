//! Kind matcher for flexible spacing rule matching.

use quill_tree::SyntaxKind;

/// Flexible matcher for syntax kinds in spacing rules.
///
/// Enables declarative rules like:
/// - `Any` - matches any kind
/// - `Exact(Comma)` - matches only `,`
/// - `OneOf(&[IfStatement, WhileStatement])` - matches either construct
/// - `Pred(SyntaxKind::is_binary_op)` - matches a whole kind family
#[derive(Clone, Copy, Debug)]
pub enum KindMatcher {
    /// Matches any kind.
    Any,

    /// Matches a specific kind.
    Exact(SyntaxKind),

    /// Matches any kind in the provided slice.
    OneOf(&'static [SyntaxKind]),

    /// Matches using a kind predicate function.
    Pred(fn(SyntaxKind) -> bool),
}

impl KindMatcher {
    /// Check if this matcher matches the given kind.
    #[inline]
    pub fn matches(&self, kind: SyntaxKind) -> bool {
        match self {
            KindMatcher::Any => true,
            KindMatcher::Exact(expected) => *expected == kind,
            KindMatcher::OneOf(kinds) => kinds.contains(&kind),
            KindMatcher::Pred(predicate) => predicate(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use quill_tree::SyntaxKind;

    use super::KindMatcher;

    #[test]
    fn any_matches_everything() {
        assert!(KindMatcher::Any.matches(SyntaxKind::Comma));
        assert!(KindMatcher::Any.matches(SyntaxKind::ClassBody));
    }

    #[test]
    fn exact_matches_one_kind() {
        let m = KindMatcher::Exact(SyntaxKind::Comma);
        assert!(m.matches(SyntaxKind::Comma));
        assert!(!m.matches(SyntaxKind::Semicolon));
    }

    #[test]
    fn one_of_matches_listed_kinds() {
        let m = KindMatcher::OneOf(&[SyntaxKind::IfStatement, SyntaxKind::WhileStatement]);
        assert!(m.matches(SyntaxKind::IfStatement));
        assert!(m.matches(SyntaxKind::WhileStatement));
        assert!(!m.matches(SyntaxKind::ForStatement));
    }

    #[test]
    fn pred_matches_kind_family() {
        let m = KindMatcher::Pred(SyntaxKind::is_binary_op);
        assert!(m.matches(SyntaxKind::AdditiveOp));
        assert!(!m.matches(SyntaxKind::AssignOp));
    }
}
