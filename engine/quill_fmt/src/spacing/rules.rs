//! Declarative token-pair spacing rules.
//!
//! All plain inter-token spacing is defined here as static rules matched
//! on (left kind, right kind, enclosing construct kind). Structural
//! whitespace — line breaks, blank-line budgets, brace placement — is
//! layered on top by the gap calculator; this table only answers "how
//! many spaces separate these two tokens when they share a line".
//!
//! Rules are evaluated in priority order, then definition order; the
//! first match wins. The final `(Any, Any)` rule guarantees a match and
//! keeps adjacent tokens from merging.

use quill_style::StyleSettings;
use quill_tree::SyntaxKind;

use super::matcher::KindMatcher;

/// Spacing decided by a rule: a fixed count, or one space gated on a
/// settings flag.
#[derive(Clone, Copy)]
pub enum SpaceAction {
    Fixed(u8),
    Flag(fn(&StyleSettings) -> bool),
}

impl SpaceAction {
    #[inline]
    pub fn spaces(self, settings: &StyleSettings) -> u8 {
        match self {
            SpaceAction::Fixed(n) => n,
            SpaceAction::Flag(flag) => u8::from(flag(settings)),
        }
    }
}

impl std::fmt::Debug for SpaceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceAction::Fixed(n) => write!(f, "Fixed({n})"),
            SpaceAction::Flag(_) => write!(f, "Flag(..)"),
        }
    }
}

/// A declarative spacing rule.
#[derive(Clone, Copy, Debug)]
pub struct SpacingRule {
    /// Human-readable name for debugging.
    pub name: &'static str,

    /// Matcher for the left (preceding) token kind.
    pub left: KindMatcher,

    /// Matcher for the right (following) token kind.
    pub right: KindMatcher,

    /// Matcher for the nearest common enclosing block kind.
    pub context: KindMatcher,

    /// The spacing to apply.
    pub action: SpaceAction,

    /// Priority (lower = higher priority, checked first).
    pub priority: u8,
}

impl SpacingRule {
    #[inline]
    const fn new(
        name: &'static str,
        left: KindMatcher,
        right: KindMatcher,
        action: SpaceAction,
    ) -> Self {
        SpacingRule {
            name,
            left,
            right,
            context: KindMatcher::Any,
            action,
            priority: 50,
        }
    }

    #[inline]
    const fn in_context(mut self, context: KindMatcher) -> Self {
        self.context = context;
        self
    }

    #[inline]
    const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Check if this rule matches the given kind triple.
    #[inline]
    pub fn matches(&self, left: SyntaxKind, right: SyntaxKind, context: SyntaxKind) -> bool {
        self.left.matches(left) && self.right.matches(right) && self.context.matches(context)
    }
}

#[allow(
    clippy::enum_glob_use,
    reason = "the rule table is much more readable with short names"
)]
use SyntaxKind::*;

use KindMatcher::{Any, Exact, OneOf};
use SpaceAction::{Fixed, Flag};

static WHILE_CONTEXTS: &[SyntaxKind] = &[WhileStatement, DoWhileStatement];
static PLAIN_PAREN_CONTEXTS: &[SyntaxKind] = &[ParenthesizedExpression, ParameterList];

/// All spacing rules in evaluation order.
///
/// # Rule bands
///
/// - Priority 10: empty delimiters (most specific)
/// - Priority 15: member access
/// - Priority 20: parenthesis and bracket interiors
/// - Priority 25: punctuation
/// - Priority 30: construct parentheses, annotations
/// - Priority 35: unary operators
/// - Priority 40: binary operator families
/// - Priority 50: keywords
/// - Priority 90: fallback
pub static SPACING_RULES: &[SpacingRule] = &[
    // Priority 10: empty delimiter pairs
    SpacingRule::new("EmptyParens", Exact(LParen), Exact(RParen), Fixed(0)).with_priority(10),
    SpacingRule::new("EmptyBrackets", Exact(LBracket), Exact(RBracket), Fixed(0))
        .with_priority(10),
    SpacingRule::new("EmptyBraces", Exact(LBrace), Exact(RBrace), Fixed(0)).with_priority(10),
    // Priority 15: member access and varargs
    SpacingRule::new("BeforeDot", Any, Exact(Dot), Fixed(0)).with_priority(15),
    SpacingRule::new("AfterDot", Exact(Dot), Any, Fixed(0)).with_priority(15),
    SpacingRule::new("BeforeEllipsis", Any, Exact(Ellipsis), Fixed(0)).with_priority(15),
    SpacingRule::new("AfterEllipsis", Exact(Ellipsis), Any, Fixed(1)).with_priority(15),
    // Priority 20: parenthesis interiors, per construct
    SpacingRule::new("WithinIfParens", Exact(LParen), Any, Flag(|s| s.space_within_if_parens))
        .in_context(Exact(IfStatement))
        .with_priority(20),
    SpacingRule::new("WithinIfParensR", Any, Exact(RParen), Flag(|s| s.space_within_if_parens))
        .in_context(Exact(IfStatement))
        .with_priority(20),
    SpacingRule::new("WithinForParens", Exact(LParen), Any, Flag(|s| s.space_within_for_parens))
        .in_context(Exact(ForStatement))
        .with_priority(20),
    SpacingRule::new("WithinForParensR", Any, Exact(RParen), Flag(|s| s.space_within_for_parens))
        .in_context(Exact(ForStatement))
        .with_priority(20),
    SpacingRule::new(
        "WithinWhileParens",
        Exact(LParen),
        Any,
        Flag(|s| s.space_within_while_parens),
    )
    .in_context(OneOf(WHILE_CONTEXTS))
    .with_priority(20),
    SpacingRule::new(
        "WithinWhileParensR",
        Any,
        Exact(RParen),
        Flag(|s| s.space_within_while_parens),
    )
    .in_context(OneOf(WHILE_CONTEXTS))
    .with_priority(20),
    SpacingRule::new(
        "WithinCatchParens",
        Exact(LParen),
        Any,
        Flag(|s| s.space_within_catch_parens),
    )
    .in_context(Exact(CatchClause))
    .with_priority(20),
    SpacingRule::new(
        "WithinCatchParensR",
        Any,
        Exact(RParen),
        Flag(|s| s.space_within_catch_parens),
    )
    .in_context(Exact(CatchClause))
    .with_priority(20),
    SpacingRule::new(
        "WithinSyncParens",
        Exact(LParen),
        Any,
        Flag(|s| s.space_within_synchronized_parens),
    )
    .in_context(Exact(SynchronizedStatement))
    .with_priority(20),
    SpacingRule::new(
        "WithinSyncParensR",
        Any,
        Exact(RParen),
        Flag(|s| s.space_within_synchronized_parens),
    )
    .in_context(Exact(SynchronizedStatement))
    .with_priority(20),
    SpacingRule::new(
        "WithinCallParens",
        Exact(LParen),
        Any,
        Flag(|s| s.space_within_call_parens),
    )
    .in_context(Exact(ArgumentList))
    .with_priority(20),
    SpacingRule::new(
        "WithinCallParensR",
        Any,
        Exact(RParen),
        Flag(|s| s.space_within_call_parens),
    )
    .in_context(Exact(ArgumentList))
    .with_priority(20),
    SpacingRule::new(
        "WithinPlainParens",
        Exact(LParen),
        Any,
        Flag(|s| s.space_within_parens),
    )
    .in_context(OneOf(PLAIN_PAREN_CONTEXTS))
    .with_priority(20),
    SpacingRule::new(
        "WithinPlainParensR",
        Any,
        Exact(RParen),
        Flag(|s| s.space_within_parens),
    )
    .in_context(OneOf(PLAIN_PAREN_CONTEXTS))
    .with_priority(20),
    // Generic paren interiors not covered above hug their content.
    SpacingRule::new("AfterLParen", Exact(LParen), Any, Fixed(0)).with_priority(22),
    SpacingRule::new("BeforeRParen", Any, Exact(RParen), Fixed(0)).with_priority(22),
    // Array initializer braces hug their elements.
    SpacingRule::new("AfterInitLBrace", Exact(LBrace), Any, Fixed(0))
        .in_context(Exact(ArrayInitializer))
        .with_priority(22),
    SpacingRule::new("BeforeInitRBrace", Any, Exact(RBrace), Fixed(0))
        .in_context(Exact(ArrayInitializer))
        .with_priority(22),
    // Label colon hugs the label name.
    SpacingRule::new("LabelColon", Any, Exact(Colon), Fixed(0))
        .in_context(Exact(Label))
        .with_priority(22),
    // Priority 25: punctuation
    SpacingRule::new("BeforeComma", Any, Exact(Comma), Flag(|s| s.space_before_comma))
        .with_priority(25),
    SpacingRule::new("AfterComma", Exact(Comma), Any, Flag(|s| s.space_after_comma))
        .with_priority(25),
    SpacingRule::new("BeforeSemicolon", Any, Exact(Semicolon), Flag(|s| s.space_before_semicolon))
        .with_priority(25),
    SpacingRule::new(
        "AfterForSemicolon",
        Exact(Semicolon),
        Any,
        Flag(|s| s.space_after_semicolon),
    )
    .in_context(Exact(ForStatement))
    .with_priority(25),
    SpacingRule::new("AroundTernaryQuest", Any, Exact(Question), Fixed(1))
        .in_context(Exact(TernaryExpression))
        .with_priority(25),
    SpacingRule::new("AfterTernaryQuest", Exact(Question), Any, Fixed(1))
        .in_context(Exact(TernaryExpression))
        .with_priority(25),
    SpacingRule::new("BeforeTernaryColon", Any, Exact(Colon), Fixed(1))
        .in_context(Exact(TernaryExpression))
        .with_priority(25),
    SpacingRule::new("AfterTernaryColon", Exact(Colon), Any, Fixed(1))
        .in_context(Exact(TernaryExpression))
        .with_priority(25),
    // Priority 28: array brackets
    SpacingRule::new("AfterLBracket", Exact(LBracket), Any, Fixed(0)).with_priority(28),
    SpacingRule::new("BeforeRBracket", Any, Exact(RBracket), Fixed(0)).with_priority(28),
    SpacingRule::new("BeforeLBracket", Any, Exact(LBracket), Fixed(0)).with_priority(28),
    SpacingRule::new("AfterRBracketBrace", Exact(RBracket), Exact(LBrace), Flag(|s| s.space_before_array_initializer_lbrace))
        .with_priority(28),
    SpacingRule::new("AfterRBracket", Exact(RBracket), Any, Fixed(1)).with_priority(29),
    // Priority 30: construct parentheses and annotations
    SpacingRule::new(
        "BeforeIfParens",
        Exact(Keyword),
        Exact(LParen),
        Flag(|s| s.space_before_if_parens),
    )
    .in_context(Exact(IfStatement))
    .with_priority(30),
    SpacingRule::new(
        "BeforeForParens",
        Exact(Keyword),
        Exact(LParen),
        Flag(|s| s.space_before_for_parens),
    )
    .in_context(Exact(ForStatement))
    .with_priority(30),
    SpacingRule::new(
        "BeforeWhileParens",
        Exact(Keyword),
        Exact(LParen),
        Flag(|s| s.space_before_while_parens),
    )
    .in_context(OneOf(WHILE_CONTEXTS))
    .with_priority(30),
    SpacingRule::new(
        "BeforeCatchParens",
        Exact(Keyword),
        Exact(LParen),
        Flag(|s| s.space_before_catch_parens),
    )
    .in_context(Exact(CatchClause))
    .with_priority(30),
    SpacingRule::new(
        "BeforeSyncParens",
        Exact(Keyword),
        Exact(LParen),
        Flag(|s| s.space_before_synchronized_parens),
    )
    .in_context(Exact(SynchronizedStatement))
    .with_priority(30),
    SpacingRule::new(
        "BeforeCallParens",
        Any,
        Exact(LParen),
        Flag(|s| s.space_before_call_parens),
    )
    .in_context(Exact(CallExpression))
    .with_priority(30),
    SpacingRule::new(
        "BeforeMethodParens",
        Any,
        Exact(LParen),
        Flag(|s| s.space_before_method_parens),
    )
    .in_context(Exact(Method))
    .with_priority(30),
    SpacingRule::new(
        "BeforeAnonBody",
        Any,
        Exact(LBrace),
        Flag(|s| s.space_before_array_initializer_lbrace),
    )
    .in_context(Exact(CallExpression))
    .with_priority(30),
    SpacingRule::new("AfterAt", Exact(At), Any, Fixed(0)).with_priority(30),
    // Priority 35: unary operators
    SpacingRule::new("AfterNot", Exact(NotOp), Any, Fixed(0)).with_priority(35),
    SpacingRule::new(
        "AfterUnarySign",
        OneOf(&[AdditiveOp, IncDecOp]),
        Any,
        Fixed(0),
    )
    .in_context(Exact(UnaryExpression))
    .with_priority(35),
    SpacingRule::new("BeforeIncDec", Any, Exact(IncDecOp), Fixed(0)).with_priority(35),
    // Priority 40: binary operator families
    SpacingRule::new("BeforeAssign", Any, Exact(AssignOp), Flag(|s| s.space_around_assignment_ops))
        .with_priority(40),
    SpacingRule::new("AfterAssign", Exact(AssignOp), Any, Flag(|s| s.space_around_assignment_ops))
        .with_priority(40),
    SpacingRule::new("BeforeEquality", Any, Exact(EqualityOp), Flag(|s| s.space_around_equality_ops))
        .with_priority(40),
    SpacingRule::new("AfterEquality", Exact(EqualityOp), Any, Flag(|s| s.space_around_equality_ops))
        .with_priority(40),
    SpacingRule::new(
        "BeforeRelational",
        Any,
        Exact(RelationalOp),
        Flag(|s| s.space_around_relational_ops),
    )
    .with_priority(40),
    SpacingRule::new(
        "AfterRelational",
        Exact(RelationalOp),
        Any,
        Flag(|s| s.space_around_relational_ops),
    )
    .with_priority(40),
    SpacingRule::new("BeforeAdditive", Any, Exact(AdditiveOp), Flag(|s| s.space_around_additive_ops))
        .with_priority(40),
    SpacingRule::new("AfterAdditive", Exact(AdditiveOp), Any, Flag(|s| s.space_around_additive_ops))
        .with_priority(40),
    SpacingRule::new(
        "BeforeMultiplicative",
        Any,
        Exact(MultiplicativeOp),
        Flag(|s| s.space_around_multiplicative_ops),
    )
    .with_priority(40),
    SpacingRule::new(
        "AfterMultiplicative",
        Exact(MultiplicativeOp),
        Any,
        Flag(|s| s.space_around_multiplicative_ops),
    )
    .with_priority(40),
    SpacingRule::new("BeforeShift", Any, Exact(ShiftOp), Flag(|s| s.space_around_shift_ops))
        .with_priority(40),
    SpacingRule::new("AfterShift", Exact(ShiftOp), Any, Flag(|s| s.space_around_shift_ops))
        .with_priority(40),
    SpacingRule::new(
        "BeforeLogical",
        Any,
        OneOf(&[LogicalAndOp, LogicalOrOp]),
        Flag(|s| s.space_around_logical_ops),
    )
    .with_priority(40),
    SpacingRule::new(
        "AfterLogical",
        OneOf(&[LogicalAndOp, LogicalOrOp]),
        Any,
        Flag(|s| s.space_around_logical_ops),
    )
    .with_priority(40),
    SpacingRule::new("BeforeBitwise", Any, Exact(BitwiseOp), Flag(|s| s.space_around_bitwise_ops))
        .with_priority(40),
    SpacingRule::new("AfterBitwise", Exact(BitwiseOp), Any, Flag(|s| s.space_around_bitwise_ops))
        .with_priority(40),
    // Priority 50: keywords separate from their neighbors
    SpacingRule::new("AfterKeyword", Exact(Keyword), Any, Fixed(1)).with_priority(50),
    SpacingRule::new("BeforeKeyword", Any, Exact(Keyword), Fixed(1)).with_priority(50),
    // Priority 90: fallback — adjacent tokens never merge
    SpacingRule::new("Default", Any, Any, Fixed(1)).with_priority(90),
];

/// Find the first matching rule for a kind triple.
pub fn find_rule(left: SyntaxKind, right: SyntaxKind, context: SyntaxKind) -> &'static SpacingRule {
    SPACING_RULES
        .iter()
        .find(|rule| rule.matches(left, right, context))
        .unwrap_or(&SPACING_RULES[SPACING_RULES.len() - 1])
}

/// Spaces between two adjacent tokens when they share a line.
#[inline]
pub fn spaces_between(
    left: SyntaxKind,
    right: SyntaxKind,
    context: SyntaxKind,
    settings: &StyleSettings,
) -> u8 {
    find_rule(left, right, context).action.spaces(settings)
}

/// Number of spacing rules, exposed for schema-drift tests.
pub fn rule_count() -> usize {
    SPACING_RULES.len()
}
