//! Tests for the token-pair spacing table.

use pretty_assertions::assert_eq;
use quill_style::StyleSettings;
use quill_tree::SyntaxKind;

use super::{find_rule, spaces_between};

fn defaults() -> StyleSettings {
    StyleSettings::default()
}

#[test]
fn empty_parens_hug() {
    assert_eq!(
        spaces_between(
            SyntaxKind::LParen,
            SyntaxKind::RParen,
            SyntaxKind::ArgumentList,
            &defaults()
        ),
        0
    );
}

#[test]
fn dot_hugs_both_sides() {
    let s = defaults();
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::Dot,
            SyntaxKind::CallExpression,
            &s
        ),
        0
    );
    assert_eq!(
        spaces_between(
            SyntaxKind::Dot,
            SyntaxKind::Identifier,
            SyntaxKind::CallExpression,
            &s
        ),
        0
    );
}

#[test]
fn comma_spaces_follow_flags() {
    let mut s = defaults();
    assert_eq!(
        spaces_between(
            SyntaxKind::Comma,
            SyntaxKind::Identifier,
            SyntaxKind::ArgumentList,
            &s
        ),
        1
    );
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::Comma,
            SyntaxKind::ArgumentList,
            &s
        ),
        0
    );
    s.space_after_comma = false;
    s.space_before_comma = true;
    assert_eq!(
        spaces_between(
            SyntaxKind::Comma,
            SyntaxKind::Identifier,
            SyntaxKind::ArgumentList,
            &s
        ),
        0
    );
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::Comma,
            SyntaxKind::ArgumentList,
            &s
        ),
        1
    );
}

#[test]
fn construct_parens_differ_by_context() {
    let mut s = defaults();
    // Default: `if (` but `call(`.
    assert_eq!(
        spaces_between(
            SyntaxKind::Keyword,
            SyntaxKind::LParen,
            SyntaxKind::IfStatement,
            &s
        ),
        1
    );
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::LParen,
            SyntaxKind::CallExpression,
            &s
        ),
        0
    );
    s.space_before_if_parens = false;
    assert_eq!(
        spaces_between(
            SyntaxKind::Keyword,
            SyntaxKind::LParen,
            SyntaxKind::IfStatement,
            &s
        ),
        0
    );
}

#[test]
fn synchronized_parens_follow_flags() {
    let mut s = defaults();
    assert_eq!(
        spaces_between(
            SyntaxKind::Keyword,
            SyntaxKind::LParen,
            SyntaxKind::SynchronizedStatement,
            &s
        ),
        1
    );
    s.space_before_synchronized_parens = false;
    assert_eq!(
        spaces_between(
            SyntaxKind::Keyword,
            SyntaxKind::LParen,
            SyntaxKind::SynchronizedStatement,
            &s
        ),
        0
    );
    s.space_within_synchronized_parens = true;
    assert_eq!(
        spaces_between(
            SyntaxKind::LParen,
            SyntaxKind::Identifier,
            SyntaxKind::SynchronizedStatement,
            &s
        ),
        1
    );
}

#[test]
fn binary_operator_families_follow_flags() {
    let mut s = defaults();
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::AdditiveOp,
            SyntaxKind::BinaryExpression,
            &s
        ),
        1
    );
    s.space_around_additive_ops = false;
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::AdditiveOp,
            SyntaxKind::BinaryExpression,
            &s
        ),
        0
    );
    // Multiplicative unaffected by the additive flag.
    assert_eq!(
        spaces_between(
            SyntaxKind::MultiplicativeOp,
            SyntaxKind::Identifier,
            SyntaxKind::BinaryExpression,
            &s
        ),
        1
    );
}

#[test]
fn unary_sign_hugs_operand() {
    assert_eq!(
        spaces_between(
            SyntaxKind::AdditiveOp,
            SyntaxKind::Literal,
            SyntaxKind::UnaryExpression,
            &defaults()
        ),
        0
    );
    assert_eq!(
        spaces_between(
            SyntaxKind::NotOp,
            SyntaxKind::Identifier,
            SyntaxKind::UnaryExpression,
            &defaults()
        ),
        0
    );
}

#[test]
fn label_colon_hugs_name() {
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::Colon,
            SyntaxKind::Label,
            &defaults()
        ),
        0
    );
}

#[test]
fn ternary_punctuation_is_spaced() {
    let s = defaults();
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::Question,
            SyntaxKind::TernaryExpression,
            &s
        ),
        1
    );
    assert_eq!(
        spaces_between(
            SyntaxKind::Colon,
            SyntaxKind::Identifier,
            SyntaxKind::TernaryExpression,
            &s
        ),
        1
    );
}

#[test]
fn keywords_are_separated() {
    assert_eq!(
        spaces_between(
            SyntaxKind::Keyword,
            SyntaxKind::Identifier,
            SyntaxKind::ClassDeclaration,
            &defaults()
        ),
        1
    );
}

#[test]
fn fallback_prevents_token_merging() {
    assert_eq!(
        spaces_between(
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::LocalVariable,
            &defaults()
        ),
        1
    );
}

#[test]
fn first_match_wins_by_table_order() {
    // Empty parens beat the within-call interior rules.
    let rule = find_rule(
        SyntaxKind::LParen,
        SyntaxKind::RParen,
        SyntaxKind::ArgumentList,
    );
    assert_eq!(rule.name, "EmptyParens");
}

#[test]
fn rule_table_ends_with_catch_all() {
    let last = &super::SPACING_RULES[super::rule_count() - 1];
    assert_eq!(last.name, "Default");
    assert!(last.matches(
        SyntaxKind::Literal,
        SyntaxKind::Literal,
        SyntaxKind::File
    ));
}
