//! Whitespace requirements for every token boundary.
//!
//! For each pair of adjacent tokens this pass derives a [`GapSpec`]: how
//! many spaces separate them on one line, whether a line break is
//! forbidden, optional, or required, how many blank lines may survive,
//! and whether the boundary is a designated wrap point. It combines the
//! token-pair rule table in [`crate::spacing`] with structural decisions
//! keyed on the block tree: brace placement, statement and member
//! boundaries, blank-line budgets, comment attachment, and clause
//! keywords (`else`, `catch`, `finally`, a do-while's `while`).

use quill_style::{BraceStyle, StyleSettings};
use quill_tree::{SourceTree, SyntaxKind};

use crate::blocks::{BlockId, BlockTree, DirectItem};
use crate::spacing;

/// Whether a boundary may, must, or must not break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BreakKind {
    Forbidden,
    #[default]
    Optional,
    Required,
}

/// What kind of designated wrap point a boundary is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapRole {
    Arguments,
    Parameters,
    BinaryOperation,
    CallChain,
    Extends,
    Throws,
    ArrayInitializer,
}

/// A designated break point and the block whose wrap policy governs it.
#[derive(Clone, Copy, Debug)]
pub struct WrapCandidate {
    pub block: BlockId,
    pub role: WrapRole,
    pub depth: u16,
}

/// Whitespace requirement for one token boundary.
#[derive(Clone, Debug)]
pub struct GapSpec {
    /// Spaces between the tokens when they share a line.
    pub spaces: u8,
    pub break_kind: BreakKind,
    /// Line feeds when broken (2 = one blank line enforced).
    pub min_feeds: u8,
    /// Blank lines that may be preserved from the source.
    pub max_blanks: u8,
    /// An existing break here survives `keep_line_breaks`.
    pub keepable: bool,
    /// Designated wrap point, if any.
    pub candidate: Option<WrapCandidate>,
    /// Brace gap of a `NextLineIfWrapped` body: breaks only if the
    /// declarator before it wrapped.
    pub conditional_brace: Option<BlockId>,
    /// Breaking here starts a fresh logical line: the next line does not
    /// take continuation indent (annotation boundaries).
    pub fresh_line: bool,
    /// Newlines present in the original text of this gap.
    pub original_feeds: u8,
}

impl GapSpec {
    /// Line feeds to emit when this gap breaks: original blanks clamped
    /// between the required minimum and the preservation budget.
    pub fn feeds(&self) -> u8 {
        let cap = 1 + self.max_blanks;
        self.original_feeds.clamp(self.min_feeds.max(1), cap.max(self.min_feeds))
    }
}

/// Compute the gap specs for every boundary.
pub fn compute(tree: &SourceTree, blocks: &BlockTree, settings: &StyleSettings) -> Vec<GapSpec> {
    let tokens = tree.tokens();
    if tokens.len() < 2 {
        return Vec::new();
    }
    let mut gaps: Vec<GapSpec> = (0..tokens.len() - 1)
        .map(|i| base_spec(tree, blocks, settings, i))
        .collect();

    for index in 0..blocks.len() {
        let id = BlockId(index as u32);
        apply_block(tree, blocks, settings, id, &mut gaps);
    }
    gaps
}

// ----------------------------------------------------------------------
// Base pass: token-pair spacing
// ----------------------------------------------------------------------

fn base_spec(
    tree: &SourceTree,
    blocks: &BlockTree,
    settings: &StyleSettings,
    gap: usize,
) -> GapSpec {
    let tokens = tree.tokens();
    let left = tokens[gap].kind;
    let right = tokens[gap + 1].kind;
    let context = blocks.block(blocks.common_ancestor(gap, gap + 1)).kind;

    // Generic angle brackets hug regardless of relational-operator flags.
    let in_type_ref = |token: usize| {
        blocks.block(blocks.owner_of(token)).kind == SyntaxKind::TypeRef
    };
    let spaces = if (right == SyntaxKind::RelationalOp && in_type_ref(gap + 1))
        || (left == SyntaxKind::RelationalOp && in_type_ref(gap))
    {
        0
    } else {
        spacing::spaces_between(left, right, context, settings)
    };

    let original = gap_text(tree, gap);
    let original_feeds = original.bytes().filter(|&b| b == b'\n').count().min(255) as u8;

    GapSpec {
        spaces,
        // A line comment never rejoins the line that follows it.
        break_kind: if left == SyntaxKind::LineComment {
            BreakKind::Required
        } else {
            BreakKind::Optional
        },
        min_feeds: 1,
        max_blanks: 0,
        keepable: true,
        candidate: None,
        conditional_brace: None,
        fresh_line: false,
        original_feeds,
    }
}

fn gap_text<'t>(tree: &'t SourceTree, gap: usize) -> &'t str {
    let tokens = tree.tokens();
    let span = quill_tree::Span::new(tokens[gap].span.end, tokens[gap + 1].span.start);
    tree.text_at(span)
}

// ----------------------------------------------------------------------
// Structural pass: per-block decisions
// ----------------------------------------------------------------------

fn apply_block(
    tree: &SourceTree,
    blocks: &BlockTree,
    settings: &StyleSettings,
    id: BlockId,
    gaps: &mut [GapSpec],
) {
    let block = blocks.block(id);
    match block.kind {
        SyntaxKind::ClassBody | SyntaxKind::CodeBlock => {
            apply_braced_body(tree, blocks, settings, id, gaps);
            apply_boundaries(blocks, settings, id, gaps);
        }
        SyntaxKind::File | SyntaxKind::ImportList => {
            apply_boundaries(blocks, settings, id, gaps);
        }
        SyntaxKind::ElseClause => {
            apply_clause_keyword(settings.else_on_new_line, block.tokens.start, gaps);
        }
        SyntaxKind::CatchClause => {
            apply_clause_keyword(settings.catch_on_new_line, block.tokens.start, gaps);
        }
        SyntaxKind::FinallyClause => {
            apply_clause_keyword(settings.finally_on_new_line, block.tokens.start, gaps);
        }
        SyntaxKind::DoWhileStatement => {
            apply_do_while_keyword(blocks, settings, id, gaps);
        }
        SyntaxKind::ArgumentList => {
            apply_list_candidates(blocks, id, WrapRole::Arguments, gaps);
        }
        SyntaxKind::ParameterList => {
            apply_list_candidates(blocks, id, WrapRole::Parameters, gaps);
        }
        SyntaxKind::ExtendsList => {
            apply_list_candidates(blocks, id, WrapRole::Extends, gaps);
        }
        SyntaxKind::ThrowsList => {
            apply_list_candidates(blocks, id, WrapRole::Throws, gaps);
        }
        SyntaxKind::ArrayInitializer => {
            apply_list_candidates(blocks, id, WrapRole::ArrayInitializer, gaps);
        }
        SyntaxKind::BinaryExpression => {
            apply_binary_candidates(blocks, settings, id, gaps);
        }
        SyntaxKind::CallChain => {
            apply_chain_candidates(blocks, id, gaps);
        }
        SyntaxKind::Method | SyntaxKind::FieldDeclaration | SyntaxKind::ClassDeclaration => {
            apply_annotation_boundaries(blocks, id, gaps);
        }
        _ => {}
    }
    if block.hanging {
        apply_hanging_body(settings, block.tokens.start, gaps);
    }
}

/// Brace placement and body break requirements for `{ ... }` bodies.
fn apply_braced_body(
    tree: &SourceTree,
    blocks: &BlockTree,
    settings: &StyleSettings,
    id: BlockId,
    gaps: &mut [GapSpec],
) {
    let block = blocks.block(id);
    let open = block.tokens.start;
    let close = block.tokens.end - 1;
    if blocks.token_kind(open) != SyntaxKind::LBrace
        || blocks.token_kind(close) != SyntaxKind::RBrace
    {
        return;
    }
    let style = block.brace_style.unwrap_or_default();
    let owner_kind = block
        .parent
        .map_or(SyntaxKind::File, |p| blocks.block(p).kind);

    // Gap before `{`.
    if open > 0 {
        let gap = &mut gaps[open - 1];
        gap.spaces = u8::from(lbrace_space(owner_kind, settings));
        match style {
            BraceStyle::EndOfLine => {}
            BraceStyle::NextLine | BraceStyle::NextLineShifted | BraceStyle::NextLineShiftedTwice => {
                gap.break_kind = BreakKind::Required;
                gap.min_feeds = 1;
                gap.max_blanks = 0;
            }
            BraceStyle::NextLineIfWrapped => {
                gap.conditional_brace = Some(id);
            }
        }
    }

    // A body kept in one line: only when it was one line in the source
    // and the matching keep flag allows it.
    let one_line_source = !tree.text_at(tree.span(block.node)).contains('\n');
    let keep_flag = match block.kind {
        SyntaxKind::ClassBody => settings.keep_simple_classes_in_one_line,
        _ if owner_kind == SyntaxKind::Method => settings.keep_simple_methods_in_one_line,
        _ => settings.keep_simple_blocks_in_one_line,
    };
    let joinable = one_line_source && keep_flag;

    // Gap after `{`.
    if close > open {
        let gap = &mut gaps[open];
        if joinable {
            gap.break_kind = BreakKind::Optional;
            // `{}` stays glued; a one-line body gets `{ body }`.
            gap.spaces = u8::from(close > open + 1);
        } else {
            gap.break_kind = BreakKind::Required;
        }
        if block.kind == SyntaxKind::ClassBody && close > open + 1 {
            gap.min_feeds = 1 + settings.blank_lines_after_class_header.min(254) as u8;
            gap.max_blanks = clamp_blanks(
                settings.blank_lines_after_class_header,
                settings.keep_blank_lines_in_declarations,
            );
        } else {
            gap.min_feeds = 1;
            gap.max_blanks = settings.keep_blank_lines_in_code.min(255) as u8;
        }
    }

    // Gap before `}` (distinct from the gap after `{` for non-empty
    // bodies; for empty bodies the single gap keeps the settings above).
    if close > open + 1 {
        let gap = &mut gaps[close - 1];
        if joinable {
            gap.break_kind = BreakKind::Optional;
            gap.spaces = 1;
        } else {
            gap.break_kind = BreakKind::Required;
        }
        gap.min_feeds = 1;
        gap.max_blanks = settings.keep_blank_lines_before_rbrace.min(255) as u8;
    }
}

fn clamp_blanks(minimum: usize, keep: usize) -> u8 {
    minimum.max(keep).min(255) as u8
}

fn lbrace_space(owner: SyntaxKind, settings: &StyleSettings) -> bool {
    match owner {
        SyntaxKind::ClassDeclaration => settings.space_before_class_lbrace,
        SyntaxKind::Method => settings.space_before_method_lbrace,
        SyntaxKind::IfStatement => settings.space_before_if_lbrace,
        SyntaxKind::ElseClause => settings.space_before_else_lbrace,
        SyntaxKind::ForStatement => settings.space_before_for_lbrace,
        SyntaxKind::WhileStatement => settings.space_before_while_lbrace,
        SyntaxKind::DoWhileStatement => settings.space_before_do_lbrace,
        SyntaxKind::TryStatement => settings.space_before_try_lbrace,
        SyntaxKind::CatchClause => settings.space_before_catch_lbrace,
        SyntaxKind::FinallyClause => settings.space_before_finally_lbrace,
        SyntaxKind::SynchronizedStatement => settings.space_before_synchronized_lbrace,
        _ => true,
    }
}

/// Breaks and blank-line budgets between the direct items of a body.
fn apply_boundaries(
    blocks: &BlockTree,
    settings: &StyleSettings,
    id: BlockId,
    gaps: &mut [GapSpec],
) {
    let kind = blocks.block(id).kind;
    let items: Vec<DirectItem> = blocks
        .direct_items(id)
        .into_iter()
        .filter(|item| {
            !matches!(item.kind, SyntaxKind::LBrace | SyntaxKind::RBrace)
        })
        .collect();

    for pair in items.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let gap_index = right.tokens.start - 1;

        if right.is_comment() && gaps[gap_index].original_feeds == 0 {
            // Trailing comment: stays on the statement's line.
            gaps[gap_index].break_kind = BreakKind::Optional;
            gaps[gap_index].spaces = 1;
            continue;
        }

        // A comment that sat on its own line attaches to what follows.
        let left_own_line = left.is_comment()
            && (left.tokens.start == 0 || gaps[left.tokens.start - 1].original_feeds > 0);

        let gap = &mut gaps[gap_index];
        gap.break_kind = BreakKind::Required;
        gap.min_feeds = 1;

        if left_own_line {
            // A comment attached above a declaration is never separated
            // from it: no blank lines survive below the comment.
            gap.max_blanks = 0;
            continue;
        }

        match kind {
            SyntaxKind::ClassBody => {
                // Blank minima apply above the comment block attached to
                // a member, so look through comments on the right side.
                let right_kind = next_attached_kind(&items, right);
                let minimum = member_blanks(left.kind, settings)
                    .max(member_blanks(right_kind, settings));
                gap.min_feeds = 1 + minimum.min(254) as u8;
                gap.max_blanks =
                    clamp_blanks(minimum, settings.keep_blank_lines_in_declarations);
            }
            SyntaxKind::File => {
                let minimum = match left.kind {
                    SyntaxKind::PackageStatement => settings.blank_lines_after_package,
                    SyntaxKind::ImportList => settings.blank_lines_after_imports,
                    SyntaxKind::ClassDeclaration => settings.blank_lines_around_class,
                    _ => 0,
                };
                gap.min_feeds = 1 + minimum.min(254) as u8;
                gap.max_blanks =
                    clamp_blanks(minimum, settings.keep_blank_lines_in_declarations);
            }
            SyntaxKind::ImportList => {
                gap.max_blanks = settings.keep_blank_lines_in_declarations.min(255) as u8;
            }
            _ => {
                gap.max_blanks = settings.keep_blank_lines_in_code.min(255) as u8;
            }
        }
    }
}

/// The declaration a run of own-line comments attaches to.
fn next_attached_kind(items: &[DirectItem], from: &DirectItem) -> SyntaxKind {
    if !from.is_comment() {
        return from.kind;
    }
    let start = from.tokens.start;
    items
        .iter()
        .skip_while(|item| item.tokens.start < start)
        .find(|item| !item.is_comment())
        .map_or(from.kind, |item| item.kind)
}

fn member_blanks(kind: SyntaxKind, settings: &StyleSettings) -> usize {
    match kind {
        SyntaxKind::Method | SyntaxKind::StaticInitializer => settings.blank_lines_around_method,
        SyntaxKind::FieldDeclaration => settings.blank_lines_around_field,
        SyntaxKind::ClassDeclaration => settings.blank_lines_around_class,
        _ => 0,
    }
}

/// `else`, `catch`, `finally` placement relative to the closing brace.
fn apply_clause_keyword(on_new_line: bool, keyword_token: usize, gaps: &mut [GapSpec]) {
    if keyword_token == 0 {
        return;
    }
    let gap = &mut gaps[keyword_token - 1];
    gap.spaces = 1;
    if on_new_line {
        gap.break_kind = BreakKind::Required;
        gap.min_feeds = 1;
        gap.max_blanks = 0;
    } else {
        gap.break_kind = BreakKind::Optional;
    }
}

/// The trailing `while` of a do-while.
fn apply_do_while_keyword(
    blocks: &BlockTree,
    settings: &StyleSettings,
    id: BlockId,
    gaps: &mut [GapSpec],
) {
    let items = blocks.direct_items(id);
    let mut seen_body = false;
    for item in items {
        if item.kind == SyntaxKind::CodeBlock || item.kind.is_statement() {
            seen_body = true;
            continue;
        }
        if seen_body && item.kind == SyntaxKind::Keyword {
            apply_clause_keyword(settings.while_on_new_line, item.tokens.start, gaps);
            return;
        }
    }
}

/// A braceless control-flow body keeps or gets its own line.
fn apply_hanging_body(settings: &StyleSettings, first_token: usize, gaps: &mut [GapSpec]) {
    if first_token == 0 {
        return;
    }
    let gap = &mut gaps[first_token - 1];
    gap.spaces = 1;
    gap.break_kind = if settings.keep_control_statement_in_one_line {
        BreakKind::Optional
    } else {
        BreakKind::Required
    };
    gap.min_feeds = 1;
    gap.max_blanks = 0;
}

/// The line after an annotation is the start of the declaration proper,
/// not a continuation of the annotation.
fn apply_annotation_boundaries(blocks: &BlockTree, id: BlockId, gaps: &mut [GapSpec]) {
    let items = blocks.direct_items(id);
    let mut index = 0;
    while index < items.len() {
        if items[index].kind != SyntaxKind::At {
            index += 1;
            continue;
        }
        let mut end = index + 1;
        if items.get(end).is_some_and(|i| i.kind == SyntaxKind::Identifier) {
            end += 1;
        }
        if items.get(end).is_some_and(|i| i.kind == SyntaxKind::ArgumentList) {
            end += 1;
        }
        if let Some(next) = items.get(end) {
            if next.tokens.start > 0 {
                gaps[next.tokens.start - 1].fresh_line = true;
            }
        }
        index = end;
    }
}

/// Designated break points before each list element after the first.
fn apply_list_candidates(blocks: &BlockTree, id: BlockId, role: WrapRole, gaps: &mut [GapSpec]) {
    let block = blocks.block(id);
    let force = block.wrap.forces_breaks();
    for &element in block.elements.iter().skip(1) {
        if element == 0 {
            continue;
        }
        let gap = &mut gaps[element - 1];
        gap.candidate = Some(WrapCandidate {
            block: id,
            role,
            depth: block.depth,
        });
        if force {
            gap.break_kind = BreakKind::Required;
        }
    }
}

/// Designated break points around binary operators.
fn apply_binary_candidates(
    blocks: &BlockTree,
    settings: &StyleSettings,
    id: BlockId,
    gaps: &mut [GapSpec],
) {
    let block = blocks.block(id);
    let force = block.wrap.forces_breaks();
    for item in blocks.direct_items(id) {
        if item.tokens.len() != 1 || !item.kind.is_binary_op() {
            continue;
        }
        let operator = item.tokens.start;
        // Break after the operator by default; before it when the sign
        // moves to the next line.
        let gap_index = if settings.binary_operation_sign_on_next_line {
            if operator == 0 {
                continue;
            }
            operator - 1
        } else {
            operator
        };
        if gap_index >= gaps.len() {
            continue;
        }
        let gap = &mut gaps[gap_index];
        gap.candidate = Some(WrapCandidate {
            block: id,
            role: WrapRole::BinaryOperation,
            depth: block.depth,
        });
        if force {
            gap.break_kind = BreakKind::Required;
        }
    }
}


/// Designated break points before each `.` of a call chain.
fn apply_chain_candidates(blocks: &BlockTree, id: BlockId, gaps: &mut [GapSpec]) {
    let block = blocks.block(id);
    let force = block.wrap.forces_breaks();
    for token in block.tokens.clone() {
        if blocks.token_kind(token) != SyntaxKind::Dot || token == 0 {
            continue;
        }
        if !blocks.is_ancestor(id, blocks.owner_of(token)) {
            continue;
        }
        let gap = &mut gaps[token - 1];
        gap.candidate = Some(WrapCandidate {
            block: id,
            role: WrapRole::CallChain,
            depth: block.depth,
        });
        if force {
            gap.break_kind = BreakKind::Required;
        }
    }
}
