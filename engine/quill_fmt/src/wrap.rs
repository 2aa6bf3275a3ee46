//! Line-wrapping resolution.
//!
//! After the initial whitespace assignment, lines whose tab-aware width
//! exceeds the right margin are broken at their designated wrap points.
//! Processing is top-down and outermost-scope-first: a break in an outer
//! construct fixes the line start that inner scopes are then re-measured
//! against. Each accepted break triggers a column recomputation, so the
//! resolver and the layout can never disagree.
//!
//! A line that cannot be brought within budget (no usable wrap point, or
//! an atomic token wider than the margin allows) is emitted as-is and
//! recorded as a non-fatal [`MarginViolation`] advisory.

use quill_style::WrapMode;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::align::AlignmentTable;
use crate::error::{FormatError, MarginViolation};
use crate::gaps::WrapRole;
use crate::layout::{self, Columns, Layout, Model};

/// Resolve wrapping; returns the final columns and any margin advisories.
pub fn resolve(
    model: &Model<'_>,
    layout: &mut Layout,
    table: &mut AlignmentTable,
) -> Result<(Columns, Vec<MarginViolation>), FormatError> {
    let margin = model.settings.right_margin;
    let mut violations = Vec::new();
    // Lines that stay overlong, keyed by their first token.
    let mut surrendered: FxHashSet<usize> = FxHashSet::default();

    loop {
        let columns = layout::compute_columns(model, layout, table)?;
        let mut acted = false;

        for (first, last) in layout::line_spans(layout, model.token_count()) {
            if columns.end[last] <= margin || surrendered.contains(&first) {
                continue;
            }
            match pick_break(model, layout, &columns, first, last, margin) {
                Some(gap) => {
                    take_break(model, layout, gap);
                    layout::resolve_conditional_braces(model, layout);
                }
                None => {
                    if let Some(v) = margin_violation(model, &columns, first, last, margin) {
                        violations.push(v);
                    }
                    surrendered.insert(first);
                }
            }
            acted = true;
            break;
        }

        if !acted {
            return Ok((columns, violations));
        }
    }
}

/// Choose the gap to break on an overlong line, or `None` if the line has
/// no usable wrap point.
fn pick_break(
    model: &Model<'_>,
    layout: &Layout,
    columns: &Columns,
    first: usize,
    last: usize,
    margin: usize,
) -> Option<usize> {
    let mut candidates: SmallVec<[usize; 8]> = SmallVec::new();
    for gap in first..last {
        if layout.breaks[gap] {
            continue;
        }
        let Some(candidate) = model.gaps[gap].candidate else {
            continue;
        };
        let mode = model.blocks.block(candidate.block).wrap;
        if mode.allows_breaks() {
            candidates.push(gap);
        }
    }
    if candidates.is_empty() {
        return None;
    }

    // Tie-break between a call's own argument list and the chain around
    // it: `prefer_parameters_wrap` keeps the chain intact and wraps the
    // arguments; otherwise the chain breaks first.
    let role_of = |gap: usize| model.gaps[gap].candidate.map(|c| c.role);
    let has_arguments = candidates.iter().any(|&g| role_of(g) == Some(WrapRole::Arguments));
    let has_chain = candidates.iter().any(|&g| role_of(g) == Some(WrapRole::CallChain));
    if has_arguments && has_chain {
        let dropped = if model.settings.prefer_parameters_wrap {
            WrapRole::CallChain
        } else {
            WrapRole::Arguments
        };
        candidates.retain(|&mut g| role_of(g) != Some(dropped));
    }

    // Outermost scope first.
    let min_depth = candidates
        .iter()
        .map(|&g| depth_of(model, g))
        .min()
        .unwrap_or(0);
    candidates.retain(|&mut g| depth_of(model, g) == min_depth);

    // The latest point whose prefix still fits; if nothing fits, the
    // earliest point (the break must land somewhere).
    let fitting = candidates
        .iter()
        .copied()
        .filter(|&g| columns.end[g] <= margin)
        .next_back();
    fitting.or_else(|| candidates.first().copied())
}

fn depth_of(model: &Model<'_>, gap: usize) -> u16 {
    model.gaps[gap]
        .candidate
        .map_or(u16::MAX, |candidate| candidate.depth)
}

/// Apply one chosen break; chop-down policies break the whole construct.
fn take_break(model: &Model<'_>, layout: &mut Layout, gap: usize) {
    let Some(candidate) = model.gaps[gap].candidate else {
        return;
    };
    let mode = model.blocks.block(candidate.block).wrap;
    if mode == WrapMode::ChopDownIfLong {
        // The construct did not fit: every one of its designated points
        // breaks, not just the overflowing one.
        for (other, spec) in model.gaps.iter().enumerate() {
            if let Some(other_candidate) = spec.candidate {
                if other_candidate.block == candidate.block && !layout.breaks[other] {
                    layout.breaks[other] = true;
                    layout.feeds[other] = spec.feeds().max(1);
                }
            }
        }
    } else {
        layout.breaks[gap] = true;
        layout.feeds[gap] = model.gaps[gap].feeds().max(1);
    }
}

/// Advisory for a line that stays overlong: only an atomic token that
/// cannot fit even at the line's indent is a violation. A merely long
/// line with a `Never` wrap policy is left as-is silently.
fn margin_violation(
    model: &Model<'_>,
    columns: &Columns,
    first: usize,
    last: usize,
    margin: usize,
) -> Option<MarginViolation> {
    let indent = columns.start[first];
    let budget = margin.saturating_sub(indent);
    let token = (first..=last).find(|&t| {
        columns.end[t] > margin && columns.end[t] - columns.start[t] > budget
    })?;
    Some(MarginViolation {
        span: model.tree.tokens()[token].span,
        width: columns.end[token],
        margin,
    })
}
