//! Concrete whitespace assignment.
//!
//! Decides which boundaries actually break (required breaks, preserved
//! breaks under `keep_line_breaks`, conditional braces) and computes the
//! column every token lands on, including indentation and alignment for
//! line-starting tokens. The wrap resolver mutates the break set and
//! recomputes columns through the same functions, so the two passes can
//! never disagree about geometry.

use quill_style::StyleSettings;
use quill_tree::SourceTree;

use crate::align::AlignmentTable;
use crate::blocks::{BlockTree, IndentRule};
use crate::error::FormatError;
use crate::gaps::{BreakKind, GapSpec};
use crate::measure;

/// Everything the layout passes read; built once per invocation.
pub struct Model<'a> {
    pub tree: &'a SourceTree,
    pub blocks: &'a BlockTree,
    pub gaps: &'a [GapSpec],
    pub settings: &'a StyleSettings,
}

impl Model<'_> {
    #[inline]
    pub fn token_text(&self, token: usize) -> &str {
        self.tree.text_at(self.tree.tokens()[token].span)
    }

    #[inline]
    pub fn token_count(&self) -> usize {
        self.tree.tokens().len()
    }
}

/// The mutable break assignment: which gaps break, and with how many
/// line feeds.
#[derive(Debug, Clone)]
pub struct Layout {
    pub breaks: Vec<bool>,
    pub feeds: Vec<u8>,
}

/// Start and end column of every token under a given break assignment.
pub struct Columns {
    pub start: Vec<usize>,
    pub end: Vec<usize>,
}

/// Initial break decisions from the gap specs alone.
pub fn initial(model: &Model<'_>) -> Layout {
    let mut layout = Layout {
        breaks: Vec::with_capacity(model.gaps.len()),
        feeds: Vec::with_capacity(model.gaps.len()),
    };
    for spec in model.gaps {
        let taken = match spec.break_kind {
            BreakKind::Required => true,
            BreakKind::Forbidden => false,
            BreakKind::Optional => {
                spec.keepable && model.settings.keep_line_breaks && spec.original_feeds > 0
            }
        };
        layout.breaks.push(taken);
        layout.feeds.push(spec.feeds());
    }
    resolve_conditional_braces(model, &mut layout);
    layout
}

/// `NextLineIfWrapped` braces break exactly when their declarator wrapped.
pub fn resolve_conditional_braces(model: &Model<'_>, layout: &mut Layout) {
    for (gap, spec) in model.gaps.iter().enumerate() {
        let Some(body) = spec.conditional_brace else {
            continue;
        };
        if layout.breaks[gap] {
            continue;
        }
        let Some(owner) = model.blocks.block(body).parent else {
            continue;
        };
        let declarator_start = model.blocks.block(owner).tokens.start;
        if (declarator_start..gap).any(|g| layout.breaks[g]) {
            layout.breaks[gap] = true;
            layout.feeds[gap] = layout.feeds[gap].max(1);
        }
    }
}

/// Line spans (first and last token index) under a break assignment.
pub fn line_spans(layout: &Layout, token_count: usize) -> Vec<(usize, usize)> {
    let mut lines = Vec::new();
    if token_count == 0 {
        return lines;
    }
    let mut first = 0usize;
    for gap in 0..layout.breaks.len() {
        if layout.breaks[gap] {
            lines.push((first, gap));
            first = gap + 1;
        }
    }
    lines.push((first, token_count - 1));
    lines
}

/// Compute token columns for the current break assignment.
///
/// Fills the alignment table as anchor tokens are placed, and consults it
/// for line-starting members of alignment groups.
pub fn compute_columns(
    model: &Model<'_>,
    layout: &Layout,
    table: &mut AlignmentTable,
) -> Result<Columns, FormatError> {
    let n = model.token_count();
    let mut columns = Columns {
        start: vec![0; n],
        end: vec![0; n],
    };
    table.reset();
    let tab_size = model.settings.tab_size;
    for token in 0..n {
        let col = if token == 0 || layout.breaks[token - 1] {
            indent_for(model, token, table)?
        } else {
            columns.end[token - 1] + model.gaps[token - 1].spaces as usize
        };
        columns.start[token] = col;
        columns.end[token] = measure::advance(col, model.token_text(token), tab_size);
        table.place(token, col);
    }
    Ok(columns)
}

/// Indentation column for a token that starts a line.
///
/// Walks the token's block chain from innermost to root:
/// - a braced scope adds its body shift (brace tokens themselves get the
///   style's brace shift) and freezes continuation and alignment from
///   scopes further out;
/// - a continuation scope marks the line as a continuation (applied once,
///   not per nesting level);
/// - an aligned scope, before any braced boundary, snaps the line to the
///   group's anchor column;
/// - a hanging braceless body adds one indent unit.
///
/// The walk must end at the root block; anything else is a detached
/// indent scope and a [`FormatError::Design`].
fn indent_for(
    model: &Model<'_>,
    token: usize,
    table: &AlignmentTable,
) -> Result<usize, FormatError> {
    let blocks = model.blocks;
    let settings = model.settings;
    let mut units = 0usize;
    let mut continuation = false;
    let mut crossed_scope = false;
    let mut label = false;
    let mut outermost = None;
    let mut came_from: Option<crate::blocks::BlockId> = None;

    for id in blocks.ancestors(token) {
        outermost = Some(id);
        let block = blocks.block(id);
        let first = block.tokens.start == token;
        let last = block.tokens.end - 1 == token;

        // Alignment binds the block's own operators and the start of its
        // direct elements, not arbitrarily nested content.
        let direct = came_from.map_or(true, |c| blocks.block(c).tokens.start == token);
        if !crossed_scope && !first && direct {
            if let Some(align) = block.align {
                if blocks.group(align).anchor_token != token {
                    if let Some(column) = table.anchor(align) {
                        return Ok(column);
                    }
                }
            }
        }

        match block.indent {
            IndentRule::Block => {
                let style = block.brace_style.unwrap_or_default();
                if first || last {
                    units += style.brace_shift();
                } else {
                    units += style.body_shift();
                }
                crossed_scope = true;
            }
            IndentRule::Continuation => {
                if !crossed_scope && !first {
                    continuation = true;
                }
            }
            IndentRule::Label => {
                if first {
                    label = true;
                }
            }
            IndentRule::None => {}
        }
        if block.hanging {
            units += 1;
        }
        came_from = Some(id);
    }

    if outermost != Some(blocks.root()) {
        return Err(FormatError::Design(format!(
            "token {token} resolves to a detached indent scope"
        )));
    }

    // A fresh-line boundary (after an annotation) starts the declaration
    // proper: no continuation indent.
    if token > 0 && model.gaps[token - 1].fresh_line {
        continuation = false;
    }

    let mut column = units * settings.indent_size
        + usize::from(continuation) * settings.continuation_indent_size;
    if label {
        column = if settings.label_indent_absolute {
            settings.label_indent
        } else {
            column + settings.label_indent
        };
    }
    Ok(column)
}
