//! Edit emission and range limiting.
//!
//! The engine never rewrites token text: its output is a list of
//! whitespace replacements for inter-token gaps whose content differs
//! from the computed assignment. Formatting an already-formatted document
//! therefore produces an empty edit list.
//!
//! Range-limited formatting computes the same assignments for the whole
//! tree, then keeps only edits inside the requested range (expanded to
//! whole lines). A gap straddling the range start is clipped to its
//! final-line indentation; content past the range end is left
//! byte-for-byte unchanged, even when inconsistent with the reformatted
//! prefix.

use quill_tree::{LineIndex, Span};

use crate::layout::{Columns, Layout, Model};
use crate::measure;

/// One whitespace replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Source span being replaced (always between two tokens, or the
    /// document's leading whitespace).
    pub span: Span,
    /// Replacement text: spaces, tabs, and newlines only.
    pub replacement: String,
}

/// Caller-specified sub-range of the document to reformat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRange {
    /// A byte range; expanded to whole lines before filtering.
    Bytes(Span),
    /// An inclusive zero-based line range.
    Lines { first: usize, last: usize },
}

impl EditRange {
    /// Resolve to the byte span gap edits must lie within. Line ranges
    /// resolve through the document's line table; byte ranges are taken
    /// as given (line-indent adjustment handles their line boundaries).
    pub fn resolve(self, index: &LineIndex) -> Span {
        match self {
            EditRange::Bytes(span) => span,
            EditRange::Lines { first, last } => index.span_of_lines(first, last),
        }
    }
}

/// Diff the computed assignment against the original text.
///
/// With a range, two classes of edits survive:
/// - gaps lying fully inside the requested span are edited in full;
/// - a line that intersects the span has its leading indentation
///   adjusted, even when the boundary producing it starts before the
///   span (clipped so the break itself, which lies outside, survives).
///
/// Everything else — including content past the span end — is left
/// byte-for-byte unchanged. All emitted edits stay within the requested
/// span expanded to whole lines.
pub fn diff(
    model: &Model<'_>,
    layout: &Layout,
    columns: &Columns,
    range: Option<Span>,
) -> Vec<Edit> {
    let tokens = model.tree.tokens();
    let mut edits = Vec::new();
    if tokens.is_empty() {
        return edits;
    }

    // Leading whitespace before the first token is stripped.
    let leading = Span::new(0, tokens[0].span.start);
    if !leading.is_empty() {
        let inside = range.is_none_or(|r| r.contains_span(leading));
        if inside && !model.tree.text_at(leading).is_empty() {
            edits.push(Edit {
                span: leading,
                replacement: String::new(),
            });
        }
    }

    for gap in 0..model.gaps.len() {
        let span = Span::new(tokens[gap].span.end, tokens[gap + 1].span.start);
        let original = model.tree.text_at(span);
        let desired = assignment(model, layout, columns, gap);

        match range {
            None => {
                if original != desired {
                    edits.push(Edit {
                        span,
                        replacement: desired,
                    });
                }
            }
            Some(r) => {
                if span.start >= r.start && span.end <= r.end {
                    if layout.breaks[gap] && tokens[gap + 1].span.start >= r.end {
                        // The boundary is in range but the line it opens is
                        // not: adjust the break itself and leave the
                        // trailing indentation untouched.
                        clip_end(layout, gap, span, original, &mut edits);
                    } else if original != desired {
                        edits.push(Edit {
                            span,
                            replacement: desired,
                        });
                    }
                } else if layout.breaks[gap] && line_after_intersects(model, layout, gap, r) {
                    clip_start(model, layout, columns, gap, span, original, r, &mut edits);
                }
                // Straddling the range end or fully outside: untouched.
            }
        }
    }
    edits
}

/// Whether the line started by the token after `gap` intersects the
/// requested span.
fn line_after_intersects(model: &Model<'_>, layout: &Layout, gap: usize, range: Span) -> bool {
    let tokens = model.tree.tokens();
    let first = gap + 1;
    let mut last = first;
    while last < layout.breaks.len() && !layout.breaks[last] {
        last += 1;
    }
    let line = Span::new(tokens[first].span.start, tokens[last].span.end);
    line.overlaps(range)
}

/// The whitespace this gap should contain.
fn assignment(model: &Model<'_>, layout: &Layout, columns: &Columns, gap: usize) -> String {
    if layout.breaks[gap] {
        let mut out = String::new();
        for _ in 0..layout.feeds[gap].max(1) {
            out.push('\n');
        }
        out.push_str(&measure::indent_text(
            columns.start[gap + 1],
            model.settings.use_tab_character,
            model.settings.tab_size,
        ));
        out
    } else {
        " ".repeat(model.gaps[gap].spaces as usize)
    }
}

/// A boundary in range whose following line is not: replace the feeds but
/// keep the out-of-range line's existing indentation bytes. No
/// indentation is added to the untouched tail.
fn clip_end(layout: &Layout, gap: usize, span: Span, original: &str, edits: &mut Vec<Edit>) {
    let feeds = "\n".repeat(layout.feeds[gap].max(1) as usize);
    match original.rfind('\n') {
        Some(last_newline) => {
            let head = &original[..=last_newline];
            if head != feeds {
                edits.push(Edit {
                    span: Span::new(span.start, span.start + last_newline as u32 + 1),
                    replacement: feeds,
                });
            }
        }
        None => {
            if original != feeds {
                edits.push(Edit {
                    span,
                    replacement: feeds,
                });
            }
        }
    }
}

/// A boundary outside the range whose line reaches into it: adjust only
/// the line's leading indentation. The line break itself stays as it is
/// in the source, so a joining assignment is dropped entirely.
#[allow(clippy::too_many_arguments)]
fn clip_start(
    model: &Model<'_>,
    layout: &Layout,
    columns: &Columns,
    gap: usize,
    span: Span,
    original: &str,
    _range: Span,
    edits: &mut Vec<Edit>,
) {
    if !layout.breaks[gap] {
        return;
    }
    let Some(last_newline) = original.rfind('\n') else {
        return;
    };
    let indent_start = span.start + last_newline as u32 + 1;
    let old_indent = &original[last_newline + 1..];
    let new_indent = measure::indent_text(
        columns.start[gap + 1],
        model.settings.use_tab_character,
        model.settings.tab_size,
    );
    if old_indent != new_indent {
        edits.push(Edit {
            span: Span::new(indent_start, span.end),
            replacement: new_indent,
        });
    }
}

/// Apply an edit list to the source it was computed from.
///
/// Edits are disjoint; they are applied back-to-front so earlier spans
/// stay valid while later ones are replaced.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    let mut result = source.to_string();
    for edit in sorted {
        let start = edit.span.start as usize;
        let end = (edit.span.end as usize).min(result.len());
        if start <= end && start <= result.len() {
            result.replace_range(start..end, &edit.replacement);
        }
    }
    result
}
