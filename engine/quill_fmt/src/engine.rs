//! The formatting session: one invocation, start to finish.
//!
//! A session is created fresh per invocation and discarded with it. It
//! owns no caches and shares no state; the result is a pure function of
//! (tree, settings, range). Callers may run sessions on independent
//! trees concurrently — the settings are only ever read.

use quill_style::StyleSettings;
use quill_tree::{LineIndex, SourceTree};
use tracing::debug_span;

use crate::align::AlignmentTable;
use crate::blocks::BlockTree;
use crate::edits::{self, EditRange};
use crate::error::{FormatError, FormatOutcome};
use crate::gaps;
use crate::layout::{self, Model};
use crate::wrap;

/// Format a whole document.
///
/// Returns the whitespace edits that bring the document to the
/// configured style, plus any margin advisories. Fatal errors return no
/// edits at all: the document is unchanged.
pub fn format(tree: &SourceTree, settings: &StyleSettings) -> Result<FormatOutcome, FormatError> {
    FormatSession::new(tree, settings).run(None)
}

/// Format only the given range of a document.
///
/// Whitespace assignments are computed for the whole tree; edits outside
/// the range (expanded to whole lines) are discarded, and content beyond
/// the range boundary is left byte-for-byte unchanged.
pub fn format_range(
    tree: &SourceTree,
    settings: &StyleSettings,
    range: EditRange,
) -> Result<FormatOutcome, FormatError> {
    FormatSession::new(tree, settings).run(Some(range))
}

/// One synchronous, single-threaded format invocation.
pub struct FormatSession<'a> {
    tree: &'a SourceTree,
    settings: &'a StyleSettings,
}

impl<'a> FormatSession<'a> {
    pub fn new(tree: &'a SourceTree, settings: &'a StyleSettings) -> Self {
        FormatSession { tree, settings }
    }

    /// Run the pass pipeline: blocks, gap specs, layout, wrapping, diff.
    pub fn run(self, range: Option<EditRange>) -> Result<FormatOutcome, FormatError> {
        let span = debug_span!(
            "format",
            tokens = self.tree.tokens().len(),
            ranged = range.is_some()
        );
        let _guard = span.enter();

        if self.tree.tokens().is_empty() {
            return Ok(FormatOutcome::default());
        }

        let blocks = {
            let _s = debug_span!("blocks").entered();
            BlockTree::build(self.tree, self.settings)?
        };
        let gap_specs = {
            let _s = debug_span!("spacing").entered();
            gaps::compute(self.tree, &blocks, self.settings)
        };
        let model = Model {
            tree: self.tree,
            blocks: &blocks,
            gaps: &gap_specs,
            settings: self.settings,
        };

        let mut assignment = {
            let _s = debug_span!("layout").entered();
            layout::initial(&model)
        };

        let mut table = AlignmentTable::new(&blocks);
        let (columns, violations) = {
            let _s = debug_span!("wrap").entered();
            wrap::resolve(&model, &mut assignment, &mut table)?
        };

        let resolved = range.map(|r| {
            let index = LineIndex::new(self.tree.source());
            r.resolve(&index)
        });
        let edit_list = {
            let _s = debug_span!("edits").entered();
            edits::diff(&model, &assignment, &columns, resolved)
        };

        tracing::debug!(
            edits = edit_list.len(),
            violations = violations.len(),
            "format complete"
        );
        Ok(FormatOutcome {
            edits: edit_list,
            violations,
        })
    }
}
