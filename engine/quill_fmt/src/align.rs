//! Alignment anchor side table.
//!
//! Alignment is a cross-cutting concern: blocks in a group must start at
//! a shared column once any of them is pushed to a new line. Rather than
//! threading anchor state through block fields, anchors live in this side
//! table, filled as the layout pass places each group's anchor token and
//! consulted when a later token in the group starts a line. The table is
//! rebuilt from scratch on every column computation, so its lifecycle is
//! scoped to a single formatting pass.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::blocks::{AlignmentId, BlockTree};

/// Anchor columns per alignment group.
pub struct AlignmentTable {
    anchors: FxHashMap<AlignmentId, usize>,
    /// Groups anchored at a given token index.
    by_token: FxHashMap<usize, SmallVec<[AlignmentId; 2]>>,
}

impl AlignmentTable {
    pub fn new(blocks: &BlockTree) -> Self {
        let mut by_token: FxHashMap<usize, SmallVec<[AlignmentId; 2]>> = FxHashMap::default();
        for group in blocks.groups() {
            by_token.entry(group.anchor_token).or_default().push(group.id);
        }
        AlignmentTable {
            anchors: FxHashMap::default(),
            by_token,
        }
    }

    /// Forget all anchors (start of a fresh column computation).
    pub fn reset(&mut self) {
        self.anchors.clear();
    }

    /// Record the column a token was placed at; establishes the anchor
    /// for any group anchored there. First placement wins.
    pub fn place(&mut self, token: usize, column: usize) {
        if let Some(groups) = self.by_token.get(&token) {
            for &id in groups {
                self.anchors.entry(id).or_insert(column);
            }
        }
    }

    /// Anchor column of a group, if its anchor token has been placed.
    pub fn anchor(&self, id: AlignmentId) -> Option<usize> {
        self.anchors.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use quill_style::StyleSettings;
    use quill_tree::{Span, SyntaxKind, TreeBuilder};

    use crate::blocks::BlockTree;

    use super::AlignmentTable;

    fn binary_tree() -> quill_tree::SourceTree {
        // a + b
        let mut b = TreeBuilder::new("a + b".to_string());
        b.open(SyntaxKind::File);
        b.open(SyntaxKind::ExpressionStatement);
        b.open(SyntaxKind::BinaryExpression);
        b.token(SyntaxKind::Identifier, Span::new(0, 1));
        b.token(SyntaxKind::AdditiveOp, Span::new(2, 3));
        b.token(SyntaxKind::Identifier, Span::new(4, 5));
        b.close();
        b.close();
        b.close();
        match b.finish() {
            Ok(tree) => tree,
            Err(err) => panic!("fixture tree must build: {err}"),
        }
    }

    #[test]
    fn anchor_is_first_placement() {
        let tree = binary_tree();
        let mut settings = StyleSettings::default();
        settings.align_multiline_binary_operation = true;
        let blocks = match BlockTree::build(&tree, &settings) {
            Ok(blocks) => blocks,
            Err(err) => panic!("blocks must build: {err}"),
        };
        assert_eq!(blocks.groups().len(), 1);
        let group = blocks.groups()[0];

        let mut table = AlignmentTable::new(&blocks);
        assert_eq!(table.anchor(group.id), None);
        table.place(group.anchor_token, 8);
        table.place(group.anchor_token, 12);
        assert_eq!(table.anchor(group.id), Some(8));

        table.reset();
        assert_eq!(table.anchor(group.id), None);
    }
}
