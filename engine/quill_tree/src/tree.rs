//! Arena-backed immutable source trees.
//!
//! A [`SourceTree`] pairs a source text with a structural tree whose leaves
//! are exactly the terminal tokens of the text, in source order. Interior
//! nodes mirror syntactic nesting. The engine only ever reads the tree;
//! construction goes through [`TreeBuilder`], which validates structure up
//! front so downstream passes can rely on it.

use std::fmt;

use crate::kind::SyntaxKind;
use crate::span::Span;

/// Index of a node in the tree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Structural validation failure while building a tree.
///
/// The builder rejects malformed input instead of silently dropping
/// tokens; a malformed tree would corrupt every later pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("close() called with no open node")]
    UnbalancedClose,
    #[error("finish() called with {0} unclosed node(s)")]
    UnclosedNodes(usize),
    #[error("token {next:?} starts before previous token {prev:?} ends")]
    TokenOutOfOrder { prev: Span, next: Span },
    #[error("span {span:?} exceeds source length {len}")]
    SpanOutOfBounds { span: Span, len: usize },
    #[error("token() called with structural kind {0:?}")]
    StructuralKindAsToken(SyntaxKind),
    #[error("open() called with token kind {0:?}")]
    TokenKindAsNode(SyntaxKind),
    #[error("finish() called with no root node")]
    MissingRoot,
}

#[derive(Debug)]
struct Node {
    kind: SyntaxKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Token index range covered by this node, computed at finish().
    tokens: std::ops::Range<usize>,
}

/// A terminal token: a leaf of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
    /// The leaf node carrying this token.
    pub node: NodeId,
}

/// Immutable structural tree over a source text.
pub struct SourceTree {
    text: String,
    nodes: Vec<Node>,
    tokens: Vec<Token>,
    root: NodeId,
}

impl SourceTree {
    /// The source text this tree describes.
    #[inline]
    pub fn source(&self) -> &str {
        &self.text
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Kind of a node.
    #[inline]
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].kind
    }

    /// Source span of a node.
    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Parent of a node, `None` for the root.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Ordered children of a node.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Source text of a node.
    #[inline]
    pub fn text(&self, id: NodeId) -> &str {
        &self.text[self.span(id).range()]
    }

    /// Source text of an arbitrary span.
    #[inline]
    pub fn text_at(&self, span: Span) -> &str {
        &self.text[span.range()]
    }

    /// All terminal tokens in source order.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token index range covered by a node.
    ///
    /// Contiguous by construction: a node covers exactly the tokens of its
    /// descendants, with no gaps between siblings.
    #[inline]
    pub fn token_range(&self, id: NodeId) -> std::ops::Range<usize> {
        self.nodes[id.index()].tokens.clone()
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl fmt::Debug for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceTree")
            .field("nodes", &self.nodes.len())
            .field("tokens", &self.tokens.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SourceTree`].
///
/// Usage mirrors event-style tree construction:
///
/// ```
/// use quill_tree::{SourceTree, Span, SyntaxKind, TreeBuilder};
///
/// let mut b = TreeBuilder::new("a;".to_string());
/// b.open(SyntaxKind::File);
/// b.open(SyntaxKind::ExpressionStatement);
/// b.token(SyntaxKind::Identifier, Span::new(0, 1));
/// b.token(SyntaxKind::Semicolon, Span::new(1, 2));
/// b.close();
/// b.close();
/// let tree: SourceTree = b.finish().unwrap();
/// assert_eq!(tree.tokens().len(), 2);
/// ```
pub struct TreeBuilder {
    text: String,
    nodes: Vec<Node>,
    tokens: Vec<Token>,
    stack: Vec<NodeId>,
    root: Option<NodeId>,
    error: Option<TreeError>,
}

impl TreeBuilder {
    pub fn new(text: String) -> Self {
        TreeBuilder {
            text,
            nodes: Vec::new(),
            tokens: Vec::new(),
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    /// Open a structural node. Subsequent tokens and nodes become its
    /// children until the matching [`close`](Self::close).
    pub fn open(&mut self, kind: SyntaxKind) {
        if self.error.is_some() {
            return;
        }
        if kind.is_token() {
            self.error = Some(TreeError::TokenKindAsNode(kind));
            return;
        }
        let id = NodeId(self.nodes.len() as u32);
        let parent = self.stack.last().copied();
        self.nodes.push(Node {
            kind,
            span: Span::EMPTY,
            parent,
            children: Vec::new(),
            tokens: 0..0,
        });
        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        } else if self.root.is_none() {
            self.root = Some(id);
        }
        self.stack.push(id);
    }

    /// Add a terminal token to the currently open node.
    pub fn token(&mut self, kind: SyntaxKind, span: Span) {
        if self.error.is_some() {
            return;
        }
        if !kind.is_token() {
            self.error = Some(TreeError::StructuralKindAsToken(kind));
            return;
        }
        if span.end as usize > self.text.len() {
            self.error = Some(TreeError::SpanOutOfBounds {
                span,
                len: self.text.len(),
            });
            return;
        }
        if let Some(prev) = self.tokens.last() {
            if span.start < prev.span.end {
                self.error = Some(TreeError::TokenOutOfOrder {
                    prev: prev.span,
                    next: span,
                });
                return;
            }
        }
        let Some(&parent) = self.stack.last() else {
            // Token outside any node: treat as unbalanced structure.
            self.error = Some(TreeError::UnbalancedClose);
            return;
        };
        let id = NodeId(self.nodes.len() as u32);
        let index = self.tokens.len();
        self.nodes.push(Node {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
            tokens: index..index + 1,
        });
        self.nodes[parent.index()].children.push(id);
        self.tokens.push(Token {
            kind,
            span,
            node: id,
        });
    }

    /// Close the most recently opened node.
    pub fn close(&mut self) {
        if self.error.is_some() {
            return;
        }
        if self.stack.pop().is_none() {
            self.error = Some(TreeError::UnbalancedClose);
        }
    }

    /// Finish building, validating the overall structure.
    pub fn finish(mut self) -> Result<SourceTree, TreeError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.stack.is_empty() {
            return Err(TreeError::UnclosedNodes(self.stack.len()));
        }
        let Some(root) = self.root else {
            return Err(TreeError::MissingRoot);
        };
        Self::seal(&mut self.nodes, root);
        Ok(SourceTree {
            text: self.text,
            nodes: self.nodes,
            tokens: self.tokens,
            root,
        })
    }

    /// Compute spans and token ranges bottom-up.
    fn seal(nodes: &mut Vec<Node>, root: NodeId) {
        // Post-order without recursion: process children before parents.
        let mut order = Vec::with_capacity(nodes.len());
        let mut walk = vec![root];
        while let Some(id) = walk.pop() {
            order.push(id);
            walk.extend(nodes[id.index()].children.iter().copied());
        }
        for &id in order.iter().rev() {
            let children = nodes[id.index()].children.clone();
            if children.is_empty() {
                continue;
            }
            let mut span: Option<Span> = if nodes[id.index()].span.is_empty() {
                None
            } else {
                Some(nodes[id.index()].span)
            };
            let mut first_token = usize::MAX;
            let mut last_token = 0usize;
            for child in children {
                let c = &nodes[child.index()];
                if !c.span.is_empty() || c.tokens.end > c.tokens.start {
                    span = Some(match span {
                        Some(s) => s.merge(c.span),
                        None => c.span,
                    });
                }
                if c.tokens.end > c.tokens.start {
                    first_token = first_token.min(c.tokens.start);
                    last_token = last_token.max(c.tokens.end);
                }
            }
            let node = &mut nodes[id.index()];
            node.span = span.unwrap_or(Span::EMPTY);
            if first_token != usize::MAX {
                node.tokens = first_token..last_token;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_token_tree() -> SourceTree {
        let mut b = TreeBuilder::new("a;".to_string());
        b.open(SyntaxKind::File);
        b.open(SyntaxKind::ExpressionStatement);
        b.token(SyntaxKind::Identifier, Span::new(0, 1));
        b.token(SyntaxKind::Semicolon, Span::new(1, 2));
        b.close();
        b.close();
        match b.finish() {
            Ok(tree) => tree,
            Err(err) => panic!("fixture tree must build: {err}"),
        }
    }

    #[test]
    fn builder_produces_leaves_in_order() {
        let tree = two_token_tree();
        let kinds: Vec<_> = tree.tokens().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![SyntaxKind::Identifier, SyntaxKind::Semicolon]);
    }

    #[test]
    fn node_spans_cover_children() {
        let tree = two_token_tree();
        assert_eq!(tree.span(tree.root()), Span::new(0, 2));
        assert_eq!(tree.token_range(tree.root()), 0..2);
    }

    #[test]
    fn statement_node_nested_under_file() {
        let tree = two_token_tree();
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 1);
        assert_eq!(tree.kind(children[0]), SyntaxKind::ExpressionStatement);
        assert_eq!(tree.parent(children[0]), Some(tree.root()));
    }

    #[test]
    fn unbalanced_close_rejected() {
        let mut b = TreeBuilder::new(String::new());
        b.open(SyntaxKind::File);
        b.close();
        b.close();
        assert_eq!(b.finish().unwrap_err(), TreeError::UnbalancedClose);
    }

    #[test]
    fn unclosed_node_rejected() {
        let mut b = TreeBuilder::new(String::new());
        b.open(SyntaxKind::File);
        b.open(SyntaxKind::CodeBlock);
        b.close();
        assert_eq!(b.finish().unwrap_err(), TreeError::UnclosedNodes(1));
    }

    #[test]
    fn out_of_order_tokens_rejected() {
        let mut b = TreeBuilder::new("ab".to_string());
        b.open(SyntaxKind::File);
        b.token(SyntaxKind::Identifier, Span::new(1, 2));
        b.token(SyntaxKind::Identifier, Span::new(0, 1));
        b.close();
        assert!(matches!(
            b.finish().unwrap_err(),
            TreeError::TokenOutOfOrder { .. }
        ));
    }

    #[test]
    fn overlapping_tokens_rejected() {
        let mut b = TreeBuilder::new("abc".to_string());
        b.open(SyntaxKind::File);
        b.token(SyntaxKind::Identifier, Span::new(0, 2));
        b.token(SyntaxKind::Identifier, Span::new(1, 3));
        b.close();
        assert!(matches!(
            b.finish().unwrap_err(),
            TreeError::TokenOutOfOrder { .. }
        ));
    }

    #[test]
    fn span_out_of_bounds_rejected() {
        let mut b = TreeBuilder::new("a".to_string());
        b.open(SyntaxKind::File);
        b.token(SyntaxKind::Identifier, Span::new(0, 5));
        b.close();
        assert!(matches!(
            b.finish().unwrap_err(),
            TreeError::SpanOutOfBounds { .. }
        ));
    }

    #[test]
    fn token_kind_as_node_rejected() {
        let mut b = TreeBuilder::new(String::new());
        b.open(SyntaxKind::Identifier);
        assert_eq!(
            b.finish().unwrap_err(),
            TreeError::TokenKindAsNode(SyntaxKind::Identifier)
        );
    }

    #[test]
    fn structural_kind_as_token_rejected() {
        let mut b = TreeBuilder::new(String::new());
        b.open(SyntaxKind::File);
        b.token(SyntaxKind::CodeBlock, Span::EMPTY);
        assert_eq!(
            b.finish().unwrap_err(),
            TreeError::StructuralKindAsToken(SyntaxKind::CodeBlock)
        );
    }
}
