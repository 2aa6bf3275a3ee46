//! Formatting block trees.
//!
//! The first pass of every invocation converts the structural input tree
//! into a tree of [`Block`]s over the token sequence. Each block carries
//! the layout-relevant facts for its span: how its contents indent, which
//! wrap policy governs its designated break points, whether an alignment
//! group anchors its continuation lines, and (for braced bodies) the
//! brace placement style resolved from the settings.
//!
//! Block ranges are token index ranges. Children cover their parent's
//! range in order with no gaps and no overlaps; the builder enforces this
//! rather than assuming it.

use quill_style::{BraceStyle, StyleSettings, WrapMode};
use quill_tree::{NodeId, SourceTree, SyntaxKind};

use crate::error::FormatError;

/// Index of a block in the block arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(pub(crate) u32);

impl BlockId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of an alignment group, scoped to one formatting pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlignmentId(pub(crate) u32);

/// How a block's contents indent relative to the enclosing scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IndentRule {
    /// Transparent: contributes nothing.
    #[default]
    None,
    /// Brace-delimited scope: contents one body shift in, braces at the
    /// scope's own level (plus any brace shift from the style).
    Block,
    /// Continuation: lines starting inside the block get continuation
    /// indent (applied once per line, not per nesting level).
    Continuation,
    /// Label line: adjusted by the label indent options.
    Label,
}

/// One formatting block.
#[derive(Debug)]
pub struct Block {
    pub kind: SyntaxKind,
    pub node: NodeId,
    pub parent: Option<BlockId>,
    pub children: Vec<BlockId>,
    /// Covered token index range; children partition it in order.
    pub tokens: std::ops::Range<usize>,
    pub indent: IndentRule,
    /// A braceless control-flow body hangs one indent unit under its
    /// construct when it lands on its own line.
    pub hanging: bool,
    pub wrap: WrapMode,
    pub align: Option<AlignmentId>,
    /// Brace placement for braced blocks, `None` otherwise.
    pub brace_style: Option<BraceStyle>,
    /// Start tokens of the block's list elements (arguments, parameters,
    /// initializer entries, extends/throws items, an assignment's value).
    pub elements: Vec<usize>,
    pub depth: u16,
}

/// An alignment group: a block whose continuation lines align to the
/// column of its anchor token. Anchor columns live in a side table filled
/// during layout (see [`crate::align`]).
#[derive(Debug, Clone, Copy)]
pub struct AlignmentGroup {
    pub id: AlignmentId,
    pub block: BlockId,
    pub anchor_token: usize,
}

/// One piece of a block's direct content: a directly-owned token or a
/// child block's range.
#[derive(Debug, Clone)]
pub struct DirectItem {
    pub tokens: std::ops::Range<usize>,
    pub kind: SyntaxKind,
}

impl DirectItem {
    #[inline]
    pub fn is_comment(&self) -> bool {
        self.tokens.len() == 1 && self.kind.is_comment()
    }
}

/// Block tree over one source tree.
pub struct BlockTree {
    blocks: Vec<Block>,
    root: BlockId,
    /// Innermost owning block per token index.
    owner: Vec<BlockId>,
    /// Token kinds by index, copied out of the source tree.
    token_kinds: Vec<SyntaxKind>,
    groups: Vec<AlignmentGroup>,
}

impl BlockTree {
    /// Build the block tree for a source tree under the given settings.
    ///
    /// Pure transformation: the input tree is never mutated. Fails with
    /// [`FormatError::Structural`] if the node spans do not nest.
    pub fn build(tree: &SourceTree, settings: &StyleSettings) -> Result<BlockTree, FormatError> {
        let mut builder = Builder {
            tree,
            settings,
            blocks: Vec::new(),
            owner: vec![BlockId(0); tree.tokens().len()],
        };
        let root = builder.build_node(tree.root(), None, 0)?.ok_or_else(|| {
            FormatError::Structural("input tree has no tokens under its root".to_string())
        })?;
        let mut out = BlockTree {
            blocks: builder.blocks,
            root,
            owner: builder.owner,
            token_kinds: tree.tokens().iter().map(|t| t.kind).collect(),
            groups: Vec::new(),
        };
        out.collect_elements();
        out.allocate_alignments(settings);
        Ok(out)
    }

    #[inline]
    pub fn root(&self) -> BlockId {
        self.root
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Innermost block owning a token.
    #[inline]
    pub fn owner_of(&self, token: usize) -> BlockId {
        self.owner[token]
    }

    #[inline]
    pub fn groups(&self) -> &[AlignmentGroup] {
        &self.groups
    }

    pub fn group(&self, id: AlignmentId) -> &AlignmentGroup {
        &self.groups[id.0 as usize]
    }

    /// Nearest common ancestor block of two tokens.
    pub fn common_ancestor(&self, a: usize, b: usize) -> BlockId {
        let mut x = self.owner[a];
        let mut y = self.owner[b];
        while self.blocks[x.index()].depth > self.blocks[y.index()].depth {
            x = self.must_parent(x);
        }
        while self.blocks[y.index()].depth > self.blocks[x.index()].depth {
            y = self.must_parent(y);
        }
        while x != y {
            x = self.must_parent(x);
            y = self.must_parent(y);
        }
        x
    }

    fn must_parent(&self, id: BlockId) -> BlockId {
        match self.blocks[id.index()].parent {
            Some(parent) => parent,
            None => id,
        }
    }

    /// Iterate a token's owner chain from innermost block to the root.
    pub fn ancestors(&self, token: usize) -> impl Iterator<Item = BlockId> + '_ {
        let mut current = Some(self.owner[token]);
        std::iter::from_fn(move || {
            let id = current?;
            current = self.blocks[id.index()].parent;
            Some(id)
        })
    }

    /// Check whether `ancestor` is on `block`'s parent chain (inclusive).
    pub fn is_ancestor(&self, ancestor: BlockId, block: BlockId) -> bool {
        let mut current = Some(block);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.blocks[id.index()].parent;
        }
        false
    }

    /// Kind of a token by index.
    #[inline]
    pub fn token_kind(&self, token: usize) -> SyntaxKind {
        self.token_kinds[token]
    }

    /// The direct content of a block, in order: each item is either a
    /// directly-owned token (single-token range) or a child block's whole
    /// token range.
    pub fn direct_items(&self, id: BlockId) -> Vec<DirectItem> {
        let range = self.blocks[id.index()].tokens.clone();
        let mut items = Vec::new();
        let mut token = range.start;
        while token < range.end {
            if self.owner[token] == id {
                items.push(DirectItem {
                    tokens: token..token + 1,
                    kind: self.token_kinds[token],
                });
                token += 1;
            } else {
                let end = self.child_end(id, token);
                let child = self.direct_child_at(id, token);
                items.push(DirectItem {
                    tokens: token..end,
                    kind: child.map_or(self.token_kinds[token], |c| self.blocks[c.index()].kind),
                });
                token = end;
            }
        }
        items
    }

    fn direct_child_at(&self, id: BlockId, token: usize) -> Option<BlockId> {
        let mut child = self.owner[token];
        while self.blocks[child.index()].parent != Some(id) {
            child = self.blocks[child.index()].parent?;
        }
        Some(child)
    }

    // ------------------------------------------------------------------
    // Element and alignment bookkeeping
    // ------------------------------------------------------------------

    fn collect_elements(&mut self) {
        for index in 0..self.blocks.len() {
            let id = BlockId(index as u32);
            let kind = self.blocks[index].kind;
            let elements = match kind {
                SyntaxKind::ArgumentList
                | SyntaxKind::ParameterList
                | SyntaxKind::ArrayInitializer
                | SyntaxKind::ParenthesizedExpression => {
                    self.scan_elements(id, &[SyntaxKind::LParen, SyntaxKind::LBrace])
                }
                SyntaxKind::ExtendsList | SyntaxKind::ThrowsList => {
                    self.scan_elements(id, &[SyntaxKind::Keyword])
                }
                SyntaxKind::Assignment => self.scan_elements(id, &[SyntaxKind::AssignOp]),
                _ => Vec::new(),
            };
            self.blocks[index].elements = elements;
        }
    }

    /// Element starts: the first token after any opener kind or comma that
    /// is directly owned by the block or begins a child block.
    fn scan_elements(&self, id: BlockId, openers: &[SyntaxKind]) -> Vec<usize> {
        let range = self.blocks[id.index()].tokens.clone();
        let mut starts = Vec::new();
        let mut expecting = false;
        let mut token = range.start;
        while token < range.end {
            if self.owner[token] == id {
                let kind = self.token_kinds[token];
                if openers.contains(&kind) || kind == SyntaxKind::Comma {
                    expecting = true;
                } else if matches!(kind, SyntaxKind::RParen | SyntaxKind::RBrace) {
                    expecting = false;
                } else if expecting {
                    starts.push(token);
                    expecting = false;
                }
                token += 1;
            } else {
                if expecting {
                    starts.push(token);
                    expecting = false;
                }
                token = self.child_end(id, token);
            }
        }
        starts
    }

    /// End of the child block of `id` that covers `token`.
    fn child_end(&self, id: BlockId, token: usize) -> usize {
        let mut child = self.owner[token];
        while self.blocks[child.index()].parent != Some(id) {
            match self.blocks[child.index()].parent {
                Some(parent) => child = parent,
                None => return token + 1,
            }
        }
        self.blocks[child.index()].tokens.end.max(token + 1)
    }

    fn allocate_alignments(&mut self, settings: &StyleSettings) {
        for index in 0..self.blocks.len() {
            let block = &self.blocks[index];
            let enabled = match block.kind {
                SyntaxKind::BinaryExpression => settings.align_multiline_binary_operation,
                SyntaxKind::ArgumentList => settings.align_multiline_parameters_in_calls,
                SyntaxKind::ParameterList => settings.align_multiline_parameters,
                SyntaxKind::ParenthesizedExpression => {
                    settings.align_multiline_parenthesized_expression
                }
                SyntaxKind::ArrayInitializer => settings.align_multiline_array_initializer,
                SyntaxKind::Assignment => settings.align_multiline_assignment,
                _ => false,
            };
            if !enabled {
                continue;
            }
            let anchor_token = match block.kind {
                SyntaxKind::BinaryExpression => Some(block.tokens.start),
                _ => block.elements.first().copied(),
            };
            let Some(anchor_token) = anchor_token else {
                continue;
            };
            let id = AlignmentId(self.groups.len() as u32);
            self.groups.push(AlignmentGroup {
                id,
                block: BlockId(index as u32),
                anchor_token,
            });
            self.blocks[index].align = Some(id);
        }
    }
}

struct Builder<'a> {
    tree: &'a SourceTree,
    settings: &'a StyleSettings,
    blocks: Vec<Block>,
    owner: Vec<BlockId>,
}

impl Builder<'_> {
    /// Create the block for a structural node; returns `None` for nodes
    /// covering no tokens (they are transparent to layout).
    fn build_node(
        &mut self,
        node: NodeId,
        parent: Option<BlockId>,
        depth: u16,
    ) -> Result<Option<BlockId>, FormatError> {
        let range = self.tree.token_range(node);
        if range.is_empty() {
            return Ok(None);
        }
        let kind = self.tree.kind(node);
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block {
            kind,
            node,
            parent,
            children: Vec::new(),
            tokens: range.clone(),
            indent: indent_rule(kind),
            hanging: false,
            wrap: wrap_mode(kind, self.settings),
            align: None,
            brace_style: self.brace_style_for(node, kind),
            elements: Vec::new(),
            depth,
        });

        let mut cursor = range.start;
        let mut children = Vec::new();
        for &child in self.tree.children(node) {
            let child_kind = self.tree.kind(child);
            if child_kind.is_token() {
                let index = self.tree.token_range(child).start;
                if index != cursor {
                    return Err(nesting_error(kind, cursor, index));
                }
                self.owner[index] = id;
                cursor += 1;
            } else {
                let child_range = self.tree.token_range(child);
                if child_range.is_empty() {
                    continue;
                }
                if child_range.start != cursor {
                    return Err(nesting_error(kind, cursor, child_range.start));
                }
                if let Some(child_id) = self.build_node(child, Some(id), depth + 1)? {
                    children.push(child_id);
                }
                cursor = child_range.end;
            }
        }
        if cursor != range.end {
            return Err(nesting_error(kind, cursor, range.end));
        }
        self.mark_hanging_bodies(id, &children);
        self.blocks[id.index()].children = children;
        Ok(Some(id))
    }

    /// Braceless control-flow bodies hang one indent unit.
    ///
    /// Only the body statement hangs, never header material (a for
    /// header's declaration) and never a braced block.
    fn mark_hanging_bodies(&mut self, id: BlockId, children: &[BlockId]) {
        let kind = self.blocks[id.index()].kind;
        let body_after_parens = matches!(
            kind,
            SyntaxKind::IfStatement | SyntaxKind::ForStatement | SyntaxKind::WhileStatement
        );
        let is_do = kind == SyntaxKind::DoWhileStatement;
        let is_else = kind == SyntaxKind::ElseClause;
        if !body_after_parens && !is_do && !is_else {
            return;
        }
        // A for/if/while body starts after the closing parenthesis; the
        // header's own declarations must not hang.
        let rparen = if body_after_parens {
            self.blocks[id.index()]
                .tokens
                .clone()
                .filter(|&t| {
                    self.owner[t] == id && self.tree.tokens()[t].kind == SyntaxKind::RParen
                })
                .max()
                .unwrap_or(0)
        } else {
            0
        };
        let eligible = |child: BlockId| {
            let child_block = &self.blocks[child.index()];
            let child_kind = child_block.kind;
            child_kind.is_statement()
                && child_kind != SyntaxKind::ElseClause
                && child_block.tokens.start > rparen
                // `else if` continues the else line; it does not hang.
                && !(is_else && child_kind == SyntaxKind::IfStatement)
        };
        let body = if is_do {
            // The body follows `do`; the condition comes after `while`.
            children.iter().copied().find(|&c| eligible(c))
        } else {
            // The body is the last statement child (an if's then-branch
            // precedes the else clause, which is not a statement here).
            children.iter().copied().filter(|&c| eligible(c)).next_back()
        };
        if let Some(body) = body {
            if self.blocks[body.index()].kind != SyntaxKind::CodeBlock {
                self.blocks[body.index()].hanging = true;
            }
        }
    }

    fn brace_style_for(&self, node: NodeId, kind: SyntaxKind) -> Option<BraceStyle> {
        match kind {
            SyntaxKind::ClassBody => Some(self.settings.class_brace_style),
            SyntaxKind::CodeBlock => {
                let owner = self
                    .tree
                    .parent(node)
                    .map_or(SyntaxKind::File, |p| self.tree.kind(p));
                if owner == SyntaxKind::Method {
                    Some(self.settings.method_brace_style)
                } else {
                    Some(self.settings.block_brace_style)
                }
            }
            SyntaxKind::ArrayInitializer => Some(BraceStyle::EndOfLine),
            _ => None,
        }
    }
}

fn nesting_error(kind: SyntaxKind, expected: usize, found: usize) -> FormatError {
    FormatError::Structural(format!(
        "children of {kind:?} do not cover its token range contiguously \
         (expected token {expected}, found {found})"
    ))
}

fn indent_rule(kind: SyntaxKind) -> IndentRule {
    match kind {
        SyntaxKind::ClassBody | SyntaxKind::CodeBlock | SyntaxKind::ArrayInitializer => {
            IndentRule::Block
        }
        SyntaxKind::BinaryExpression
        | SyntaxKind::Assignment
        | SyntaxKind::TernaryExpression
        | SyntaxKind::UnaryExpression
        | SyntaxKind::CallExpression
        | SyntaxKind::CallChain
        | SyntaxKind::ArgumentList
        | SyntaxKind::ParameterList
        | SyntaxKind::ExtendsList
        | SyntaxKind::ThrowsList
        | SyntaxKind::ParenthesizedExpression
        | SyntaxKind::ExpressionStatement
        | SyntaxKind::LocalVariable
        | SyntaxKind::FieldDeclaration
        | SyntaxKind::ReturnStatement
        | SyntaxKind::Method
        | SyntaxKind::TypeRef => IndentRule::Continuation,
        SyntaxKind::Label => IndentRule::Label,
        _ => IndentRule::None,
    }
}

fn wrap_mode(kind: SyntaxKind, settings: &StyleSettings) -> WrapMode {
    match kind {
        SyntaxKind::ArgumentList => settings.call_arguments_wrap,
        SyntaxKind::ParameterList => settings.method_parameters_wrap,
        SyntaxKind::BinaryExpression => settings.binary_operation_wrap,
        SyntaxKind::CallChain => settings.chained_call_wrap,
        SyntaxKind::ExtendsList => settings.extends_list_wrap,
        SyntaxKind::ThrowsList => settings.throws_list_wrap,
        SyntaxKind::ArrayInitializer => settings.array_initializer_wrap,
        _ => WrapMode::AsNeeded,
    }
}
