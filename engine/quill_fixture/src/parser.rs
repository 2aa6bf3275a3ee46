//! Structure builder for the Java-like fixture dialect.
//!
//! Parses a token stream into the lightweight node layout the engine
//! expects. The grammar is deliberately lenient: anything it does not
//! recognize is attached flat to the enclosing node rather than rejected,
//! so fixtures only need to be structurally plausible, not valid Java.

use quill_tree::{SourceTree, SyntaxKind, TreeBuilder};

use crate::lexer::RawToken;
use crate::FixtureError;

/// Parsed structure before emission: either a token index or a nested node.
enum PNode {
    Tok(usize),
    Node(P),
}

struct P {
    kind: SyntaxKind,
    children: Vec<PNode>,
}

impl P {
    fn new(kind: SyntaxKind) -> Self {
        P {
            kind,
            children: Vec::new(),
        }
    }

    fn tok(&mut self, index: usize) {
        self.children.push(PNode::Tok(index));
    }

    fn node(&mut self, node: P) {
        self.children.push(PNode::Node(node));
    }

    fn child(&mut self, child: PNode) {
        self.children.push(child);
    }
}

const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
];

const MODIFIERS: &[&str] = &[
    "abstract",
    "final",
    "native",
    "private",
    "protected",
    "public",
    "static",
    "synchronized",
    "transient",
    "volatile",
];

pub(crate) struct Parser<'a> {
    source: &'a str,
    tokens: &'a [RawToken],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str, tokens: &'a [RawToken]) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
        }
    }

    pub(crate) fn parse(mut self) -> Result<SourceTree, FixtureError> {
        let file = self.parse_file();
        let mut builder = TreeBuilder::new(self.source.to_string());
        emit(&mut builder, self.tokens, &file);
        builder.finish().map_err(FixtureError::Tree)
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<SyntaxKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<SyntaxKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn text(&self, index: usize) -> &'a str {
        &self.source[self.tokens[index].span.range()]
    }

    fn peek_text(&self) -> &'a str {
        if self.pos < self.tokens.len() {
            self.text(self.pos)
        } else {
            ""
        }
    }

    fn at_keyword(&self, word: &str) -> bool {
        self.peek() == Some(SyntaxKind::Keyword) && self.peek_text() == word
    }

    fn at_comment(&self) -> bool {
        self.peek().is_some_and(SyntaxKind::is_comment)
    }

    fn bump(&mut self, parent: &mut P) {
        if self.pos < self.tokens.len() {
            parent.tok(self.pos);
            self.pos += 1;
        }
    }

    fn take_comments(&mut self, parent: &mut P) {
        while self.at_comment() {
            self.bump(parent);
        }
    }

    /// Consume tokens up to and including the next top-level semicolon.
    fn flat_until_semicolon(&mut self, parent: &mut P) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                SyntaxKind::Semicolon if depth == 0 => {
                    self.bump(parent);
                    return;
                }
                _ => {}
            }
            self.bump(parent);
        }
    }

    // ------------------------------------------------------------------
    // File level
    // ------------------------------------------------------------------

    fn parse_file(&mut self) -> P {
        let mut file = P::new(SyntaxKind::File);
        self.take_comments(&mut file);

        if self.at_keyword("package") {
            let mut pkg = P::new(SyntaxKind::PackageStatement);
            self.flat_until_semicolon(&mut pkg);
            file.node(pkg);
        }

        self.take_comments(&mut file);
        if self.at_keyword("import") {
            let mut imports = P::new(SyntaxKind::ImportList);
            while self.at_keyword("import") {
                let mut import = P::new(SyntaxKind::ImportStatement);
                self.flat_until_semicolon(&mut import);
                imports.node(import);
            }
            file.node(imports);
        }

        while self.pos < self.tokens.len() {
            if self.at_comment() {
                self.bump(&mut file);
            } else if self.at_class_declaration() {
                let class = self.parse_class();
                file.node(class);
            } else {
                // Stray top-level material: keep it, flat.
                self.bump(&mut file);
            }
        }
        file
    }

    fn at_class_declaration(&self) -> bool {
        let mut offset = 0;
        while self.peek_at(offset) == Some(SyntaxKind::Keyword) {
            let Some(token) = self.tokens.get(self.pos + offset) else {
                return false;
            };
            let text = &self.source[token.span.range()];
            if text == "class" || text == "interface" {
                return true;
            }
            if !MODIFIERS.contains(&text) {
                return false;
            }
            offset += 1;
        }
        false
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_class(&mut self) -> P {
        let mut class = P::new(SyntaxKind::ClassDeclaration);
        while self.peek() == Some(SyntaxKind::Keyword) && MODIFIERS.contains(&self.peek_text()) {
            self.bump(&mut class);
        }
        // 'class' or 'interface', then the name.
        if self.peek() == Some(SyntaxKind::Keyword) {
            self.bump(&mut class);
        }
        if self.peek() == Some(SyntaxKind::Identifier) {
            self.bump(&mut class);
        }
        if self.at_angle_open() {
            let generics = self.parse_type_arguments();
            class.node(generics);
        }
        if self.at_keyword("extends") || self.at_keyword("implements") {
            let mut list = P::new(SyntaxKind::ExtendsList);
            while let Some(kind) = self.peek() {
                if kind == SyntaxKind::LBrace {
                    break;
                }
                if self.at_angle_open() {
                    let generics = self.parse_type_arguments();
                    list.node(generics);
                } else {
                    self.bump(&mut list);
                }
            }
            class.node(list);
        }
        if self.peek() == Some(SyntaxKind::LBrace) {
            let body = self.parse_class_body();
            class.node(body);
        }
        class
    }

    fn at_angle_open(&self) -> bool {
        self.peek() == Some(SyntaxKind::RelationalOp) && self.peek_text() == "<"
    }

    /// Balanced `<...>` region wrapped as a type reference.
    fn parse_type_arguments(&mut self) -> P {
        let mut type_ref = P::new(SyntaxKind::TypeRef);
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            if kind == SyntaxKind::RelationalOp {
                match self.peek_text() {
                    "<" => depth += 1,
                    ">" => {
                        self.bump(&mut type_ref);
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            break;
                        }
                        continue;
                    }
                    _ => {}
                }
            }
            self.bump(&mut type_ref);
        }
        type_ref
    }

    fn parse_class_body(&mut self) -> P {
        let mut body = P::new(SyntaxKind::ClassBody);
        self.bump(&mut body); // '{'
        loop {
            self.take_comments(&mut body);
            match self.peek() {
                None => break,
                Some(SyntaxKind::RBrace) => {
                    self.bump(&mut body);
                    break;
                }
                _ => {
                    let member = self.parse_member();
                    body.node(member);
                }
            }
        }
        body
    }

    fn parse_member(&mut self) -> P {
        if self.at_class_declaration() {
            return self.parse_class();
        }
        if self.at_keyword("static") && self.peek_at(1) == Some(SyntaxKind::LBrace) {
            let mut init = P::new(SyntaxKind::StaticInitializer);
            self.bump(&mut init); // 'static'
            let block = self.parse_block();
            init.node(block);
            return init;
        }
        if self.member_is_method() {
            self.parse_method()
        } else {
            self.parse_field()
        }
    }

    /// A member is a method if a `(` appears before any `=`, `;` or `{`
    /// (annotations, including their argument lists, are skipped first).
    fn member_is_method(&self) -> bool {
        let mut offset = 0usize;
        while let Some(token) = self.tokens.get(self.pos + offset) {
            match token.kind {
                SyntaxKind::At => {
                    offset += 1; // '@'
                    if self.peek_at(offset) == Some(SyntaxKind::Identifier) {
                        offset += 1; // annotation name
                    }
                    if self.peek_at(offset) == Some(SyntaxKind::LParen) {
                        let mut depth = 0usize;
                        while let Some(inner) = self.tokens.get(self.pos + offset) {
                            match inner.kind {
                                SyntaxKind::LParen => depth += 1,
                                SyntaxKind::RParen => {
                                    depth = depth.saturating_sub(1);
                                    if depth == 0 {
                                        offset += 1;
                                        break;
                                    }
                                }
                                _ => {}
                            }
                            offset += 1;
                        }
                    }
                }
                SyntaxKind::LParen => return true,
                SyntaxKind::AssignOp | SyntaxKind::Semicolon | SyntaxKind::LBrace => return false,
                _ => offset += 1,
            }
        }
        false
    }

    fn parse_method(&mut self) -> P {
        let mut method = P::new(SyntaxKind::Method);
        // Annotations, modifiers, return type, name: everything up to the
        // parameter list stays flat in the method node.
        while let Some(kind) = self.peek() {
            if kind == SyntaxKind::At {
                self.bump(&mut method); // '@'
                if self.peek() == Some(SyntaxKind::Identifier) {
                    self.bump(&mut method); // annotation name
                }
                if self.peek() == Some(SyntaxKind::LParen) {
                    let args = self.parse_argument_list();
                    method.node(args);
                }
                continue;
            }
            if kind == SyntaxKind::Identifier && self.peek_at(1) == Some(SyntaxKind::LParen) {
                self.bump(&mut method); // method name
                break;
            }
            if self.at_angle_open() {
                let generics = self.parse_type_arguments();
                method.node(generics);
            } else if kind == SyntaxKind::LBrace || kind == SyntaxKind::RBrace {
                // Malformed member: stop before swallowing the body.
                break;
            } else {
                self.bump(&mut method);
            }
        }
        if self.peek() == Some(SyntaxKind::LParen) {
            let params = self.parse_parameter_list();
            method.node(params);
        }
        if self.at_keyword("throws") {
            let mut throws = P::new(SyntaxKind::ThrowsList);
            while let Some(kind) = self.peek() {
                if kind == SyntaxKind::LBrace || kind == SyntaxKind::Semicolon {
                    break;
                }
                self.bump(&mut throws);
            }
            method.node(throws);
        }
        match self.peek() {
            Some(SyntaxKind::LBrace) => {
                let block = self.parse_block();
                method.node(block);
            }
            Some(SyntaxKind::Semicolon) => self.bump(&mut method),
            _ => {}
        }
        method
    }

    fn parse_parameter_list(&mut self) -> P {
        let mut list = P::new(SyntaxKind::ParameterList);
        self.bump(&mut list); // '('
        loop {
            match self.peek() {
                None => break,
                Some(SyntaxKind::RParen) => {
                    self.bump(&mut list);
                    break;
                }
                Some(SyntaxKind::Comma) => self.bump(&mut list),
                _ => {
                    let mut param = P::new(SyntaxKind::Parameter);
                    loop {
                        match self.peek() {
                            None | Some(SyntaxKind::RParen | SyntaxKind::Comma) => break,
                            Some(SyntaxKind::RelationalOp) if self.at_angle_open() => {
                                let generics = self.parse_type_arguments();
                                param.node(generics);
                            }
                            Some(_) => self.bump(&mut param),
                        }
                    }
                    list.node(param);
                }
            }
        }
        list
    }

    fn parse_field(&mut self) -> P {
        let mut field = P::new(SyntaxKind::FieldDeclaration);
        while let Some(kind) = self.peek() {
            match kind {
                SyntaxKind::AssignOp => {
                    self.bump(&mut field);
                    let init = if self.peek() == Some(SyntaxKind::LBrace) {
                        PNode::Node(self.parse_array_initializer())
                    } else {
                        self.parse_expr()
                    };
                    field.child(init);
                }
                SyntaxKind::Semicolon => {
                    self.bump(&mut field);
                    break;
                }
                SyntaxKind::RBrace => break,
                SyntaxKind::RelationalOp if self.at_angle_open() => {
                    let generics = self.parse_type_arguments();
                    field.node(generics);
                }
                _ => self.bump(&mut field),
            }
        }
        field
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_block(&mut self) -> P {
        let mut block = P::new(SyntaxKind::CodeBlock);
        self.bump(&mut block); // '{'
        loop {
            self.take_comments(&mut block);
            match self.peek() {
                None => break,
                Some(SyntaxKind::RBrace) => {
                    self.bump(&mut block);
                    break;
                }
                _ => {
                    let stmt = self.parse_statement();
                    block.node(stmt);
                }
            }
        }
        block
    }

    fn parse_statement(&mut self) -> P {
        match self.peek() {
            Some(SyntaxKind::LBrace) => self.parse_block(),
            Some(SyntaxKind::Keyword) => match self.peek_text() {
                "if" => self.parse_if(),
                "for" => self.parse_for(),
                "while" => self.parse_while(),
                "do" => self.parse_do_while(),
                "try" => self.parse_try(),
                "synchronized" => self.parse_synchronized(),
                "return" => {
                    let mut stmt = P::new(SyntaxKind::ReturnStatement);
                    self.bump(&mut stmt); // 'return'
                    if self.peek() != Some(SyntaxKind::Semicolon) {
                        let value = self.parse_expr();
                        stmt.child(value);
                    }
                    if self.peek() == Some(SyntaxKind::Semicolon) {
                        self.bump(&mut stmt);
                    }
                    stmt
                }
                kw if PRIMITIVE_TYPES.contains(&kw) || kw == "final" => {
                    self.parse_local_variable()
                }
                _ => {
                    let mut stmt = P::new(SyntaxKind::ExpressionStatement);
                    self.flat_until_semicolon(&mut stmt);
                    stmt
                }
            },
            Some(SyntaxKind::Identifier) if self.peek_at(1) == Some(SyntaxKind::Colon) => {
                let mut label = P::new(SyntaxKind::Label);
                self.bump(&mut label); // name
                self.bump(&mut label); // ':'
                let stmt = self.parse_statement();
                label.node(stmt);
                label
            }
            Some(SyntaxKind::Identifier) if self.local_variable_ahead() => {
                self.parse_local_variable()
            }
            Some(_) => {
                let mut stmt = P::new(SyntaxKind::ExpressionStatement);
                let expr = self.parse_expr();
                stmt.child(expr);
                if self.peek() == Some(SyntaxKind::Semicolon) {
                    self.bump(&mut stmt);
                }
                stmt
            }
            None => P::new(SyntaxKind::ExpressionStatement),
        }
    }

    /// `Type name ...` — a bare identifier following type-shaped tokens
    /// (qualified names, generics, array brackets) starts a declaration.
    /// An identifier reached through a `.` is part of a qualified name,
    /// not a declared name.
    fn local_variable_ahead(&self) -> bool {
        let mut offset = 1usize;
        let mut angle = 0usize;
        let mut after_dot = false;
        while let Some(token) = self.tokens.get(self.pos + offset) {
            match token.kind {
                SyntaxKind::RelationalOp => match &self.source[token.span.range()] {
                    "<" => angle += 1,
                    ">" => angle = angle.saturating_sub(1),
                    _ => return false,
                },
                SyntaxKind::Dot => after_dot = true,
                SyntaxKind::LBracket | SyntaxKind::RBracket => after_dot = false,
                SyntaxKind::Identifier => {
                    if angle == 0 && !after_dot {
                        return true;
                    }
                    after_dot = false;
                }
                SyntaxKind::Comma | SyntaxKind::Keyword => after_dot = false,
                _ => return false,
            }
            offset += 1;
        }
        false
    }

    fn parse_local_variable(&mut self) -> P {
        let mut decl = P::new(SyntaxKind::LocalVariable);
        while let Some(kind) = self.peek() {
            match kind {
                SyntaxKind::AssignOp => {
                    self.bump(&mut decl);
                    let init = if self.peek() == Some(SyntaxKind::LBrace) {
                        PNode::Node(self.parse_array_initializer())
                    } else {
                        self.parse_expr()
                    };
                    decl.child(init);
                }
                SyntaxKind::Semicolon => {
                    self.bump(&mut decl);
                    break;
                }
                SyntaxKind::RBrace | SyntaxKind::RParen | SyntaxKind::Colon => break,
                SyntaxKind::RelationalOp if self.at_angle_open() => {
                    let generics = self.parse_type_arguments();
                    decl.node(generics);
                }
                _ => self.bump(&mut decl),
            }
        }
        decl
    }

    fn parse_if(&mut self) -> P {
        let mut stmt = P::new(SyntaxKind::IfStatement);
        self.bump(&mut stmt); // 'if'
        self.parse_condition(&mut stmt);
        let then_branch = self.parse_statement();
        stmt.node(then_branch);
        if self.at_keyword("else") {
            let mut else_clause = P::new(SyntaxKind::ElseClause);
            self.bump(&mut else_clause); // 'else'
            let body = self.parse_statement();
            else_clause.node(body);
            stmt.node(else_clause);
        }
        stmt
    }

    fn parse_for(&mut self) -> P {
        let mut stmt = P::new(SyntaxKind::ForStatement);
        self.bump(&mut stmt); // 'for'
        if self.peek() == Some(SyntaxKind::LParen) {
            self.bump(&mut stmt);
            // Header: init; condition; update — or a foreach clause, or a
            // bare condition. Sections are parsed leniently.
            let mut guard = self.pos;
            while let Some(kind) = self.peek() {
                match kind {
                    SyntaxKind::RParen => {
                        self.bump(&mut stmt);
                        break;
                    }
                    SyntaxKind::Semicolon | SyntaxKind::Colon => self.bump(&mut stmt),
                    SyntaxKind::Keyword
                        if PRIMITIVE_TYPES.contains(&self.peek_text())
                            || self.peek_text() == "final" =>
                    {
                        let decl = self.parse_local_variable();
                        stmt.node(decl);
                    }
                    SyntaxKind::Identifier if self.local_variable_ahead() => {
                        let decl = self.parse_local_variable();
                        stmt.node(decl);
                    }
                    _ => {
                        let expr = self.parse_expr();
                        stmt.child(expr);
                    }
                }
                if self.pos == guard {
                    // No progress: swallow one token to terminate.
                    self.bump(&mut stmt);
                }
                guard = self.pos;
            }
        }
        let body = self.parse_statement();
        stmt.node(body);
        stmt
    }

    fn parse_while(&mut self) -> P {
        let mut stmt = P::new(SyntaxKind::WhileStatement);
        self.bump(&mut stmt); // 'while'
        self.parse_condition(&mut stmt);
        let body = self.parse_statement();
        stmt.node(body);
        stmt
    }

    fn parse_do_while(&mut self) -> P {
        let mut stmt = P::new(SyntaxKind::DoWhileStatement);
        self.bump(&mut stmt); // 'do'
        let body = self.parse_statement();
        stmt.node(body);
        if self.at_keyword("while") {
            self.bump(&mut stmt);
            self.parse_condition(&mut stmt);
        }
        if self.peek() == Some(SyntaxKind::Semicolon) {
            self.bump(&mut stmt);
        }
        stmt
    }

    fn parse_try(&mut self) -> P {
        let mut stmt = P::new(SyntaxKind::TryStatement);
        self.bump(&mut stmt); // 'try'
        if self.peek() == Some(SyntaxKind::LBrace) {
            let block = self.parse_block();
            stmt.node(block);
        }
        while self.at_keyword("catch") {
            let mut clause = P::new(SyntaxKind::CatchClause);
            self.bump(&mut clause); // 'catch'
            self.parse_condition(&mut clause);
            if self.peek() == Some(SyntaxKind::LBrace) {
                let block = self.parse_block();
                clause.node(block);
            }
            stmt.node(clause);
        }
        if self.at_keyword("finally") {
            let mut clause = P::new(SyntaxKind::FinallyClause);
            self.bump(&mut clause); // 'finally'
            if self.peek() == Some(SyntaxKind::LBrace) {
                let block = self.parse_block();
                clause.node(block);
            }
            stmt.node(clause);
        }
        stmt
    }

    fn parse_synchronized(&mut self) -> P {
        let mut stmt = P::new(SyntaxKind::SynchronizedStatement);
        self.bump(&mut stmt); // 'synchronized'
        self.parse_condition(&mut stmt);
        if self.peek() == Some(SyntaxKind::LBrace) {
            let block = self.parse_block();
            stmt.node(block);
        }
        stmt
    }

    /// `( ... )` attached flat to the given construct, so the parentheses
    /// take their spacing from the enclosing statement kind. Contents are
    /// a lenient expression list; a catch clause's `Type name` pair lands
    /// here as two bare tokens.
    fn parse_condition(&mut self, parent: &mut P) {
        if self.peek() != Some(SyntaxKind::LParen) {
            return;
        }
        self.bump(parent); // '('
        let mut guard = self.pos;
        while let Some(kind) = self.peek() {
            if kind == SyntaxKind::RParen {
                self.bump(parent);
                return;
            }
            let expr = self.parse_expr();
            parent.child(expr);
            if self.pos == guard {
                self.bump(parent);
            }
            guard = self.pos;
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expr(&mut self) -> PNode {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> PNode {
        let lhs = self.parse_ternary();
        if self.peek() == Some(SyntaxKind::AssignOp) {
            let mut assign = P::new(SyntaxKind::Assignment);
            assign.child(lhs);
            self.bump(&mut assign);
            let rhs = self.parse_assignment();
            assign.child(rhs);
            return PNode::Node(assign);
        }
        lhs
    }

    fn parse_ternary(&mut self) -> PNode {
        let cond = self.parse_binary(0);
        if self.peek() == Some(SyntaxKind::Question) {
            let mut ternary = P::new(SyntaxKind::TernaryExpression);
            ternary.child(cond);
            self.bump(&mut ternary); // '?'
            let then_value = self.parse_expr();
            ternary.child(then_value);
            if self.peek() == Some(SyntaxKind::Colon) {
                self.bump(&mut ternary);
                let else_value = self.parse_expr();
                ternary.child(else_value);
            }
            return PNode::Node(ternary);
        }
        cond
    }

    /// Binary operator levels, loosest first.
    const BINARY_LEVELS: &'static [SyntaxKind] = &[
        SyntaxKind::LogicalOrOp,
        SyntaxKind::LogicalAndOp,
        SyntaxKind::BitwiseOp,
        SyntaxKind::EqualityOp,
        SyntaxKind::RelationalOp,
        SyntaxKind::ShiftOp,
        SyntaxKind::AdditiveOp,
        SyntaxKind::MultiplicativeOp,
    ];

    fn parse_binary(&mut self, level: usize) -> PNode {
        if level >= Self::BINARY_LEVELS.len() {
            return self.parse_unary();
        }
        let op = Self::BINARY_LEVELS[level];
        let mut left = self.parse_binary(level + 1);
        while self.peek() == Some(op) {
            let mut binary = P::new(SyntaxKind::BinaryExpression);
            binary.child(left);
            self.bump(&mut binary); // operator
            let right = self.parse_binary(level + 1);
            binary.child(right);
            left = PNode::Node(binary);
        }
        left
    }

    fn parse_unary(&mut self) -> PNode {
        match self.peek() {
            Some(SyntaxKind::NotOp | SyntaxKind::IncDecOp | SyntaxKind::AdditiveOp) => {
                let mut unary = P::new(SyntaxKind::UnaryExpression);
                self.bump(&mut unary);
                let operand = self.parse_unary();
                unary.child(operand);
                PNode::Node(unary)
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> PNode {
        let mut current = self.parse_primary();
        let mut chained_calls = 0usize;
        loop {
            match self.peek() {
                Some(SyntaxKind::Dot) => {
                    let mut access = P::new(SyntaxKind::CallExpression);
                    access.child(current);
                    self.bump(&mut access); // '.'
                    if matches!(
                        self.peek(),
                        Some(SyntaxKind::Identifier | SyntaxKind::Keyword)
                    ) {
                        self.bump(&mut access);
                    }
                    if self.peek() == Some(SyntaxKind::LParen) {
                        let args = self.parse_argument_list();
                        access.node(args);
                        chained_calls += 1;
                    }
                    current = PNode::Node(access);
                }
                Some(SyntaxKind::LParen) => {
                    let mut call = P::new(SyntaxKind::CallExpression);
                    call.child(current);
                    let args = self.parse_argument_list();
                    call.node(args);
                    current = PNode::Node(call);
                }
                Some(SyntaxKind::LBracket) => {
                    let mut index = P::new(SyntaxKind::CallExpression);
                    index.child(current);
                    self.bump(&mut index); // '['
                    if self.peek() != Some(SyntaxKind::RBracket) {
                        let expr = self.parse_expr();
                        index.child(expr);
                    }
                    if self.peek() == Some(SyntaxKind::RBracket) {
                        self.bump(&mut index);
                    }
                    current = PNode::Node(index);
                }
                Some(SyntaxKind::IncDecOp) => {
                    let mut postfix = P::new(SyntaxKind::UnaryExpression);
                    postfix.child(current);
                    self.bump(&mut postfix);
                    current = PNode::Node(postfix);
                }
                _ => break,
            }
        }
        if chained_calls >= 2 {
            let mut chain = P::new(SyntaxKind::CallChain);
            chain.child(current);
            return PNode::Node(chain);
        }
        current
    }

    fn parse_argument_list(&mut self) -> P {
        let mut args = P::new(SyntaxKind::ArgumentList);
        self.bump(&mut args); // '('
        loop {
            match self.peek() {
                None => break,
                Some(SyntaxKind::RParen) => {
                    self.bump(&mut args);
                    break;
                }
                Some(SyntaxKind::Comma) => self.bump(&mut args),
                Some(SyntaxKind::LBrace) => {
                    let nested = self.parse_array_initializer();
                    args.node(nested);
                }
                _ => {
                    let expr = self.parse_expr();
                    args.child(expr);
                }
            }
        }
        args
    }

    fn parse_array_initializer(&mut self) -> P {
        let mut init = P::new(SyntaxKind::ArrayInitializer);
        self.bump(&mut init); // '{'
        loop {
            match self.peek() {
                None => break,
                Some(SyntaxKind::RBrace) => {
                    self.bump(&mut init);
                    break;
                }
                Some(SyntaxKind::Comma) => self.bump(&mut init),
                Some(SyntaxKind::LBrace) => {
                    let nested = self.parse_array_initializer();
                    init.node(nested);
                }
                _ => {
                    let expr = self.parse_expr();
                    init.child(expr);
                }
            }
        }
        init
    }

    fn parse_primary(&mut self) -> PNode {
        match self.peek() {
            Some(SyntaxKind::LParen) => {
                let mut paren = P::new(SyntaxKind::ParenthesizedExpression);
                self.bump(&mut paren); // '('
                if self.peek() != Some(SyntaxKind::RParen) {
                    let inner = self.parse_expr();
                    paren.child(inner);
                }
                if self.peek() == Some(SyntaxKind::RParen) {
                    self.bump(&mut paren);
                }
                PNode::Node(paren)
            }
            Some(SyntaxKind::LBrace) => PNode::Node(self.parse_array_initializer()),
            Some(SyntaxKind::Keyword) if self.peek_text() == "new" => {
                let mut alloc = P::new(SyntaxKind::CallExpression);
                self.bump(&mut alloc); // 'new'
                // Type tokens up to the arguments or initializer.
                while let Some(kind) = self.peek() {
                    match kind {
                        SyntaxKind::Identifier
                        | SyntaxKind::Keyword
                        | SyntaxKind::Dot
                        | SyntaxKind::LBracket
                        | SyntaxKind::RBracket => self.bump(&mut alloc),
                        SyntaxKind::RelationalOp if self.at_angle_open() => {
                            let generics = self.parse_type_arguments();
                            alloc.node(generics);
                        }
                        _ => break,
                    }
                }
                if self.peek() == Some(SyntaxKind::LParen) {
                    let args = self.parse_argument_list();
                    alloc.node(args);
                }
                if self.peek() == Some(SyntaxKind::LBrace) {
                    let body = self.parse_array_initializer();
                    alloc.node(body);
                }
                PNode::Node(alloc)
            }
            Some(SyntaxKind::Identifier | SyntaxKind::Literal | SyntaxKind::Keyword) => {
                let index = self.pos;
                self.pos += 1;
                PNode::Tok(index)
            }
            Some(_) => {
                // Guarantee progress on anything unexpected.
                let index = self.pos;
                self.pos += 1;
                PNode::Tok(index)
            }
            None => PNode::Node(P::new(SyntaxKind::ParenthesizedExpression)),
        }
    }
}

/// Emit a parsed structure into the tree builder.
fn emit(builder: &mut TreeBuilder, tokens: &[RawToken], node: &P) {
    builder.open(node.kind);
    for child in &node.children {
        match child {
            PNode::Tok(index) => {
                let token = tokens[*index];
                builder.token(token.kind, token.span);
            }
            PNode::Node(nested) => emit(builder, tokens, nested),
        }
    }
    builder.close();
}
