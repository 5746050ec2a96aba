use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{FileTokens, TextLocation, Token, TokenKind};
use crate::{ast_log, return_syntax_error};
use std::path::PathBuf;

/// Parses a whole file into a tree with a `Script` root.
///
/// The tree comes out normalised the way the optimizer passes expect it:
/// - bodies of if/else/loops/functions are always blocks
/// - a `var` statement with several declarators is split into one `var` per declarator
///   (except inside a `for` initializer, where it has to stay a single node)
/// - names written in CONSTANT_CASE are flagged as constant names
pub fn parse_script(file_tokens: &FileTokens) -> Result<Ast, CompilerError> {
    let mut parser = ScriptParser::new(file_tokens);
    let root = parser.ast.root;

    while parser.current_kind() != &TokenKind::Eof {
        for statement in parser.parse_statement()? {
            parser.ast.add_child_to_back(root, statement);
        }
    }

    ast_log!(
        "Parsed ",
        file_tokens.src_path.to_string_lossy().to_string(),
        " into ",
        parser.ast.len(),
        " nodes"
    );

    Ok(parser.ast)
}

pub struct ScriptParser<'a> {
    tokens: &'a [Token],
    index: usize,
    src_path: PathBuf,
    pub(crate) ast: Ast,
}

impl<'a> ScriptParser<'a> {
    pub fn new(file_tokens: &'a FileTokens) -> Self {
        ScriptParser {
            tokens: &file_tokens.tokens,
            index: 0,
            src_path: file_tokens.src_path.to_owned(),
            ast: Ast::with_capacity(file_tokens.tokens.len()),
        }
    }

    // ============================================================
    // Token helpers
    // ============================================================
    pub(crate) fn current(&self) -> &Token {
        // The tokenizer always ends the stream with Eof, so clamp to it
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(crate) fn current_location(&self) -> TextLocation {
        self.current().location
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> &TokenKind {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.index + offset).min(last)].kind
    }

    pub(crate) fn advance(&mut self) -> TextLocation {
        let location = self.current_location();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        location
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            return true;
        }

        false
    }

    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<TextLocation, CompilerError> {
        if self.current_kind() == &kind {
            return Ok(self.advance());
        }

        return_syntax_error!(
            format!("Expected {expected} but found {:?}", self.current_kind()),
            self.current_location().to_error_location(&self.src_path),
            {
                CompilationStage => "Parsing",
                SuggestedInsertion => expected,
            }
        )
    }

    pub(crate) fn expect_symbol(&mut self) -> Result<(String, TextLocation), CompilerError> {
        if let TokenKind::Symbol(name) = self.current_kind() {
            let name = name.to_owned();
            let location = self.advance();
            return Ok((name, location));
        }

        return_syntax_error!(
            format!("Expected a name but found {:?}", self.current_kind()),
            self.current_location().to_error_location(&self.src_path),
            {
                CompilationStage => "Parsing",
            }
        )
    }

    pub(crate) fn syntax_error(&self, msg: impl Into<String>, location: TextLocation) -> CompilerError {
        let mut error =
            CompilerError::new_syntax_error(msg, location.to_error_location(&self.src_path));
        error.new_metadata_entry(
            crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::CompilationStage,
            "Parsing",
        );
        error
    }

    /// Statements end at a semicolon, or implicitly right before a closing curly or the end of the file
    fn expect_statement_end(&mut self) -> Result<(), CompilerError> {
        match self.current_kind() {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::CloseCurly | TokenKind::Eof => Ok(()),
            _ => self.expect(TokenKind::Semicolon, "';'").map(|_| ()),
        }
    }

    // ============================================================
    // Statements
    // ============================================================
    /// Parses one statement.
    /// More than one node only comes back when a multi-declarator `var` gets split.
    pub fn parse_statement(&mut self) -> Result<Vec<NodeId>, CompilerError> {
        let start = self.current_location();

        let statement = match self.current_kind() {
            TokenKind::OpenCurly => self.parse_block()?,

            TokenKind::Var => {
                let declarations = self.parse_var_declarations(start, true)?;
                self.expect_statement_end()?;
                return Ok(declarations);
            }

            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Do => self.parse_do_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Switch => self.parse_switch()?,

            TokenKind::Return => {
                self.advance();
                let statement = self.ast.new_node(NodeKind::Return, start);
                if !matches!(
                    self.current_kind(),
                    TokenKind::Semicolon | TokenKind::CloseCurly | TokenKind::Eof
                ) {
                    let value = self.parse_expression()?;
                    self.ast.add_child_to_back(statement, value);
                }
                self.expect_statement_end()?;
                statement
            }

            TokenKind::Break | TokenKind::Continue => {
                let is_break = self.current_kind() == &TokenKind::Break;
                self.advance();
                let label = match self.current_kind() {
                    TokenKind::Symbol(name) => {
                        let name = name.to_owned();
                        self.advance();
                        Some(name)
                    }
                    _ => None,
                };
                self.expect_statement_end()?;

                let kind = if is_break {
                    NodeKind::Break(label)
                } else {
                    NodeKind::Continue(label)
                };
                self.ast.new_node(kind, start)
            }

            TokenKind::Throw => {
                self.advance();
                let value = self.parse_expression()?;
                self.expect_statement_end()?;
                self.ast
                    .new_node_with_children(NodeKind::Throw, start, &[value])
            }

            TokenKind::Function => self.parse_function()?,

            TokenKind::Semicolon => {
                self.advance();
                self.ast.new_node(NodeKind::Empty, start)
            }

            TokenKind::Symbol(name) if self.peek_kind(1) == &TokenKind::Colon => {
                let name = name.to_owned();
                self.advance();
                self.advance();
                let body = self.parse_single_statement()?;
                self.ast
                    .new_node_with_children(NodeKind::Label(name), start, &[body])
            }

            _ => {
                let value = self.parse_expression()?;
                self.expect_statement_end()?;
                let location = start.to(self.ast.location(value));
                self.ast
                    .new_node_with_children(NodeKind::ExprResult, location, &[value])
            }
        };

        Ok(vec![statement])
    }

    /// A statement that has to be a single node, wrapping split declarations in a block
    fn parse_single_statement(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.current_location();
        let mut statements = self.parse_statement()?;

        if statements.len() == 1 {
            if let Some(statement) = statements.pop() {
                return Ok(statement);
            }
        }

        Ok(self
            .ast
            .new_node_with_children(NodeKind::Block, start, &statements))
    }

    fn parse_block(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::OpenCurly, "'{'")?;
        let block = self.ast.new_node(NodeKind::Block, start);

        while !matches!(self.current_kind(), TokenKind::CloseCurly | TokenKind::Eof) {
            for statement in self.parse_statement()? {
                self.ast.add_child_to_back(block, statement);
            }
        }

        self.expect(TokenKind::CloseCurly, "'}'")?;
        Ok(block)
    }

    /// Bodies of control flow are always blocks
    fn parse_body(&mut self) -> Result<NodeId, CompilerError> {
        if self.current_kind() == &TokenKind::OpenCurly {
            return self.parse_block();
        }

        let start = self.current_location();
        let statements = self.parse_statement()?;
        Ok(self
            .ast
            .new_node_with_children(NodeKind::Block, start, &statements))
    }

    /// `var a = 1, b` either as separate statements or as one node
    fn parse_var_declarations(
        &mut self,
        start: TextLocation,
        split: bool,
    ) -> Result<Vec<NodeId>, CompilerError> {
        self.expect(TokenKind::Var, "'var'")?;

        let mut declarators = Vec::new();
        loop {
            let (name, location) = self.expect_symbol()?;
            let declarator = self.new_name_node(&name, location);

            if self.eat(&TokenKind::Assign) {
                let value = self.parse_assignment()?;
                self.ast.add_child_to_back(declarator, value);
            }

            declarators.push(declarator);

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        if split {
            return Ok(declarators
                .into_iter()
                .map(|declarator| {
                    let location = self.ast.location(declarator);
                    self.ast
                        .new_node_with_children(NodeKind::Var, location, &[declarator])
                })
                .collect());
        }

        Ok(vec![self
            .ast
            .new_node_with_children(NodeKind::Var, start, &declarators)])
    }

    fn parse_if(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::If, "'if'")?;
        self.expect(TokenKind::OpenParenthesis, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::CloseParenthesis, "')'")?;
        let then_block = self.parse_body()?;

        let statement =
            self.ast
                .new_node_with_children(NodeKind::If, start, &[condition, then_block]);

        if self.eat(&TokenKind::Else) {
            let else_block = self.parse_body()?;
            self.ast.add_child_to_back(statement, else_block);
        }

        Ok(statement)
    }

    fn parse_while(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::OpenParenthesis, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::CloseParenthesis, "')'")?;
        let body = self.parse_body()?;

        Ok(self
            .ast
            .new_node_with_children(NodeKind::While, start, &[condition, body]))
    }

    fn parse_do_while(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::Do, "'do'")?;
        let body = self.parse_body()?;
        self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::OpenParenthesis, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::CloseParenthesis, "')'")?;
        self.expect_statement_end()?;

        Ok(self
            .ast
            .new_node_with_children(NodeKind::DoWhile, start, &[body, condition]))
    }

    fn parse_for(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::For, "'for'")?;
        self.expect(TokenKind::OpenParenthesis, "'('")?;

        let initializer = match self.current_kind() {
            TokenKind::Semicolon => self.ast.new_node(NodeKind::Empty, start),
            TokenKind::Var => {
                let location = self.current_location();
                let mut declarations = self.parse_var_declarations(location, false)?;
                match declarations.pop() {
                    Some(declaration) => declaration,
                    None => return Err(self.syntax_error("Expected a declaration", location)),
                }
            }
            _ => self.parse_expression()?,
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let condition = match self.current_kind() {
            TokenKind::Semicolon => self.ast.new_node(NodeKind::Empty, start),
            _ => self.parse_expression()?,
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let update = match self.current_kind() {
            TokenKind::CloseParenthesis => self.ast.new_node(NodeKind::Empty, start),
            _ => self.parse_expression()?,
        };
        self.expect(TokenKind::CloseParenthesis, "')'")?;

        let body = self.parse_body()?;

        Ok(self.ast.new_node_with_children(
            NodeKind::For,
            start,
            &[initializer, condition, update, body],
        ))
    }

    fn parse_switch(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::Switch, "'switch'")?;
        self.expect(TokenKind::OpenParenthesis, "'('")?;
        let discriminant = self.parse_expression()?;
        self.expect(TokenKind::CloseParenthesis, "')'")?;
        self.expect(TokenKind::OpenCurly, "'{'")?;

        let statement = self
            .ast
            .new_node_with_children(NodeKind::Switch, start, &[discriminant]);

        loop {
            let clause_start = self.current_location();
            let clause = match self.current_kind() {
                TokenKind::Case => {
                    self.advance();
                    let test = self.parse_expression()?;
                    self.expect(TokenKind::Colon, "':'")?;
                    let body = self.parse_clause_body(clause_start)?;
                    self.ast
                        .new_node_with_children(NodeKind::Case, clause_start, &[test, body])
                }
                TokenKind::Default => {
                    self.advance();
                    self.expect(TokenKind::Colon, "':'")?;
                    let body = self.parse_clause_body(clause_start)?;
                    self.ast
                        .new_node_with_children(NodeKind::Default, clause_start, &[body])
                }
                TokenKind::CloseCurly => {
                    self.advance();
                    break;
                }
                _ => {
                    return Err(self.syntax_error(
                        format!(
                            "Expected 'case', 'default' or '}}' in switch but found {:?}",
                            self.current_kind()
                        ),
                        clause_start,
                    ));
                }
            };

            self.ast.add_child_to_back(statement, clause);
        }

        Ok(statement)
    }

    fn parse_clause_body(&mut self, start: TextLocation) -> Result<NodeId, CompilerError> {
        let body = self.ast.new_node(NodeKind::Block, start);

        while !matches!(
            self.current_kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::CloseCurly | TokenKind::Eof
        ) {
            for statement in self.parse_statement()? {
                self.ast.add_child_to_back(body, statement);
            }
        }

        Ok(body)
    }

    /// Function declarations and function expressions share the same node
    pub(crate) fn parse_function(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::Function, "'function'")?;

        let name = match self.current_kind() {
            TokenKind::Symbol(name) => {
                let name = name.to_owned();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        self.expect(TokenKind::OpenParenthesis, "'('")?;
        let mut params = Vec::new();
        while self.current_kind() != &TokenKind::CloseParenthesis {
            let (param, _) = self.expect_symbol()?;
            params.push(param);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseParenthesis, "')'")?;

        let body = self.parse_block()?;

        Ok(self
            .ast
            .new_node_with_children(NodeKind::Function { name, params }, start, &[body]))
    }

    pub(crate) fn new_name_node(&mut self, name: &str, location: TextLocation) -> NodeId {
        let id = self.ast.new_name(name, location);
        if is_constant_case(name) {
            self.ast.set_constant_name(id, true);
        }
        id
    }
}

/// CONSTANT_CASE names are treated as assigned once and never mutated
pub fn is_constant_case(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    name.len() > 1
        && !first.is_ascii_digit()
        && name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '$')
}
