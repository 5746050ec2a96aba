use crate::compiler_frontend::ast::ast_nodes::{BinaryOperator, NodeId, NodeKind, UnaryOperator};
use crate::compiler_frontend::ast::parse_script::ScriptParser;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::{TextLocation, TokenKind};

impl ScriptParser<'_> {
    /// Comma separated sequence. Lowest precedence.
    pub fn parse_expression(&mut self) -> Result<NodeId, CompilerError> {
        let mut left = self.parse_assignment()?;

        while self.eat(&TokenKind::Comma) {
            let right = self.parse_assignment()?;
            left = self.new_spanning_node(NodeKind::Comma, left, right, &[left, right]);
        }

        Ok(left)
    }

    pub fn parse_assignment(&mut self) -> Result<NodeId, CompilerError> {
        let target = self.parse_conditional()?;

        let kind = match self.current_kind() {
            TokenKind::Assign => NodeKind::Assign,
            TokenKind::AddAssign => NodeKind::AssignOp(BinaryOperator::Add),
            TokenKind::SubtractAssign => NodeKind::AssignOp(BinaryOperator::Subtract),
            TokenKind::MultiplyAssign => NodeKind::AssignOp(BinaryOperator::Multiply),
            TokenKind::DivideAssign => NodeKind::AssignOp(BinaryOperator::Divide),
            TokenKind::ModulusAssign => NodeKind::AssignOp(BinaryOperator::Modulus),
            _ => return Ok(target),
        };

        self.advance();
        self.check_assignment_target(target, "assign to")?;

        // Right associative
        let value = self.parse_assignment()?;

        Ok(self.new_spanning_node(kind, target, value, &[target, value]))
    }

    fn parse_conditional(&mut self) -> Result<NodeId, CompilerError> {
        let condition = self.parse_or()?;

        if !self.eat(&TokenKind::QuestionMark) {
            return Ok(condition);
        }

        let then_value = self.parse_assignment()?;
        self.expect(TokenKind::Colon, "':'")?;
        let else_value = self.parse_assignment()?;

        Ok(self.new_spanning_node(
            NodeKind::Hook,
            condition,
            else_value,
            &[condition, then_value, else_value],
        ))
    }

    fn parse_or(&mut self) -> Result<NodeId, CompilerError> {
        let mut left = self.parse_and()?;

        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = self.new_spanning_node(NodeKind::Or, left, right, &[left, right]);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<NodeId, CompilerError> {
        let mut left = self.parse_binary(0)?;

        while self.eat(&TokenKind::And) {
            let right = self.parse_binary(0)?;
            left = self.new_spanning_node(NodeKind::And, left, right, &[left, right]);
        }

        Ok(left)
    }

    /// Precedence climbing over the arithmetic, relational and equality operators.
    /// All of them are left associative.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<NodeId, CompilerError> {
        let mut left = self.parse_unary()?;

        while let Some(operator) = binary_operator(self.current_kind()) {
            if operator.precedence() < min_precedence {
                break;
            }

            self.advance();
            let right = self.parse_binary(operator.precedence() + 1)?;
            left = self.new_spanning_node(NodeKind::Binary(operator), left, right, &[left, right]);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.current_location();

        let operator = match self.current_kind() {
            TokenKind::Not => UnaryOperator::Not,
            TokenKind::Subtract => UnaryOperator::Negate,
            TokenKind::Add => UnaryOperator::Plus,
            TokenKind::Typeof => UnaryOperator::Typeof,
            TokenKind::Void => UnaryOperator::Void,
            TokenKind::Delete => UnaryOperator::Delete,

            TokenKind::Increment | TokenKind::Decrement => {
                let is_decrement = self.current_kind() == &TokenKind::Decrement;
                self.advance();
                let target = self.parse_unary()?;
                self.check_assignment_target(target, "increment")?;

                let location = start.to(self.ast.location(target));
                return Ok(self.ast.new_node_with_children(
                    NodeKind::Increment {
                        is_decrement,
                        is_postfix: false,
                    },
                    location,
                    &[target],
                ));
            }

            _ => return self.parse_postfix(),
        };

        self.advance();
        let operand = self.parse_unary()?;
        let location = start.to(self.ast.location(operand));

        Ok(self
            .ast
            .new_node_with_children(NodeKind::Unary(operator), location, &[operand]))
    }

    fn parse_postfix(&mut self) -> Result<NodeId, CompilerError> {
        let target = self.parse_call_or_member()?;

        let is_decrement = match self.current_kind() {
            TokenKind::Increment => false,
            TokenKind::Decrement => true,
            _ => return Ok(target),
        };

        self.check_assignment_target(target, "increment")?;
        let end = self.advance();
        let location = self.ast.location(target).to(end);

        Ok(self.ast.new_node_with_children(
            NodeKind::Increment {
                is_decrement,
                is_postfix: true,
            },
            location,
            &[target],
        ))
    }

    fn parse_call_or_member(&mut self) -> Result<NodeId, CompilerError> {
        let mut expression = if self.current_kind() == &TokenKind::New {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            expression = match self.current_kind() {
                TokenKind::Dot => self.parse_property_access(expression)?,
                TokenKind::OpenBracket => self.parse_element_access(expression)?,
                TokenKind::OpenParenthesis => {
                    let call = self.ast.new_node_with_children(
                        NodeKind::Call,
                        self.ast.location(expression),
                        &[expression],
                    );
                    self.parse_arguments(call)?;
                    call
                }
                _ => return Ok(expression),
            };
        }
    }

    /// `new Callee(args)`. The callee is a member chain without calls.
    fn parse_new(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::New, "'new'")?;

        let mut callee = if self.current_kind() == &TokenKind::New {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            callee = match self.current_kind() {
                TokenKind::Dot => self.parse_property_access(callee)?,
                TokenKind::OpenBracket => self.parse_element_access(callee)?,
                _ => break,
            };
        }

        let construct = self
            .ast
            .new_node_with_children(NodeKind::New, start, &[callee]);

        if self.current_kind() == &TokenKind::OpenParenthesis {
            self.parse_arguments(construct)?;
        }

        Ok(construct)
    }

    fn parse_property_access(&mut self, object: NodeId) -> Result<NodeId, CompilerError> {
        self.expect(TokenKind::Dot, "'.'")?;
        let (property, end) = self.expect_property_name()?;
        let location = self.ast.location(object).to(end);

        Ok(self
            .ast
            .new_node_with_children(NodeKind::GetProp(property), location, &[object]))
    }

    fn parse_element_access(&mut self, object: NodeId) -> Result<NodeId, CompilerError> {
        self.expect(TokenKind::OpenBracket, "'['")?;
        let key = self.parse_expression()?;
        let end = self.expect(TokenKind::CloseBracket, "']'")?;
        let location = self.ast.location(object).to(end);

        Ok(self
            .ast
            .new_node_with_children(NodeKind::GetElem, location, &[object, key]))
    }

    /// Parses `(a, b, ...)` and appends the arguments to a call or new node
    fn parse_arguments(&mut self, call: NodeId) -> Result<(), CompilerError> {
        self.expect(TokenKind::OpenParenthesis, "'('")?;

        while self.current_kind() != &TokenKind::CloseParenthesis {
            let argument = self.parse_assignment()?;
            self.ast.add_child_to_back(call, argument);

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::CloseParenthesis, "')'")?;
        Ok(())
    }

    /// Property names may be keywords (`a.default`, `x.new`)
    fn expect_property_name(&mut self) -> Result<(String, TextLocation), CompilerError> {
        let name = match self.current_kind() {
            TokenKind::Symbol(name) => name.to_owned(),
            other => match keyword_text(other) {
                Some(keyword) => keyword.to_owned(),
                None => {
                    return Err(self.syntax_error(
                        format!("Expected a property name but found {other:?}"),
                        self.current_location(),
                    ));
                }
            },
        };

        let location = self.advance();
        Ok((name, location))
    }

    fn parse_primary(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.current_location();

        let kind = match self.current_kind() {
            TokenKind::Symbol(name) => {
                let name = name.to_owned();
                self.advance();
                return Ok(self.new_name_node(&name, start));
            }
            TokenKind::NumberLiteral(value) => NodeKind::Number(*value),
            TokenKind::StringLiteral(value) => NodeKind::String(value.to_owned()),
            TokenKind::True => NodeKind::True,
            TokenKind::False => NodeKind::False,
            TokenKind::Null => NodeKind::Null,
            TokenKind::This => NodeKind::This,

            TokenKind::OpenParenthesis => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::CloseParenthesis, "')'")?;
                return Ok(inner);
            }

            TokenKind::OpenBracket => return self.parse_array_literal(),
            TokenKind::OpenCurly => return self.parse_object_literal(),
            TokenKind::Function => return self.parse_function(),

            other => {
                return Err(self.syntax_error(
                    format!("Expected an expression but found {other:?}"),
                    start,
                ));
            }
        };

        self.advance();
        Ok(self.ast.new_node(kind, start))
    }

    fn parse_array_literal(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::OpenBracket, "'['")?;
        let array = self.ast.new_node(NodeKind::ArrayLit, start);

        while self.current_kind() != &TokenKind::CloseBracket {
            let element = self.parse_assignment()?;
            self.ast.add_child_to_back(array, element);

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::CloseBracket, "']'")?;
        Ok(array)
    }

    fn parse_object_literal(&mut self) -> Result<NodeId, CompilerError> {
        let start = self.expect(TokenKind::OpenCurly, "'{'")?;
        let object = self.ast.new_node(NodeKind::ObjectLit, start);

        while self.current_kind() != &TokenKind::CloseCurly {
            let key_location = self.current_location();
            let key = match self.current_kind() {
                TokenKind::StringLiteral(key) => {
                    let key = key.to_owned();
                    self.advance();
                    key
                }
                TokenKind::NumberLiteral(value) => {
                    let key = value.to_string();
                    self.advance();
                    key
                }
                _ => self.expect_property_name()?.0,
            };

            self.expect(TokenKind::Colon, "':'")?;
            let value = self.parse_assignment()?;
            let entry = self.ast.new_node_with_children(
                NodeKind::StringKey(key),
                key_location,
                &[value],
            );
            self.ast.add_child_to_back(object, entry);

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::CloseCurly, "'}'")?;
        Ok(object)
    }

    fn check_assignment_target(
        &self,
        target: NodeId,
        action: &str,
    ) -> Result<(), CompilerError> {
        match self.ast.kind(target) {
            NodeKind::Name(_) | NodeKind::GetProp(_) | NodeKind::GetElem => Ok(()),
            other => Err(self.syntax_error(
                format!("Can't {action} a {}", other.describe()),
                self.ast.location(target),
            )),
        }
    }

    fn new_spanning_node(
        &mut self,
        kind: NodeKind,
        first: NodeId,
        last: NodeId,
        children: &[NodeId],
    ) -> NodeId {
        let location = self.ast.location(first).to(self.ast.location(last));
        self.ast.new_node_with_children(kind, location, children)
    }
}

fn binary_operator(kind: &TokenKind) -> Option<BinaryOperator> {
    let operator = match kind {
        TokenKind::Add => BinaryOperator::Add,
        TokenKind::Subtract => BinaryOperator::Subtract,
        TokenKind::Multiply => BinaryOperator::Multiply,
        TokenKind::Divide => BinaryOperator::Divide,
        TokenKind::Modulus => BinaryOperator::Modulus,
        TokenKind::Equal => BinaryOperator::Equal,
        TokenKind::NotEqual => BinaryOperator::NotEqual,
        TokenKind::StrictEqual => BinaryOperator::StrictEqual,
        TokenKind::StrictNotEqual => BinaryOperator::StrictNotEqual,
        TokenKind::LessThan => BinaryOperator::LessThan,
        TokenKind::GreaterThan => BinaryOperator::GreaterThan,
        TokenKind::LessThanOrEqual => BinaryOperator::LessThanOrEqual,
        TokenKind::GreaterThanOrEqual => BinaryOperator::GreaterThanOrEqual,
        _ => return None,
    };

    Some(operator)
}

fn keyword_text(kind: &TokenKind) -> Option<&'static str> {
    let text = match kind {
        TokenKind::Var => "var",
        TokenKind::Function => "function",
        TokenKind::Return => "return",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::While => "while",
        TokenKind::Do => "do",
        TokenKind::For => "for",
        TokenKind::Switch => "switch",
        TokenKind::Case => "case",
        TokenKind::Default => "default",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        TokenKind::New => "new",
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Null => "null",
        TokenKind::This => "this",
        TokenKind::Typeof => "typeof",
        TokenKind::Delete => "delete",
        TokenKind::Void => "void",
        TokenKind::Throw => "throw",
        _ => return None,
    };

    Some(text)
}
