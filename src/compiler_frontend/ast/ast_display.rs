//! AST Display
//!
//! Renders a tree back into source code.
//! Output is compact (one line, single spaces) and only parenthesises
//! where operator precedence requires it, so two trees print the same exactly when they have the same shape.

use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind, UnaryOperator};
use std::fmt::Write as _;

// Operator precedence levels, higher binds tighter
const PRECEDENCE_COMMA: u8 = 1;
const PRECEDENCE_ASSIGN: u8 = 3;
const PRECEDENCE_HOOK: u8 = 4;
const PRECEDENCE_OR: u8 = 5;
const PRECEDENCE_AND: u8 = 6;
const PRECEDENCE_UNARY: u8 = 15;
const PRECEDENCE_POSTFIX: u8 = 16;
const PRECEDENCE_CALL: u8 = 18;
const PRECEDENCE_NEW: u8 = 19;
const PRECEDENCE_PRIMARY: u8 = 20;

impl Ast {
    /// Whole tree as compact source
    pub fn to_source(&self) -> String {
        SourceRenderer::new(self).render_statement(self.root)
    }

    /// Whole tree with each top level statement on its own line
    pub fn to_source_lines(&self) -> String {
        let renderer = SourceRenderer::new(self);
        let mut out = String::new();
        for statement in self.children(self.root) {
            let _ = writeln!(out, "{}", renderer.render_statement(*statement));
        }
        out
    }

    /// A single subtree as compact source
    pub fn node_to_source(&self, id: NodeId) -> String {
        let renderer = SourceRenderer::new(self);
        match expression_precedence(self.kind(id)) {
            Some(_) => renderer.render_expression(id, PRECEDENCE_COMMA),
            None => renderer.render_statement(id),
        }
    }
}

pub(crate) struct SourceRenderer<'a> {
    ast: &'a Ast,
}

impl<'a> SourceRenderer<'a> {
    pub(crate) fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    // ============================================================
    // Statements
    // ============================================================
    fn render_statement(&self, id: NodeId) -> String {
        let ast = self.ast;
        let children = ast.children(id);
        let mut out = String::new();

        match ast.kind(id) {
            NodeKind::Script => {
                out = self.render_statement_list(children);
            }

            NodeKind::Block => {
                if children.is_empty() {
                    out.push_str("{}");
                } else {
                    let _ = write!(out, "{{ {} }}", self.render_statement_list(children));
                }
            }

            NodeKind::ExprResult => {
                let expression = self.render_child_expression(id, 0, PRECEDENCE_COMMA);
                // A leading function or object literal would parse as a declaration or block
                if expression.starts_with("function") || expression.starts_with('{') {
                    let _ = write!(out, "({expression});");
                } else {
                    let _ = write!(out, "{expression};");
                }
            }

            NodeKind::Var => {
                let _ = write!(out, "{};", self.render_var(id));
            }

            NodeKind::If => {
                let _ = write!(
                    out,
                    "if ({}) {}",
                    self.render_child_expression(id, 0, PRECEDENCE_COMMA),
                    self.render_child_statement(id, 1)
                );
                if children.len() > 2 {
                    let _ = write!(out, " else {}", self.render_child_statement(id, 2));
                }
            }

            NodeKind::Return => {
                if children.is_empty() {
                    out.push_str("return;");
                } else {
                    let _ = write!(
                        out,
                        "return {};",
                        self.render_child_expression(id, 0, PRECEDENCE_COMMA)
                    );
                }
            }

            NodeKind::Switch => {
                let _ = write!(
                    out,
                    "switch ({}) {{",
                    self.render_child_expression(id, 0, PRECEDENCE_COMMA)
                );
                for clause in children.iter().skip(1) {
                    let _ = write!(out, " {}", self.render_statement(*clause));
                }
                out.push_str(" }");
            }

            NodeKind::Case => {
                let _ = write!(
                    out,
                    "case {}:",
                    self.render_child_expression(id, 0, PRECEDENCE_COMMA)
                );
                self.render_clause_body(&mut out, ast.children(id).get(1).copied());
            }

            NodeKind::Default => {
                out.push_str("default:");
                self.render_clause_body(&mut out, ast.first_child(id));
            }

            NodeKind::Label(name) => {
                let _ = write!(out, "{name}: {}", self.render_child_statement(id, 0));
            }

            NodeKind::While => {
                let _ = write!(
                    out,
                    "while ({}) {}",
                    self.render_child_expression(id, 0, PRECEDENCE_COMMA),
                    self.render_child_statement(id, 1)
                );
            }

            NodeKind::DoWhile => {
                let _ = write!(
                    out,
                    "do {} while ({});",
                    self.render_child_statement(id, 0),
                    self.render_child_expression(id, 1, PRECEDENCE_COMMA)
                );
            }

            NodeKind::For => {
                let initializer = match children.first() {
                    Some(init) if matches!(ast.kind(*init), NodeKind::Var) => self.render_var(*init),
                    Some(_) => self.render_child_expression(id, 0, PRECEDENCE_COMMA),
                    None => String::new(),
                };
                let _ = write!(
                    out,
                    "for ({initializer}; {}; {}) {}",
                    self.render_child_expression(id, 1, PRECEDENCE_COMMA),
                    self.render_child_expression(id, 2, PRECEDENCE_COMMA),
                    self.render_child_statement(id, 3)
                );
            }

            NodeKind::Break(label) => match label {
                Some(label) => {
                    let _ = write!(out, "break {label};");
                }
                None => out.push_str("break;"),
            },

            NodeKind::Continue(label) => match label {
                Some(label) => {
                    let _ = write!(out, "continue {label};");
                }
                None => out.push_str("continue;"),
            },

            NodeKind::Throw => {
                let _ = write!(
                    out,
                    "throw {};",
                    self.render_child_expression(id, 0, PRECEDENCE_COMMA)
                );
            }

            NodeKind::Empty => out.push(';'),

            // Function declarations sit directly in statement lists
            NodeKind::Function { .. } => {
                out = self.render_function(id);
            }

            // Anything else is an expression placed where a statement was expected
            _ => {
                let _ = write!(out, "{};", self.render_expression(id, PRECEDENCE_COMMA));
            }
        }

        out
    }

    fn render_statement_list(&self, statements: &[NodeId]) -> String {
        statements
            .iter()
            .map(|statement| self.render_statement(*statement))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_clause_body(&self, out: &mut String, body: Option<NodeId>) {
        let Some(body) = body else {
            return;
        };

        for statement in self.ast.children(body) {
            let _ = write!(out, " {}", self.render_statement(*statement));
        }
    }

    fn render_var(&self, id: NodeId) -> String {
        let declarators = self
            .ast
            .children(id)
            .iter()
            .map(|declarator| {
                let name = self.ast.name_of(*declarator).unwrap_or("?");
                match self.ast.first_child(*declarator) {
                    Some(value) => format!("{name} = {}", self.render_expression(value, PRECEDENCE_ASSIGN)),
                    None => name.to_owned(),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("var {declarators}")
    }

    fn render_child_statement(&self, parent: NodeId, index: usize) -> String {
        match self.ast.children(parent).get(index) {
            Some(child) => self.render_statement(*child),
            None => String::from("{}"),
        }
    }

    // ============================================================
    // Expressions
    // ============================================================
    fn render_child_expression(&self, parent: NodeId, index: usize, min_precedence: u8) -> String {
        match self.ast.children(parent).get(index) {
            Some(child) => self.render_expression(*child, min_precedence),
            None => String::new(),
        }
    }

    /// Renders an expression, parenthesising it if it binds looser than `min_precedence`
    fn render_expression(&self, id: NodeId, min_precedence: u8) -> String {
        let ast = self.ast;
        let precedence = expression_precedence(ast.kind(id)).unwrap_or(PRECEDENCE_PRIMARY);

        let rendered = match ast.kind(id) {
            NodeKind::Name(name) => name.to_owned(),
            NodeKind::Number(value) => value.to_string(),
            NodeKind::String(value) => quote_string(value),
            NodeKind::True => String::from("true"),
            NodeKind::False => String::from("false"),
            NodeKind::Null => String::from("null"),
            NodeKind::This => String::from("this"),

            // An empty statement where an expression is optional (for loop headers)
            NodeKind::Empty => String::new(),

            NodeKind::ArrayLit => format!("[{}]", self.render_list(ast.children(id))),

            NodeKind::ObjectLit => {
                let entries = ast
                    .children(id)
                    .iter()
                    .map(|entry| self.render_object_entry(*entry))
                    .collect::<Vec<_>>();

                if entries.is_empty() {
                    String::from("{}")
                } else {
                    format!("{{{}}}", entries.join(", "))
                }
            }

            NodeKind::StringKey(_) => self.render_object_entry(id),

            NodeKind::Function { .. } => self.render_function(id),

            NodeKind::Call => {
                let children = ast.children(id);
                format!(
                    "{}({})",
                    self.render_child_expression(id, 0, PRECEDENCE_CALL),
                    self.render_list(children.get(1..).unwrap_or_default())
                )
            }

            NodeKind::New => {
                let children = ast.children(id);
                let mut callee = self.render_child_expression(id, 0, PRECEDENCE_CALL);

                // `new (f().Type)()` would construct the result of `f` without them
                if children.first().is_some_and(|callee| self.member_chain_has_call(*callee)) {
                    callee = format!("({callee})");
                }

                format!(
                    "new {callee}({})",
                    self.render_list(children.get(1..).unwrap_or_default())
                )
            }

            NodeKind::GetProp(property) => format!(
                "{}.{property}",
                self.render_child_expression(id, 0, PRECEDENCE_CALL)
            ),

            NodeKind::GetElem => format!(
                "{}[{}]",
                self.render_child_expression(id, 0, PRECEDENCE_CALL),
                self.render_child_expression(id, 1, PRECEDENCE_COMMA)
            ),

            NodeKind::Assign => format!(
                "{} = {}",
                self.render_child_expression(id, 0, PRECEDENCE_POSTFIX),
                self.render_child_expression(id, 1, PRECEDENCE_ASSIGN)
            ),

            NodeKind::AssignOp(operator) => format!(
                "{} {}= {}",
                self.render_child_expression(id, 0, PRECEDENCE_POSTFIX),
                operator.symbol(),
                self.render_child_expression(id, 1, PRECEDENCE_ASSIGN)
            ),

            NodeKind::Hook => format!(
                "{} ? {} : {}",
                self.render_child_expression(id, 0, PRECEDENCE_OR),
                self.render_child_expression(id, 1, PRECEDENCE_ASSIGN),
                self.render_child_expression(id, 2, PRECEDENCE_ASSIGN)
            ),

            NodeKind::Or => format!(
                "{} || {}",
                self.render_child_expression(id, 0, PRECEDENCE_OR),
                self.render_child_expression(id, 1, PRECEDENCE_AND)
            ),

            NodeKind::And => format!(
                "{} && {}",
                self.render_child_expression(id, 0, PRECEDENCE_AND),
                self.render_child_expression(id, 1, PRECEDENCE_AND + 1)
            ),

            // Left associative, so the right operand needs to bind strictly tighter
            NodeKind::Binary(operator) => format!(
                "{} {} {}",
                self.render_child_expression(id, 0, operator.precedence()),
                operator.symbol(),
                self.render_child_expression(id, 1, operator.precedence() + 1)
            ),

            NodeKind::Unary(operator) => {
                let operand = self.render_child_expression(id, 0, PRECEDENCE_UNARY);
                let symbol = operator.symbol();

                // `- -x` must not collapse into `--x`
                let needs_space = matches!(operator, UnaryOperator::Negate | UnaryOperator::Plus)
                    && operand.starts_with(symbol);

                if needs_space {
                    format!("{symbol} {operand}")
                } else {
                    format!("{symbol}{operand}")
                }
            }

            NodeKind::Increment {
                is_decrement,
                is_postfix,
            } => {
                let symbol = if *is_decrement { "--" } else { "++" };
                let operand = self.render_child_expression(id, 0, PRECEDENCE_POSTFIX);
                if *is_postfix {
                    format!("{operand}{symbol}")
                } else {
                    format!("{symbol}{operand}")
                }
            }

            NodeKind::Comma => format!(
                "{}, {}",
                self.render_child_expression(id, 0, PRECEDENCE_COMMA),
                self.render_child_expression(id, 1, PRECEDENCE_COMMA + 1)
            ),

            // Statements never appear inside expressions in a well formed tree
            _ => self.render_statement(id),
        };

        if precedence < min_precedence {
            format!("({rendered})")
        } else {
            rendered
        }
    }

    fn member_chain_has_call(&self, id: NodeId) -> bool {
        match self.ast.kind(id) {
            NodeKind::Call => true,
            NodeKind::GetProp(_) | NodeKind::GetElem => self
                .ast
                .first_child(id)
                .is_some_and(|object| self.member_chain_has_call(object)),
            _ => false,
        }
    }

    fn render_list(&self, items: &[NodeId]) -> String {
        items
            .iter()
            .map(|item| self.render_expression(*item, PRECEDENCE_ASSIGN))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render_object_entry(&self, id: NodeId) -> String {
        let key = match self.ast.kind(id) {
            NodeKind::StringKey(key) if is_identifier(key) => key.to_owned(),
            NodeKind::StringKey(key) => quote_string(key),
            _ => String::from("?"),
        };

        format!(
            "{key}: {}",
            self.render_child_expression(id, 0, PRECEDENCE_ASSIGN)
        )
    }

    fn render_function(&self, id: NodeId) -> String {
        let NodeKind::Function { name, params } = self.ast.kind(id) else {
            return String::new();
        };

        let mut out = String::from("function");
        if let Some(name) = name {
            let _ = write!(out, " {name}");
        }
        let _ = write!(
            out,
            "({}) {}",
            params.join(", "),
            self.render_child_statement(id, 0)
        );

        out
    }
}

/// Precedence of an expression node, None for statements
fn expression_precedence(kind: &NodeKind) -> Option<u8> {
    let precedence = match kind {
        NodeKind::Comma => PRECEDENCE_COMMA,
        NodeKind::Assign | NodeKind::AssignOp(_) => PRECEDENCE_ASSIGN,
        NodeKind::Hook => PRECEDENCE_HOOK,
        NodeKind::Or => PRECEDENCE_OR,
        NodeKind::And => PRECEDENCE_AND,
        NodeKind::Binary(operator) => operator.precedence(),
        NodeKind::Unary(_) => PRECEDENCE_UNARY,
        NodeKind::Increment { is_postfix, .. } => {
            if *is_postfix {
                PRECEDENCE_POSTFIX
            } else {
                PRECEDENCE_UNARY
            }
        }
        NodeKind::Call | NodeKind::GetProp(_) | NodeKind::GetElem => PRECEDENCE_CALL,
        NodeKind::New => PRECEDENCE_NEW,

        NodeKind::Name(_)
        | NodeKind::Number(_)
        | NodeKind::String(_)
        | NodeKind::True
        | NodeKind::False
        | NodeKind::Null
        | NodeKind::This
        | NodeKind::ArrayLit
        | NodeKind::ObjectLit
        | NodeKind::StringKey(_)
        | NodeKind::Function { .. } => PRECEDENCE_PRIMARY,

        NodeKind::Script
        | NodeKind::Block
        | NodeKind::ExprResult
        | NodeKind::Var
        | NodeKind::If
        | NodeKind::Return
        | NodeKind::Switch
        | NodeKind::Case
        | NodeKind::Default
        | NodeKind::Label(_)
        | NodeKind::While
        | NodeKind::DoWhile
        | NodeKind::For
        | NodeKind::Break(_)
        | NodeKind::Continue(_)
        | NodeKind::Throw
        | NodeKind::Empty => return None,
    };

    Some(precedence)
}

fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
