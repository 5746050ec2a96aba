use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::expression_decomposer::ExpressionDecomposer;
use crate::compiler_frontend::optimizers::expression_decomposer::extraction::parent_of;
use crate::compiler_frontend::optimizers::expression_decomposer::node_roles::{
    AncestorRole, ConditionalOp, ancestor_role,
};
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::{decompose_log, return_compiler_error};

impl ExpressionDecomposer<'_> {
    /// Turns a conditional expression into an if statement.
    ///
    /// - `c ? a : b` becomes `if (c) { a } else { b }`
    /// - `a && b` becomes `if (a) { b }`
    /// - `a || b` becomes `if (a) {} else { b }`
    ///
    /// When the value is still needed, each branch assigns to a new temporary that is declared
    /// before the injection point, and the expression is replaced by that temporary.
    /// Otherwise the expression must be a whole expression statement, which the if replaces.
    ///
    /// Returns the new if statement.
    pub(crate) fn extract_conditional(
        &mut self,
        ast: &mut Ast,
        expression: NodeId,
        injection_point: NodeId,
        need_result: bool,
    ) -> Result<NodeId, CompilerError> {
        let parent = parent_of(ast, expression)?;

        let AncestorRole::Conditional(operator) = ancestor_role(ast, expression) else {
            return_compiler_error!(ast.error_location(expression) =>
                "Can't turn a {} into control flow",
                ast.kind(expression).describe();
                {
                    ViolatedInvariant => "only ?:, && and || are extracted as conditionals",
                    NodeKind => ast.kind(expression).describe(),
                }
            );
        };

        if !need_result && !matches!(ast.kind(parent), NodeKind::ExprResult) {
            return_compiler_error!(ast.error_location(expression) =>
                "A {} whose value is unused must be a whole expression statement",
                ast.kind(expression).describe();
                {
                    ViolatedInvariant => "conditionals extracted for effect are expression statements",
                    NodeKind => ast.kind(parent).describe(),
                }
            );
        }

        let temp_name = self.temp_value_name();
        let location = ast.location(expression);
        let operands = ast.detach_children(expression);

        let then_block = ast.new_node(NodeKind::Block, location);
        let else_block = ast.new_node(NodeKind::Block, location);

        let condition = match (operator, operands.as_slice()) {
            (ConditionalOp::Hook, &[condition, then_value, else_value]) => {
                let then_statement =
                    result_statement(ast, then_value, need_result, &temp_name, location);
                ast.add_child_to_front(then_block, then_statement);

                let else_statement =
                    result_statement(ast, else_value, need_result, &temp_name, location);
                ast.add_child_to_front(else_block, else_statement);

                condition
            }

            (ConditionalOp::And, &[left, right]) => {
                let right_statement = result_statement(ast, right, need_result, &temp_name, location);
                ast.add_child_to_front(then_block, right_statement);

                result_expression(ast, left, need_result, &temp_name, location)
            }

            (ConditionalOp::Or, &[left, right]) => {
                let right_statement = result_statement(ast, right, need_result, &temp_name, location);
                ast.add_child_to_front(else_block, right_statement);

                result_expression(ast, left, need_result, &temp_name, location)
            }

            _ => {
                return_compiler_error!(ast.error_location(expression) =>
                    "Conditional {} has {} operands",
                    ast.kind(expression).describe(),
                    operands.len();
                    {
                        ViolatedInvariant => "node kinds have a fixed number of children",
                    }
                );
            }
        };

        let if_statement = if ast.has_children(else_block) {
            ast.new_node_with_children(NodeKind::If, location, &[condition, then_block, else_block])
        } else {
            ast.new_node_with_children(NodeKind::If, location, &[condition, then_block])
        };

        if need_result {
            let declarator = ast.new_name(&temp_name, location);
            let declaration = ast.new_node_with_children(NodeKind::Var, location, &[declarator]);
            ast.add_child_before(declaration, injection_point)?;
            ast.add_child_after(if_statement, declaration)?;

            let replacement = ast.new_name(&temp_name, location);
            ast.replace_child(expression, replacement)?;
        } else {
            ast.replace_child(parent, if_statement)?;
        }

        decompose_log!(Dark Magenta "Conditional became: ", ast.node_to_source(if_statement));

        Ok(if_statement)
    }
}

/// Either the value itself, or an assignment of it to the result temporary
fn result_expression(
    ast: &mut Ast,
    value: NodeId,
    need_result: bool,
    temp_name: &str,
    location: TextLocation,
) -> NodeId {
    if !need_result {
        return value;
    }

    let target = ast.new_name(temp_name, location);
    ast.new_node_with_children(NodeKind::Assign, location, &[target, value])
}

fn result_statement(
    ast: &mut Ast,
    value: NodeId,
    need_result: bool,
    temp_name: &str,
    location: TextLocation,
) -> NodeId {
    let expression = result_expression(ast, value, need_result, temp_name, location);
    ast.new_node_with_children(NodeKind::ExprResult, location, &[expression])
}
