use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::expression_decomposer::ExpressionDecomposer;
use crate::compiler_frontend::optimizers::expression_decomposer::extraction::{
    DecompositionState, first_child_of,
};
use crate::{decompose_log, return_compiler_error};

const EXPLICIT_RECEIVER_METHOD: &str = "call";

impl ExpressionDecomposer<'_> {
    /// Hoists the callee of `receiver.method(args)` without losing `this`:
    ///
    /// ```text
    /// var recv = receiver;
    /// var fn = recv.method;
    /// fn.call(recv, args);
    /// ```
    ///
    /// Returns the new call, which has replaced the old one.
    pub(crate) fn rewrite_call_expression(
        &mut self,
        ast: &mut Ast,
        call: NodeId,
        state: &mut DecompositionState,
    ) -> Result<NodeId, CompilerError> {
        let callee = first_child_of(ast, call)?;
        if !matches!(ast.kind(call), NodeKind::Call) || !ast.is_get(callee) {
            return_compiler_error!(ast.error_location(call) =>
                "Only calls through a property or element access can be rewritten, found a {} calling a {}",
                ast.kind(call).describe(),
                ast.kind(callee).describe();
                {
                    ViolatedInvariant => "method call rewrites need a property or element access callee",
                    NodeKind => ast.kind(callee).describe(),
                }
            );
        }

        let function_declaration = self.extract_expression(ast, callee, state.extract_before)?;
        state.extract_before = function_declaration;

        // var fn = receiver.method -> the get is the declarator's initializer
        let function_declarator = first_child_of(ast, function_declaration)?;
        let get = first_child_of(ast, function_declarator)?;
        let receiver = first_child_of(ast, get)?;

        let receiver_declaration = self.extract_expression(ast, receiver, state.extract_before)?;
        state.extract_before = receiver_declaration;
        let receiver_declarator = first_child_of(ast, receiver_declaration)?;

        let function_name = ast.name_of(function_declarator).unwrap_or_default().to_owned();
        let receiver_name = ast.name_of(receiver_declarator).unwrap_or_default().to_owned();

        let location = ast.location(call);
        let function_reference = ast.new_name(&function_name, location);
        let explicit_receiver_callee = ast.new_node_with_children(
            NodeKind::GetProp(String::from(EXPLICIT_RECEIVER_METHOD)),
            location,
            &[function_reference],
        );
        let receiver_reference = ast.new_name(&receiver_name, location);
        let new_call = ast.new_node_with_children(
            NodeKind::Call,
            location,
            &[explicit_receiver_callee, receiver_reference],
        );

        // Skip the old callee, which is now just the function temporary
        let arguments = ast.detach_children(call);
        for argument in arguments.into_iter().skip(1) {
            ast.add_child_to_back(new_call, argument);
        }

        ast.replace_child(call, new_call)?;

        decompose_log!(Dark Magenta "Rewrote method call: ", ast.node_to_source(new_call));

        Ok(new_call)
    }
}
