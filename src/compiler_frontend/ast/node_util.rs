use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind, UnaryOperator};

/// Whether evaluating this subtree could change program state.
///
/// Conservative: anything that assigns, calls or throws counts.
/// Function literals only create a value, so their bodies are not inspected.
pub fn may_have_side_effects(ast: &Ast, node: NodeId) -> bool {
    let mut stack = vec![node];

    while let Some(id) = stack.pop() {
        match ast.kind(id) {
            NodeKind::Assign
            | NodeKind::AssignOp(_)
            | NodeKind::Increment { .. }
            | NodeKind::Unary(UnaryOperator::Delete)
            | NodeKind::Call
            | NodeKind::New
            | NodeKind::Throw => return true,

            NodeKind::Function { .. } => continue,

            _ => stack.extend(ast.children(id)),
        }
    }

    false
}

/// Whether a name node refers to a variable that is never reassigned
pub fn is_constant_name(ast: &Ast, node: NodeId) -> bool {
    matches!(ast.kind(node), NodeKind::Name(_)) && ast.is_constant_name(node)
}
