use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::expression_decomposer::node_roles::{
    AncestorRole, ancestor_role,
};
use crate::return_compiler_error;

/// Finds the statement that holds the whole expression.
///
/// Ok(None) means a boundary (block, label, case, loop ...) came first,
/// so there is nowhere to put extracted code and the expression is undecomposable.
pub fn find_expression_root(ast: &Ast, node: NodeId) -> Result<Option<NodeId>, CompilerError> {
    let mut child = node;

    for parent in ast.ancestors(node) {
        match ancestor_role(ast, parent) {
            AncestorRole::Root(_) => {
                if ast.first_child(parent) != Some(child) {
                    return_compiler_error!(ast.error_location(node) =>
                        "Expression is nested in the {} but not through its first child",
                        ast.kind(parent).describe();
                        {
                            ViolatedInvariant => "the path to an expression root runs through the root's first child",
                            NodeKind => ast.kind(parent).describe(),
                        }
                    );
                }

                return Ok(Some(parent));
            }

            AncestorRole::Boundary => return Ok(None),

            AncestorRole::Conditional(_)
            | AncestorRole::Assignment(_)
            | AncestorRole::Call(_)
            | AncestorRole::Passthrough => {}
        }

        child = parent;
    }

    return_compiler_error!(ast.error_location(node) =>
        "{} ({}) is not attached to a script",
        node,
        ast.kind(node).describe();
        {
            ViolatedInvariant => "decomposed expressions must be reachable from the tree root",
        }
    )
}

/// The statement new declarations are inserted before.
/// Same as the expression root, except that labels wrapping the root are stepped over.
pub fn find_injection_point(ast: &Ast, node: NodeId) -> Result<NodeId, CompilerError> {
    let Some(root) = find_expression_root(ast, node)? else {
        return_compiler_error!(ast.error_location(node) =>
            "{} has no expression root to inject before",
            ast.kind(node).describe();
            {
                ViolatedInvariant => "only decomposable expressions have an injection point",
                PrimarySuggestion => "Classify the expression before rewriting it",
            }
        );
    };

    let mut injection_point = root;
    while let Some(parent) = ast.parent(injection_point) {
        if !matches!(ast.kind(parent), NodeKind::Label(_)) {
            break;
        }
        injection_point = parent;
    }

    match ast.parent(injection_point) {
        Some(parent) if ast.is_statement_block(parent) => Ok(injection_point),
        _ => {
            return_compiler_error!(ast.error_location(injection_point) =>
                "The {} that would receive extracted code is not inside a statement list",
                ast.kind(injection_point).describe();
                {
                    ViolatedInvariant => "injection points sit directly in a block or script",
                }
            )
        }
    }
}

/// The outermost conditional (`?:`, `&&`, `||`) that holds the expression in one of its
/// conditionally evaluated operands, or the expression itself if there is none.
pub(crate) fn find_nonconditional_parent(ast: &Ast, node: NodeId, root: NodeId) -> NodeId {
    let mut result = node;
    let mut child = node;

    for parent in ast.ancestors(node) {
        if parent == root {
            break;
        }

        if matches!(ancestor_role(ast, parent), AncestorRole::Conditional(_))
            && ast.first_child(parent) != Some(child)
        {
            result = parent;
        }

        child = parent;
    }

    result
}
