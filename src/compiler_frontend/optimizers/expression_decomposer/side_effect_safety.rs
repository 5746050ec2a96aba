use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::ast::node_util::{is_constant_name, may_have_side_effects};
use crate::compiler_frontend::optimizers::expression_decomposer::ExpressionDecomposer;
use crate::compiler_frontend::optimizers::expression_decomposer::node_roles::{
    AncestorRole, AssignTarget, AssignmentForm, ancestor_role,
};

impl ExpressionDecomposer<'_> {
    /// Whether `node` can't be reordered past the expression being moved.
    ///
    /// Once a side effect may have happened, anything that reads state is unsafe.
    /// Before that, only nodes that write state are.
    pub(crate) fn is_expression_tree_unsafe(
        &self,
        ast: &Ast,
        node: NodeId,
        side_effects_present: bool,
    ) -> bool {
        if side_effects_present {
            self.can_be_side_effected(ast, node)
        } else {
            may_have_side_effects(ast, node)
        }
    }

    /// Whether the value of a subtree could be changed by a side effect.
    /// Calls are never assumed to be pure. Names are safe only when known to be constant.
    pub(crate) fn can_be_side_effected(&self, ast: &Ast, node: NodeId) -> bool {
        ast.preorder(node).into_iter().any(|id| match ast.kind(id) {
            NodeKind::Call | NodeKind::New => true,
            NodeKind::Name(name) => {
                !is_constant_name(ast, id) && !self.known_constants.contains(name.as_str())
            }
            _ => false,
        })
    }

    /// The read of a compound assignment target (`t` in `t += v`), which happens before `v` runs.
    /// Property reads can't be told apart from getters or aliased writes,
    /// so they are unsafe as soon as a side effect is in play.
    pub(crate) fn is_compound_read_unsafe(
        &self,
        ast: &Ast,
        form: AssignmentForm,
        target: NodeId,
        side_effects_present: bool,
    ) -> bool {
        match form.target {
            AssignTarget::Name => self.is_expression_tree_unsafe(ast, target, side_effects_present),
            AssignTarget::Property | AssignTarget::Element => {
                side_effects_present || may_have_side_effects(ast, target)
            }
        }
    }

    /// Walks from the expression to its root and checks that everything evaluated before it
    /// on the way is safe to reorder.
    pub(crate) fn is_subexpression_movable(&self, ast: &Ast, root: NodeId, expression: NodeId) -> bool {
        let expression_has_side_effects = may_have_side_effects(ast, expression);
        let mut child = expression;

        for parent in ast.ancestors(expression) {
            if parent == root {
                return true;
            }

            let blocked = match ancestor_role(ast, parent) {
                // Operands after the first only run sometimes
                AncestorRole::Conditional(_) => ast.first_child(parent) != Some(child),

                // Resolving a plain name target can't be observed by the value
                AncestorRole::Assignment(AssignmentForm {
                    target: AssignTarget::Name,
                    compound: None,
                }) => false,

                AncestorRole::Assignment(form) if form.compound.is_some() => {
                    match ast.first_child(parent) {
                        Some(target) if target != child => self.is_compound_read_unsafe(
                            ast,
                            form,
                            target,
                            expression_has_side_effects,
                        ),
                        _ => false,
                    }
                }

                AncestorRole::Assignment(_)
                | AncestorRole::Call(_)
                | AncestorRole::Passthrough
                | AncestorRole::Root(_)
                | AncestorRole::Boundary => {
                    self.has_unsafe_preceding_sibling(ast, parent, child, expression_has_side_effects)
                }
            };

            if blocked {
                return false;
            }

            child = parent;
        }

        // The root is always an ancestor once it has been found
        false
    }

    fn has_unsafe_preceding_sibling(
        &self,
        ast: &Ast,
        parent: NodeId,
        child: NodeId,
        side_effects_present: bool,
    ) -> bool {
        ast.children(parent)
            .iter()
            .take_while(|sibling| **sibling != child)
            .any(|sibling| self.is_expression_tree_unsafe(ast, *sibling, side_effects_present))
    }
}
