use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::ast::node_util::may_have_side_effects;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::optimizers::expression_decomposer::ExpressionDecomposer;
use crate::compiler_frontend::optimizers::expression_decomposer::expression_root::{
    find_injection_point, find_nonconditional_parent,
};
use crate::compiler_frontend::optimizers::expression_decomposer::node_roles::{
    AncestorRole, AssignTarget, AssignmentForm, CallForm, ancestor_role,
};
use crate::{decompose_log, return_compiler_error};

/// Threaded through one exposure pass
pub(crate) struct DecompositionState {
    /// Whether something evaluated after the current position may have a side effect
    pub side_effects: bool,

    /// New declarations are inserted immediately before this statement.
    /// Each extraction moves it to the declaration it just inserted,
    /// so extracting right to left leaves the declarations in evaluation order.
    pub extract_before: NodeId,
}

impl ExpressionDecomposer<'_> {
    /// One rewrite pass over the statement holding `expression`.
    /// Callers repeat this until the expression classifies as movable.
    pub(crate) fn expose_expression(
        &mut self,
        ast: &mut Ast,
        root: NodeId,
        expression: NodeId,
    ) -> Result<(), CompilerError> {
        let nonconditional = find_nonconditional_parent(ast, expression, root);
        let injection_point = find_injection_point(ast, nonconditional)?;

        let mut state = DecompositionState {
            side_effects: may_have_side_effects(ast, nonconditional),
            extract_before: injection_point,
        };

        let mut child = nonconditional;
        let mut parent = parent_of(ast, child)?;

        while parent != root {
            match ancestor_role(ast, parent) {
                AncestorRole::Conditional(_) => {
                    if ast.first_child(parent) != Some(child) {
                        return_compiler_error!(ast.error_location(parent) =>
                            "Walked into a conditionally evaluated operand of a {} while exposing an expression",
                            ast.kind(parent).describe();
                            {
                                ViolatedInvariant => "only the first operand of a conditional can be walked through",
                                NodeKind => ast.kind(parent).describe(),
                            }
                        );
                    }
                }

                // The name itself can't observe the value being computed
                AncestorRole::Assignment(AssignmentForm {
                    target: AssignTarget::Name,
                    compound: None,
                }) => {}

                AncestorRole::Assignment(form) => {
                    if form.compound.is_some() {
                        parent =
                            self.expose_compound_assignment(ast, parent, child, form, &mut state)?;
                    } else {
                        self.extract_assignment_target_parts(ast, parent, child, form, &mut state)?;
                    }
                }

                AncestorRole::Call(CallForm::Method) => {
                    let callee = first_child_of(ast, parent)?;

                    // Arguments run after the callee, so there is nothing to hoist from inside it
                    if callee != child {
                        self.extract_preceding_siblings(ast, parent, 1, child, &mut state)?;

                        if self.is_expression_tree_unsafe(ast, callee, state.side_effects) {
                            state.side_effects = true;
                            parent = self.rewrite_call_expression(ast, parent, &mut state)?;
                        }
                    }
                }

                AncestorRole::Call(CallForm::Plain) | AncestorRole::Passthrough => {
                    self.extract_preceding_siblings(ast, parent, 0, child, &mut state)?;
                }

                AncestorRole::Root(_) | AncestorRole::Boundary => {
                    return_compiler_error!(ast.error_location(parent) =>
                        "Reached the {} before the expression root while exposing an expression",
                        ast.kind(parent).describe();
                        {
                            ViolatedInvariant => "the expression root is the nearest statement above the expression",
                            NodeKind => ast.kind(parent).describe(),
                        }
                    );
                }
            }

            child = parent;
            parent = parent_of(ast, child)?;
        }

        if nonconditional != expression {
            let need_result = ast
                .parent(nonconditional)
                .is_none_or(|parent| !matches!(ast.kind(parent), NodeKind::ExprResult));

            self.extract_conditional(ast, nonconditional, injection_point, need_result)?;
        }

        Ok(())
    }

    /// Hoists the unsafe siblings in `parent.children[first_index..]` that come before `child`,
    /// rightmost first.
    fn extract_preceding_siblings(
        &mut self,
        ast: &mut Ast,
        parent: NodeId,
        first_index: usize,
        child: NodeId,
        state: &mut DecompositionState,
    ) -> Result<(), CompilerError> {
        let siblings: Vec<NodeId> = ast
            .children(parent)
            .iter()
            .skip(first_index)
            .take_while(|sibling| **sibling != child)
            .copied()
            .collect();

        for sibling in siblings.into_iter().rev() {
            self.extract_if_unsafe(ast, sibling, state)?;
        }

        Ok(())
    }

    fn extract_if_unsafe(
        &mut self,
        ast: &mut Ast,
        node: NodeId,
        state: &mut DecompositionState,
    ) -> Result<(), CompilerError> {
        if self.is_expression_tree_unsafe(ast, node, state.side_effects) {
            state.side_effects = true;
            state.extract_before = self.extract_expression(ast, node, state.extract_before)?;
        }

        Ok(())
    }

    /// `a.x = value` and `a[k] = value` evaluate `a` (and `k`) before the value,
    /// but those aren't siblings of the value, so they get extracted here.
    fn extract_assignment_target_parts(
        &mut self,
        ast: &mut Ast,
        assignment: NodeId,
        child: NodeId,
        form: AssignmentForm,
        state: &mut DecompositionState,
    ) -> Result<(), CompilerError> {
        let target = first_child_of(ast, assignment)?;
        if target == child {
            return Ok(());
        }

        match form.target {
            AssignTarget::Name => {}

            AssignTarget::Element => {
                if let Some(key) = ast.children(target).get(1).copied() {
                    self.extract_if_unsafe(ast, key, state)?;
                }
                let object = first_child_of(ast, target)?;
                self.extract_if_unsafe(ast, object, state)?;
            }

            AssignTarget::Property => {
                let object = first_child_of(ast, target)?;
                self.extract_if_unsafe(ast, object, state)?;
            }
        }

        Ok(())
    }

    /// `t op= value` reads `t` before evaluating the value.
    /// When that read is unsafe it becomes `var r = t; t = r op value`.
    ///
    /// Returns the node that now sits where the compound assignment was.
    fn expose_compound_assignment(
        &mut self,
        ast: &mut Ast,
        assignment: NodeId,
        child: NodeId,
        form: AssignmentForm,
        state: &mut DecompositionState,
    ) -> Result<NodeId, CompilerError> {
        let target = first_child_of(ast, assignment)?;
        let Some(operator) = form.compound else {
            return Ok(assignment);
        };

        if target == child {
            return Ok(assignment);
        }

        // The read happens after the target's object and key are evaluated
        let before_target = state.extract_before;
        self.extract_assignment_target_parts(ast, assignment, child, form, state)?;

        if !self.is_compound_read_unsafe(ast, form, target, state.side_effects) {
            return Ok(assignment);
        }

        let location = ast.location(assignment);
        let value = ast.detach(child)?;
        let target = ast.detach(target)?;
        let read = ast.clone_subtree(target);

        let combined =
            ast.new_node_with_children(NodeKind::Binary(operator), location, &[read, value]);
        let plain_assignment =
            ast.new_node_with_children(NodeKind::Assign, location, &[target, combined]);
        ast.replace_child(assignment, plain_assignment)?;

        decompose_log!(Dark Magenta "Split compound assignment: ", ast.node_to_source(plain_assignment));

        state.side_effects = true;
        let read_declaration = self.extract_expression(ast, read, before_target)?;
        if state.extract_before == before_target {
            state.extract_before = read_declaration;
        }

        Ok(plain_assignment)
    }

    /// Replaces `expression` with a new constant temporary and declares the temporary,
    /// initialised with the expression, right before `injection_point`.
    ///
    /// Returns the new declaration.
    pub(crate) fn extract_expression(
        &mut self,
        ast: &mut Ast,
        expression: NodeId,
        injection_point: NodeId,
    ) -> Result<NodeId, CompilerError> {
        let temp_name = self.temp_constant_value_name();
        let location = ast.location(expression);

        decompose_log!("Extracting ", ast.node_to_source(expression), " into ", temp_name.as_str());

        let replacement = ast.new_name(&temp_name, location);
        ast.replace_child(expression, replacement)?;

        let declarator = ast.new_name(&temp_name, location);
        ast.add_child_to_back(declarator, expression);
        let declaration = ast.new_node_with_children(NodeKind::Var, location, &[declarator]);
        ast.add_child_before(declaration, injection_point)?;

        Ok(declaration)
    }
}

pub(crate) fn parent_of(ast: &Ast, node: NodeId) -> Result<NodeId, CompilerError> {
    match ast.parent(node) {
        Some(parent) => Ok(parent),
        None => {
            return_compiler_error!(ast.error_location(node) =>
                "{} ({}) lost its parent while being decomposed",
                node,
                ast.kind(node).describe();
                {
                    ViolatedInvariant => "nodes between an expression and its root stay attached",
                }
            )
        }
    }
}

pub(crate) fn first_child_of(ast: &Ast, node: NodeId) -> Result<NodeId, CompilerError> {
    match ast.first_child(node) {
        Some(child) => Ok(child),
        None => {
            return_compiler_error!(ast.error_location(node) =>
                "Expected the {} to have an operand",
                ast.kind(node).describe();
                {
                    ViolatedInvariant => "node kinds have a fixed number of children",
                    NodeKind => ast.kind(node).describe(),
                }
            )
        }
    }
}
