//! ============================================================
//!                    Expression Decomposer
//! ============================================================
//! Moves a sub-expression out of the statement it sits in, into its own
//! declaration right above that statement, without changing what the program does.
//!
//! Passes that want a call (or any expression) to stand alone as a statement ask
//! `classify` first:
//!  - Movable: it can be hoisted as-is with `relocate`
//!  - Decomposable: `decompose_until_movable` rewrites the statement until it is movable
//!  - Undecomposable: there is no statement to hoist it in front of (loop tests, case labels ...)
//!
//! Rewriting hoists everything that is evaluated before the expression and could
//! interfere with it into constant temporaries, turns conditionals the expression sits under
//! into if statements, and splits method calls so their receiver survives being hoisted.

use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::compiler_pass::{CodeChangeHandler, NameIdSupplier};
use crate::projects::settings::DEFAULT_TEMP_NAME_PREFIX;
use crate::{decompose_log, return_compiler_error};
use rustc_hash::FxHashSet;

mod call_rewrite;
mod conditional_extraction;
mod expression_root;
mod extraction;
mod node_roles;
mod side_effect_safety;
mod temp_names;

pub use expression_root::{find_expression_root, find_injection_point};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum DecompositionType {
    Undecomposable,
    Movable,
    Decomposable,
}

pub struct ExpressionDecomposer<'a> {
    change_handler: &'a mut dyn CodeChangeHandler,
    id_supplier: &'a mut dyn NameIdSupplier,

    /// Names known to be assigned once and never changed.
    /// Shared with the calling pass, which owns it for the lifetime of the pass.
    known_constants: &'a mut FxHashSet<String>,

    temp_name_prefix: String,
}

impl<'a> ExpressionDecomposer<'a> {
    pub fn new(
        change_handler: &'a mut dyn CodeChangeHandler,
        id_supplier: &'a mut dyn NameIdSupplier,
        known_constants: &'a mut FxHashSet<String>,
    ) -> Self {
        Self {
            change_handler,
            id_supplier,
            known_constants,
            temp_name_prefix: String::from(DEFAULT_TEMP_NAME_PREFIX),
        }
    }

    pub fn set_temp_name_prefix(&mut self, prefix: impl Into<String>) {
        self.temp_name_prefix = prefix.into();
    }

    pub fn temp_name_prefix(&self) -> &str {
        &self.temp_name_prefix
    }

    pub fn known_constants(&self) -> &FxHashSet<String> {
        self.known_constants
    }

    pub fn classify(&self, ast: &Ast, expression: NodeId) -> Result<DecompositionType, CompilerError> {
        let Some(root) = find_expression_root(ast, expression)? else {
            return Ok(DecompositionType::Undecomposable);
        };

        if self.is_subexpression_movable(ast, root, expression) {
            Ok(DecompositionType::Movable)
        } else {
            Ok(DecompositionType::Decomposable)
        }
    }

    /// Rewrites the enclosing statement until the expression is movable.
    /// Only call this on expressions that classify as movable or decomposable.
    pub fn decompose_until_movable(
        &mut self,
        ast: &mut Ast,
        expression: NodeId,
    ) -> Result<(), CompilerError> {
        // Every pass removes at least one unsafe sibling or conditional from the path to the root,
        // so this is only exceeded when a pass stops making progress
        let mut remaining_passes = match find_expression_root(ast, expression)? {
            Some(root) => ast.preorder(root).len() * 2 + 1,
            None => 0,
        };

        loop {
            match self.classify(ast, expression)? {
                DecompositionType::Movable => return Ok(()),

                DecompositionType::Decomposable if remaining_passes > 0 => {
                    remaining_passes -= 1;
                    self.expose_once(ast, expression)?;
                }

                DecompositionType::Decomposable => {
                    return_compiler_error!(ast.error_location(expression) =>
                        "Decomposing the {} stopped making progress",
                        ast.kind(expression).describe();
                        {
                            ViolatedInvariant => "each exposure pass moves the expression closer to movable",
                        }
                    );
                }

                DecompositionType::Undecomposable => {
                    return_compiler_error!(ast.error_location(expression) =>
                        "Asked to decompose a {} that has no statement to be hoisted in front of",
                        ast.kind(expression).describe();
                        {
                            ViolatedInvariant => "only decomposable expressions are decomposed",
                            PrimarySuggestion => "Check classify() before decomposing",
                        }
                    );
                }
            }
        }
    }

    /// Exactly one rewrite pass. The expression may still not be movable afterwards.
    pub fn expose_once(&mut self, ast: &mut Ast, expression: NodeId) -> Result<(), CompilerError> {
        let Some(root) = find_expression_root(ast, expression)? else {
            return_compiler_error!(ast.error_location(expression) =>
                "Can't expose a {} that has no expression root",
                ast.kind(expression).describe();
                {
                    ViolatedInvariant => "only decomposable expressions are exposed",
                    PrimarySuggestion => "Check classify() before exposing",
                }
            );
        };

        decompose_log!(Dark Magenta "Exposing ", ast.node_to_source(expression), " in ", ast.node_to_source(root));

        self.expose_expression(ast, root, expression)?;
        self.change_handler.report_code_change();

        Ok(())
    }

    /// Hoists a movable expression into a new temporary declared right before its statement,
    /// leaving a reference to the temporary in its place.
    ///
    /// Returns the new declaration.
    pub fn relocate(&mut self, ast: &mut Ast, expression: NodeId) -> Result<NodeId, CompilerError> {
        if self.classify(ast, expression)? != DecompositionType::Movable {
            return_compiler_error!(ast.error_location(expression) =>
                "Can't relocate a {} that isn't movable",
                ast.kind(expression).describe();
                {
                    ViolatedInvariant => "only movable expressions are relocated",
                    PrimarySuggestion => "Run decompose_until_movable() first",
                }
            );
        }

        let injection_point = find_injection_point(ast, expression)?;
        let temp_name = self.temp_value_name();
        let location = ast.location(expression);

        let replacement = ast.new_name(&temp_name, location);
        ast.replace_child(expression, replacement)?;

        let declarator = ast.new_name(&temp_name, location);
        ast.add_child_to_back(declarator, expression);
        let declaration = ast.new_node_with_children(NodeKind::Var, location, &[declarator]);
        ast.add_child_before(declaration, injection_point)?;

        decompose_log!("Relocated into ", temp_name.as_str());

        self.change_handler.report_code_change();
        Ok(declaration)
    }
}
