//! The role a node plays when the decomposer walks up through it.
//!
//! Every node kind maps to exactly one role, so adding a node kind
//! forces a decision here instead of silently falling into a default branch.

use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{BinaryOperator, NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AncestorRole {
    /// A statement whose first child holds the whole expression
    Root(StatementRoot),

    /// A node with no statement boundary to inject before.
    /// Reaching one of these means the expression can't be decomposed.
    Boundary,

    /// Only the first operand is always evaluated
    Conditional(ConditionalOp),

    Assignment(AssignmentForm),

    Call(CallForm),

    /// Children evaluate left to right and all of them always run
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementRoot {
    ExprResult,
    If,
    Switch,
    Return,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConditionalOp {
    Hook,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssignTarget {
    Name,
    Property,
    Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AssignmentForm {
    pub target: AssignTarget,

    /// Set for compound assignments (`+=` and friends), which read the target before evaluating the value
    pub compound: Option<BinaryOperator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallForm {
    /// The callee is a property or element access, so the call binds `this`
    Method,
    Plain,
}

pub(crate) fn ancestor_role(ast: &Ast, id: NodeId) -> AncestorRole {
    match ast.kind(id) {
        NodeKind::ExprResult => AncestorRole::Root(StatementRoot::ExprResult),
        NodeKind::If => AncestorRole::Root(StatementRoot::If),
        NodeKind::Switch => AncestorRole::Root(StatementRoot::Switch),
        NodeKind::Return => AncestorRole::Root(StatementRoot::Return),

        // A var inside a for loop header has no statement list to inject into
        NodeKind::Var => match ast.parent(id) {
            Some(parent)
                if ast.is_statement_block(parent)
                    || matches!(ast.kind(parent), NodeKind::Label(_)) =>
            {
                AncestorRole::Root(StatementRoot::Var)
            }
            _ => AncestorRole::Passthrough,
        },

        NodeKind::Script
        | NodeKind::Block
        | NodeKind::Label(_)
        | NodeKind::Case
        | NodeKind::Default
        | NodeKind::While
        | NodeKind::DoWhile
        | NodeKind::For
        | NodeKind::Throw
        | NodeKind::Break(_)
        | NodeKind::Continue(_)
        | NodeKind::Empty => AncestorRole::Boundary,

        NodeKind::Hook => AncestorRole::Conditional(ConditionalOp::Hook),
        NodeKind::And => AncestorRole::Conditional(ConditionalOp::And),
        NodeKind::Or => AncestorRole::Conditional(ConditionalOp::Or),

        NodeKind::Assign => match assign_target(ast, id) {
            Some(target) => AncestorRole::Assignment(AssignmentForm {
                target,
                compound: None,
            }),
            None => AncestorRole::Passthrough,
        },

        NodeKind::AssignOp(operator) => match assign_target(ast, id) {
            Some(target) => AncestorRole::Assignment(AssignmentForm {
                target,
                compound: Some(*operator),
            }),
            None => AncestorRole::Passthrough,
        },

        NodeKind::Call => match ast.first_child(id) {
            Some(callee) if ast.is_get(callee) => AncestorRole::Call(CallForm::Method),
            _ => AncestorRole::Call(CallForm::Plain),
        },

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
        | NodeKind::Function { .. }
        | NodeKind::New
        | NodeKind::GetProp(_)
        | NodeKind::GetElem
        | NodeKind::Binary(_)
        | NodeKind::Unary(_)
        | NodeKind::Increment { .. }
        | NodeKind::Comma => AncestorRole::Passthrough,
    }
}

fn assign_target(ast: &Ast, assignment: NodeId) -> Option<AssignTarget> {
    match ast.kind(ast.first_child(assignment)?) {
        NodeKind::Name(_) => Some(AssignTarget::Name),
        NodeKind::GetProp(_) => Some(AssignTarget::Property),
        NodeKind::GetElem => Some(AssignTarget::Element),
        _ => None,
    }
}
