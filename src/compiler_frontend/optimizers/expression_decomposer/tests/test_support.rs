#![cfg(test)]

use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::ast::parse_script::parse_script;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::compiler_pass::{ChangeTracker, UniqueNameIdSupplier};
use crate::compiler_frontend::optimizers::expression_decomposer::{
    DecompositionType, ExpressionDecomposer,
};
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use rustc_hash::FxHashSet;
use std::path::Path;

/// Short prefix so expected sources stay readable
pub(crate) const TEST_PREFIX: &str = "t_";

pub(crate) fn parse(source: &str) -> Ast {
    let tokens = tokenize(source, Path::new("test.js")).expect("source should tokenize");
    parse_script(&tokens).expect("source should parse")
}

/// The source as the printer renders it, so expected and actual can be compared as text
pub(crate) fn normalized(source: &str) -> String {
    parse(source).to_source()
}

/// The nth call (in source order) whose callee is the given name
pub(crate) fn find_call(ast: &Ast, callee: &str, occurrence: usize) -> NodeId {
    ast.preorder(ast.root)
        .into_iter()
        .filter(|node| matches!(ast.kind(*node), NodeKind::Call))
        .filter(|call| {
            ast.first_child(*call)
                .and_then(|first| ast.name_of(first))
                .is_some_and(|name| name == callee)
        })
        .nth(occurrence)
        .unwrap_or_else(|| panic!("no call number {occurrence} to '{callee}'"))
}

/// Owns everything a decomposer borrows, so tests can build one in a line
#[derive(Default)]
pub(crate) struct Harness {
    pub changes: ChangeTracker,
    pub id_supplier: UniqueNameIdSupplier,
    pub known_constants: FxHashSet<String>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn decomposer(&mut self) -> ExpressionDecomposer<'_> {
        let mut decomposer = ExpressionDecomposer::new(
            &mut self.changes,
            &mut self.id_supplier,
            &mut self.known_constants,
        );
        decomposer.set_temp_name_prefix(TEST_PREFIX);
        decomposer
    }
}

pub(crate) fn classify_call(source: &str, callee: &str) -> DecompositionType {
    let ast = parse(source);
    let call = find_call(&ast, callee, 0);
    let mut harness = Harness::new();
    harness
        .decomposer()
        .classify(&ast, call)
        .expect("classification should succeed")
}

/// Decomposes the first call to `callee` until it is movable and returns the printed tree
pub(crate) fn decompose_call(source: &str, callee: &str) -> String {
    let mut ast = parse(source);
    let call = find_call(&ast, callee, 0);
    let mut harness = Harness::new();
    harness
        .decomposer()
        .decompose_until_movable(&mut ast, call)
        .expect("decomposition should succeed");

    ast.check_tree_invariants()
        .expect("tree should stay well formed");
    assert_eq!(
        harness.decomposer().classify(&ast, call).expect("classify"),
        DecompositionType::Movable
    );

    ast.to_source()
}

pub(crate) fn assert_decomposes_to(source: &str, callee: &str, expected: &str) {
    assert_eq!(decompose_call(source, callee), normalized(expected), "decomposing {source}");
}

pub(crate) fn decompose_error(source: &str, callee: &str) -> CompilerError {
    let mut ast = parse(source);
    let call = find_call(&ast, callee, 0);
    let mut harness = Harness::new();
    harness
        .decomposer()
        .decompose_until_movable(&mut ast, call)
        .expect_err("decomposition should fail")
}
