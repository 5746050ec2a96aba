use super::parse;
use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::tokenizer::tokens::TextLocation;

fn statement(ast: &Ast, index: usize) -> NodeId {
    ast.children(ast.root)[index]
}

/// The expression of an expression statement
fn expression(ast: &Ast, index: usize) -> NodeId {
    ast.children(statement(ast, index))[0]
}

#[test]
fn new_trees_hold_an_empty_script() {
    let ast = Ast::new();
    assert_eq!(ast.kind(ast.root), &NodeKind::Script);
    assert!(ast.is_empty());
    assert_eq!(ast.to_source(), "");
}

#[test]
fn preorder_visits_parents_before_children_left_to_right() {
    let ast = parse("f(a, b + c);");

    let order = ast
        .preorder(expression(&ast, 0))
        .into_iter()
        .map(|node| ast.kind(node).describe())
        .collect::<Vec<_>>();

    assert_eq!(
        order,
        vec!["call", "name", "name", "binary operation", "name", "name"]
    );
}

#[test]
fn ancestors_walk_up_to_the_root() {
    let ast = parse("x = a + b;");
    let sum = ast.children(expression(&ast, 0))[1];
    let b = ast.children(sum)[1];

    let kinds = ast
        .ancestors(b)
        .map(|node| ast.kind(node).describe())
        .collect::<Vec<_>>();

    assert_eq!(
        kinds,
        vec!["binary operation", "assignment", "expression statement", "script"]
    );
    assert!(ast.is_descendant_or_self(b, ast.root));
    assert!(ast.is_descendant_or_self(sum, sum));
}

#[test]
fn siblings_are_inserted_around_an_existing_node() {
    let mut ast = parse("b();");
    let existing = statement(&ast, 0);
    let location = TextLocation::default();

    let before = ast.new_name("a", location);
    let before = ast.new_node_with_children(NodeKind::ExprResult, location, &[before]);
    ast.add_child_before(before, existing).expect("existing is attached");

    let after = ast.new_name("c", location);
    let after = ast.new_node_with_children(NodeKind::ExprResult, location, &[after]);
    ast.add_child_after(after, existing).expect("existing is attached");

    assert_eq!(ast.to_source(), "a; b(); c;");
    assert_eq!(ast.next_sibling(existing), Some(after));
    ast.check_tree_invariants().expect("tree stays well formed");
}

#[test]
fn replacing_a_child_detaches_the_old_one() {
    let mut ast = parse("x = f();");
    let call = ast.children(expression(&ast, 0))[1];

    let replacement = ast.new_name("t", ast.location(call));
    ast.replace_child(call, replacement).expect("call is attached");

    assert_eq!(ast.to_source(), "x = t;");
    assert_eq!(ast.parent(call), None);
    assert!(!ast.is_descendant_or_self(call, ast.root));

    // The orphan keeps its own subtree
    assert_eq!(ast.node_to_source(call), "f()");
    ast.check_tree_invariants().expect("tree stays well formed");
}

#[test]
fn detached_nodes_can_be_moved_elsewhere() {
    let mut ast = parse("a(); b();");
    let first = statement(&ast, 0);

    ast.detach(first).expect("first is attached");
    ast.add_child_to_back(ast.root, first);

    assert_eq!(ast.to_source(), "b(); a();");
    ast.check_tree_invariants().expect("tree stays well formed");
}

#[test]
fn detaching_children_returns_them_in_order() {
    let mut ast = parse("f(a, b);");
    let call = expression(&ast, 0);

    let children = ast.detach_children(call);
    assert_eq!(children.len(), 3);
    assert!(!ast.has_children(call));
    for child in &children {
        assert_eq!(ast.parent(*child), None);
    }

    let names = children
        .iter()
        .filter_map(|child| ast.name_of(*child))
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["f", "a", "b"]);
}

#[test]
fn clone_subtree_is_a_detached_deep_copy() {
    let mut ast = parse("x = MAX + g(y);");
    let value = ast.children(expression(&ast, 0))[1];
    let nodes_before = ast.len();

    let copy = ast.clone_subtree(value);

    assert_ne!(copy, value);
    assert_eq!(ast.parent(copy), None);
    assert_eq!(ast.node_to_source(copy), "MAX + g(y)");
    assert_eq!(ast.len(), nodes_before + 5);

    // Constant flags come along with the names
    let max_copy = ast.children(copy)[0];
    assert!(ast.is_constant_name(max_copy));

    // Changing the copy leaves the original alone
    let g_call = ast.children(copy)[1];
    let replacement = ast.new_name("z", TextLocation::default());
    ast.replace_child(g_call, replacement).expect("copy child is attached");
    assert_eq!(ast.node_to_source(copy), "MAX + z");
    assert_eq!(ast.to_source(), "x = MAX + g(y);");
}

#[test]
fn mutating_a_detached_node_is_a_compiler_error() {
    let mut ast = parse("a();");
    let orphan = ast.new_name("b", TextLocation::default());
    let other = ast.new_name("c", TextLocation::default());

    let error = ast
        .add_child_before(other, orphan)
        .expect_err("orphan has no parent to insert into");
    assert_eq!(error.error_type, ErrorType::Compiler);
    assert!(error.metadata.contains_key(&ErrorMetaDataKey::ViolatedInvariant));

    let error = ast.detach(ast.root).expect_err("root has no parent");
    assert_eq!(error.error_type, ErrorType::Compiler);
}

#[test]
fn invariants_hold_through_a_series_of_moves() {
    let mut ast = parse("if (a) { b(); } c(d);");
    let if_statement = statement(&ast, 0);
    let call = expression(&ast, 1);
    let argument = ast.children(call)[1];

    // d(); becomes the first statement of the if block
    ast.detach(argument).expect("argument is attached");
    let location = ast.location(argument);
    let moved = ast.new_node_with_children(NodeKind::Call, location, &[argument]);
    let moved = ast.new_node_with_children(NodeKind::ExprResult, location, &[moved]);
    let block = ast.children(if_statement)[1];
    ast.add_child_to_front(block, moved);

    let copy = ast.clone_subtree(if_statement);
    ast.add_child_to_back(ast.root, copy);

    assert_eq!(ast.to_source(), "if (a) { d(); b(); } c(); if (a) { d(); b(); }");
    ast.check_tree_invariants().expect("tree stays well formed");
}

#[test]
fn front_back_and_detach_keep_parent_links() {
    let mut ast = parse("b(); c();");
    let first = statement(&ast, 0);
    let second = statement(&ast, 1);

    ast.detach(second).expect("second is attached");
    ast.add_child_to_front(ast.root, second);
    assert_eq!(ast.to_source(), "c(); b();");
    ast.check_tree_invariants().expect("tree stays well formed");

    let children = ast.detach_children(ast.root);
    assert_eq!(children, vec![second, first]);
    for child in children {
        ast.add_child_to_back(ast.root, child);
    }

    assert_eq!(ast.to_source(), "c(); b();");
    assert_eq!(ast.parent(first), Some(ast.root));
    ast.check_tree_invariants().expect("tree stays well formed");
}
