use super::{parse, printed, try_parse};
use crate::compiler_frontend::ast::ast_nodes::NodeKind;
use crate::compiler_frontend::ast::parse_script::is_constant_case;
use crate::compiler_frontend::compiler_errors::ErrorType;

#[test]
fn var_statements_are_split_per_declarator() {
    let ast = parse("var a = 1, b, c = a;");

    let statements = ast.children(ast.root);
    assert_eq!(statements.len(), 3);
    for statement in statements {
        assert_eq!(ast.kind(*statement), &NodeKind::Var);
        assert_eq!(ast.children(*statement).len(), 1);
    }

    assert_eq!(ast.to_source(), "var a = 1; var b; var c = a;");
}

#[test]
fn for_initializer_declarations_stay_together() {
    let ast = parse("for (var i = 0, j = 1; i < j; i++) {}");

    let for_loop = ast.children(ast.root)[0];
    assert_eq!(ast.kind(for_loop), &NodeKind::For);

    let initializer = ast.children(for_loop)[0];
    assert_eq!(ast.kind(initializer), &NodeKind::Var);
    assert_eq!(ast.children(initializer).len(), 2);
}

#[test]
fn missing_for_header_parts_become_empty_nodes() {
    let ast = parse("for (;;) { break; }");

    let for_loop = ast.children(ast.root)[0];
    let children = ast.children(for_loop);
    assert_eq!(children.len(), 4);
    for part in &children[..3] {
        assert_eq!(ast.kind(*part), &NodeKind::Empty);
    }
    assert_eq!(ast.kind(children[3]), &NodeKind::Block);
}

#[test]
fn control_flow_bodies_are_always_blocks() {
    assert_eq!(
        printed("if (a) b(); else c();"),
        "if (a) { b(); } else { c(); }"
    );
    assert_eq!(printed("while (a) b();"), "while (a) { b(); }");
    assert_eq!(printed("do a(); while (b);"), "do { a(); } while (b);");
}

#[test]
fn split_declarations_under_a_label_are_wrapped_in_a_block() {
    let ast = parse("outer: var a = 1, b = 2;");

    let label = ast.children(ast.root)[0];
    assert_eq!(ast.kind(label), &NodeKind::Label(String::from("outer")));

    let body = ast.children(label)[0];
    assert_eq!(ast.kind(body), &NodeKind::Block);
    assert_eq!(ast.children(body).len(), 2);
}

#[test]
fn switch_clauses_keep_their_bodies() {
    let ast = parse("switch (x) { case 1: a(); break; default: b(); }");

    let switch = ast.children(ast.root)[0];
    let children = ast.children(switch);
    assert_eq!(children.len(), 3);
    assert_eq!(ast.kind(children[1]), &NodeKind::Case);
    assert_eq!(ast.kind(children[2]), &NodeKind::Default);

    let case_body = ast.children(children[1])[1];
    assert_eq!(ast.children(case_body).len(), 2);
}

#[test]
fn statements_can_end_without_a_semicolon_before_a_closing_curly() {
    assert_eq!(printed("function f() { return 1 }"), "function f() { return 1; }");
    assert_eq!(printed("x = 1"), "x = 1;");
}

#[test]
fn member_chains_and_calls_nest_left_to_right() {
    let ast = parse("a.b[c](d).e;");

    let statement = ast.children(ast.root)[0];
    let expression = ast.children(statement)[0];
    assert_eq!(ast.kind(expression), &NodeKind::GetProp(String::from("e")));

    let call = ast.children(expression)[0];
    assert_eq!(ast.kind(call), &NodeKind::Call);
    assert_eq!(ast.children(call).len(), 2);

    let callee = ast.children(call)[0];
    assert_eq!(ast.kind(callee), &NodeKind::GetElem);
}

#[test]
fn keywords_are_allowed_as_property_names() {
    assert_eq!(printed("x.default = y.new;"), "x.default = y.new;");
}

#[test]
fn assignments_are_right_associative() {
    let ast = parse("a = b += c;");

    let statement = ast.children(ast.root)[0];
    let outer = ast.children(statement)[0];
    assert_eq!(ast.kind(outer), &NodeKind::Assign);

    let inner = ast.children(outer)[1];
    assert!(matches!(ast.kind(inner), NodeKind::AssignOp(_)));
}

#[test]
fn constant_case_names_are_flagged() {
    let ast = parse("var MAX_SIZE = 10; x = MAX_SIZE + size;");

    let names = ast
        .preorder(ast.root)
        .into_iter()
        .filter_map(|node| ast.name_of(node).map(|name| (name.to_owned(), ast.is_constant_name(node))))
        .collect::<Vec<_>>();

    assert_eq!(
        names,
        vec![
            (String::from("MAX_SIZE"), true),
            (String::from("x"), false),
            (String::from("MAX_SIZE"), true),
            (String::from("size"), false),
        ]
    );
}

#[test]
fn constant_case_needs_more_than_one_character_and_an_uppercase_letter() {
    assert!(is_constant_case("MAX"));
    assert!(is_constant_case("A1"));
    assert!(is_constant_case("$DEBUG_MODE"));

    assert!(!is_constant_case("A"));
    assert!(!is_constant_case("__"));
    assert!(!is_constant_case("Max"));
    assert!(!is_constant_case("1ABC"));
    assert!(!is_constant_case(""));
}

#[test]
fn assigning_to_a_literal_is_a_syntax_error() {
    let error = try_parse("1 = x;").expect_err("literal target should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
    assert!(error.msg.contains("assign to"));
}

#[test]
fn incrementing_a_call_is_a_syntax_error() {
    let error = try_parse("f()++;").expect_err("call target should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
}

#[test]
fn missing_expressions_report_the_line() {
    let error = try_parse("a();\nx = ;").expect_err("missing value should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
    assert_eq!(error.location.start_pos.line_number, 2);
}

#[test]
fn unterminated_blocks_are_rejected() {
    let error = try_parse("if (a) { b();").expect_err("missing curly should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
}
