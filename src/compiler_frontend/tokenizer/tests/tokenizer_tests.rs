use crate::compiler_frontend::compiler_errors::ErrorType;
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use crate::compiler_frontend::tokenizer::tokens::TokenKind;
use std::path::Path;

fn token_kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, Path::new("test.js"))
        .expect("tokenization should succeed")
        .tokens
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn tokenizes_declaration_with_call() {
    assert_eq!(
        token_kinds("var x = foo(1, 'a');"),
        vec![
            TokenKind::Var,
            TokenKind::Symbol(String::from("x")),
            TokenKind::Assign,
            TokenKind::Symbol(String::from("foo")),
            TokenKind::OpenParenthesis,
            TokenKind::NumberLiteral(1.0),
            TokenKind::Comma,
            TokenKind::StringLiteral(String::from("a")),
            TokenKind::CloseParenthesis,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        token_kinds("a === b !== c == d != e += f ++ -- && || <= >="),
        vec![
            TokenKind::Symbol(String::from("a")),
            TokenKind::StrictEqual,
            TokenKind::Symbol(String::from("b")),
            TokenKind::StrictNotEqual,
            TokenKind::Symbol(String::from("c")),
            TokenKind::Equal,
            TokenKind::Symbol(String::from("d")),
            TokenKind::NotEqual,
            TokenKind::Symbol(String::from("e")),
            TokenKind::AddAssign,
            TokenKind::Symbol(String::from("f")),
            TokenKind::Increment,
            TokenKind::Decrement,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::LessThanOrEqual,
            TokenKind::GreaterThanOrEqual,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        token_kinds("a // trailing\n/* block\n comment */ b / c"),
        vec![
            TokenKind::Symbol(String::from("a")),
            TokenKind::Symbol(String::from("b")),
            TokenKind::Divide,
            TokenKind::Symbol(String::from("c")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_stop_before_member_access() {
    assert_eq!(
        token_kinds("1.5 2.x"),
        vec![
            TokenKind::NumberLiteral(1.5),
            TokenKind::NumberLiteral(2.0),
            TokenKind::Dot,
            TokenKind::Symbol(String::from("x")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_escapes_are_decoded() {
    assert_eq!(
        token_kinds(r#""a\"b\n" 'it\'s'"#),
        vec![
            TokenKind::StringLiteral(String::from("a\"b\n")),
            TokenKind::StringLiteral(String::from("it's")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_recognised() {
    assert_eq!(
        token_kinds("if else typeof delete newer"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Typeof,
            TokenKind::Delete,
            TokenKind::Symbol(String::from("newer")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn token_locations_track_lines() {
    let tokens = tokenize("a\n  b", Path::new("test.js"))
        .expect("tokenization should succeed")
        .tokens;

    assert_eq!(tokens[0].location.start_pos.line_number, 1);
    assert_eq!(tokens[1].location.start_pos.line_number, 2);
    assert_eq!(tokens[1].location.start_pos.char_column, 2);
}

#[test]
fn unterminated_string_is_a_syntax_error() {
    let error = tokenize("var a = 'oops;\n", Path::new("broken.js"))
        .expect_err("unterminated strings should fail");

    assert_eq!(error.error_type, ErrorType::Syntax);
    assert_eq!(error.location.scope, Path::new("broken.js"));
}

#[test]
fn single_ampersand_suggests_logical_and() {
    let error = tokenize("a & b", Path::new("test.js")).expect_err("bitwise and is unsupported");
    assert_eq!(error.error_type, ErrorType::Syntax);
    assert!(error.msg.contains('&'));
}

#[test]
fn unterminated_block_comment_is_a_syntax_error() {
    let error = tokenize("a /* never closed", Path::new("test.js"))
        .expect_err("unterminated comments should fail");
    assert_eq!(error.error_type, ErrorType::Syntax);
}
