#![cfg(test)]

use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::parse_script::parse_script;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use std::path::Path;

mod parser_tests;
mod tree_tests;

fn parse(source: &str) -> Ast {
    try_parse(source).expect("source should parse")
}

fn try_parse(source: &str) -> Result<Ast, CompilerError> {
    let tokens = tokenize(source, Path::new("test.js"))?;
    parse_script(&tokens)
}

/// Parses and prints, so printer tests read as source in, source out
fn printed(source: &str) -> String {
    parse(source).to_source()
}
