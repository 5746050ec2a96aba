//! # sprout
//!
//! A source to source optimizer front end for a small JavaScript subset.
//! Its central pass is the expression decomposer, which rewrites statements so that a chosen
//! sub-expression can be hoisted out of them without changing evaluation order.

pub(crate) mod build_system {
    pub(crate) mod build;
}
pub(crate) mod compiler_frontend;
pub(crate) mod projects;

pub use build_system::build::{
    BuildOutput, CallSiteReport, DecomposeOutput, FileReport, build_files, collect_script_files,
    decompose_source, output_path,
};
pub use compiler_frontend::Flag;
pub use compiler_frontend::ast::ast::Ast;
pub use compiler_frontend::ast::ast_nodes::{
    BinaryOperator, Node, NodeId, NodeKind, UnaryOperator,
};
pub use compiler_frontend::ast::node_util::{is_constant_name, may_have_side_effects};
pub use compiler_frontend::ast::parse_script::parse_script;
pub use compiler_frontend::compiler_errors::{
    CompilerError, CompilerMessages, ErrorLocation, ErrorMetaDataKey, ErrorType,
    error_type_to_str,
};
pub use compiler_frontend::compiler_pass::{
    ChangeTracker, CodeChangeHandler, NameIdSupplier, UniqueNameIdSupplier,
};
pub use compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
pub use compiler_frontend::optimizers::expression_decomposer::{
    DecompositionType, ExpressionDecomposer, find_expression_root, find_injection_point,
};
pub use compiler_frontend::tokenizer::tokenizer::tokenize;
pub use compiler_frontend::tokenizer::tokens::{FileTokens, TextLocation, Token, TokenKind};
pub use projects::cli::start_cli;
pub use projects::settings::Config;
