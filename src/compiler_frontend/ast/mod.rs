pub(crate) mod ast;
pub(crate) mod ast_display;
pub(crate) mod ast_nodes;
pub(crate) mod node_util;
pub(crate) mod parse_expression;
pub(crate) mod parse_script;

#[cfg(test)]
mod tests;
