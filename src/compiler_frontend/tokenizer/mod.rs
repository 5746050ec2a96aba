pub(crate) mod tokenizer;
pub(crate) mod tokens;

#[cfg(test)]
#[path = "tests/tokenizer_tests.rs"]
mod tests;
