pub(crate) mod ast;
pub(crate) mod tokenizer;
pub(crate) mod optimizers {
    pub(crate) mod expression_decomposer;
}

pub(crate) mod compiler_pass;

pub(crate) mod compiler_messages {
    pub(crate) mod compiler_dev_logging;
    pub(crate) mod compiler_errors;
    pub(crate) mod compiler_warnings;
    pub(crate) mod display_messages;
}
pub(crate) use compiler_messages::compiler_errors;
pub(crate) use compiler_messages::compiler_warnings;
pub(crate) use compiler_messages::display_messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Relocate,
    Check,
    Json,
    DisableWarnings,
    DisableTimers,
}
