use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use saying::say;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CompilerWarning {
    pub msg: String,
    pub location: TextLocation,
    pub warning_kind: WarningKind,
    pub file_path: PathBuf,
}

impl CompilerWarning {
    pub fn new(
        msg: &str,
        location: TextLocation,
        warning_kind: WarningKind,
        file_path: PathBuf,
    ) -> CompilerWarning {
        CompilerWarning {
            msg: msg.to_owned(),
            location,
            warning_kind,
            file_path,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarningKind {
    // The call site sits somewhere no statement can be injected before,
    // like a loop condition or a case label
    UndecomposableCallSite,
}

pub fn print_formatted_warning(w: CompilerWarning) {
    say!(Yellow "WARNING: ");
    match w.warning_kind {
        WarningKind::UndecomposableCallSite => {
            say!(
                "Call site '", w.msg, "' can't be exposed (",
                w.file_path.to_string_lossy().to_string(),
                " line ", {w.location.start_pos.line_number}, ")"
            );
        }
    }
}
