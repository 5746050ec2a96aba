use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use crate::compiler_frontend::tokenizer::tokens::{CharPosition, TextLocation};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// The final set of errors and warnings emitted from the compiler
#[derive(Debug, Default)]
pub struct CompilerMessages {
    pub errors: Vec<CompilerError>,
    pub warnings: Vec<CompilerWarning>,
}

impl CompilerMessages {
    pub fn new() -> Self {
        CompilerMessages {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn from_error(error: CompilerError) -> Self {
        CompilerMessages {
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    pub fn extend(&mut self, other: CompilerMessages) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy)]
pub enum ErrorMetaDataKey {
    CompilationStage,

    // Optional suggestions
    PrimarySuggestion,    // One-line fix or top-level idea
    SuggestedInsertion,   // Text that could be inserted

    // Decomposition context
    NodeKind,            // Kind of the node the pass was processing
    ViolatedInvariant,   // Which tree or caller invariant did not hold
}

/// Where an error happened.
/// The scope is the file being compiled and is filled in by the driver,
/// since the passes only ever see a tree and not the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorLocation {
    pub scope: PathBuf,
    pub start_pos: CharPosition,
    pub end_pos: CharPosition,
}

impl ErrorLocation {
    pub fn new(scope: PathBuf, start_pos: CharPosition, end_pos: CharPosition) -> Self {
        Self {
            scope,
            start_pos,
            end_pos,
        }
    }
}

impl From<TextLocation> for ErrorLocation {
    fn from(location: TextLocation) -> Self {
        ErrorLocation {
            scope: PathBuf::new(),
            start_pos: location.start_pos,
            end_pos: location.end_pos,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompilerError {
    pub msg: String,
    pub location: ErrorLocation,
    pub error_type: ErrorType,

    // This is for creating more structured and detailed error messages
    pub metadata: HashMap<ErrorMetaDataKey, &'static str>,
}

impl CompilerError {
    pub fn new(
        msg: impl Into<String>,
        location: ErrorLocation,
        error_type: ErrorType,
    ) -> CompilerError {
        CompilerError {
            msg: msg.into(),
            location,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_file_path(mut self, file_path: PathBuf) -> Self {
        self.location.scope = file_path;
        self
    }

    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    pub fn new_metadata_entry(&mut self, key: ErrorMetaDataKey, value: &'static str) {
        self.metadata.insert(key, value);
    }

    /// Create a new syntax error with a clear explanation
    pub fn new_syntax_error(msg: impl Into<String>, location: ErrorLocation) -> Self {
        CompilerError::new(msg, location, ErrorType::Syntax)
    }

    /// Create a compiler error (internal bug, not user's fault)
    pub fn compiler_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, ErrorLocation::default(), ErrorType::Compiler)
    }

    /// Create a file system error for a path
    pub fn file_error(path: &Path, msg: impl Into<String>) -> Self {
        CompilerError::new(
            msg,
            ErrorLocation::new(
                path.to_path_buf(),
                CharPosition::default(),
                CharPosition::default(),
            ),
            ErrorType::File,
        )
    }

    /// Create a config error for a config file path
    pub fn config_error(path: &Path, msg: impl Into<String>) -> Self {
        CompilerError::file_error(path, msg).with_error_type(ErrorType::Config)
    }
}

// Adds more information to the CompilerError
// So it knows the type of error
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ErrorType {
    Syntax,
    File,
    Config,
    Compiler,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::Compiler => "Compiler Bug",
        ErrorType::Syntax => "Syntax Error",
        ErrorType::Config => "Malformed Config",
        ErrorType::File => "File Error",
    }
}

/// Returns a new CompilerError for syntax violations.
///
/// Usage:
/// `return_syntax_error!("message", location, {
///     CompilationStage => "Parsing",
///     PrimarySuggestion => "Did you mean 'bar'?",
/// })`;
#[macro_export]
macro_rules! return_syntax_error {
    ($msg:expr, $loc:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $loc,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Syntax,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $(
                    map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value);
                )*
                map
            },
        })
    };
    ($msg:expr, $loc:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $loc,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Syntax,
            metadata: std::collections::HashMap::new(),
        })
    };
}

/// Returns a new CompilerError for a malformed config file.
///
/// Usage: `return_config_error!(path, "message", { metadata })`;
#[macro_export]
macro_rules! return_config_error {
    ($path:expr, $msg:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {{
        let mut error = $crate::compiler_frontend::compiler_errors::CompilerError::config_error($path, $msg);
        $( error.new_metadata_entry($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value); )*
        return Err(error);
    }};
    ($path:expr, $msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::config_error(
            $path, $msg,
        ));
    }};
}

/// Returns a new CompilerError for a file that can't be read or written.
///
/// Usage: `return_file_error!(path, "message")`;
#[macro_export]
macro_rules! return_file_error {
    ($path:expr, $msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::file_error(
            $path, $msg,
        ));
    }};
}

/// Returns a new CompilerError for internal compiler bugs.
///
/// Compiler errors indicate bugs in the compiler itself (or in the pass that called into it),
/// not user code issues.
///
/// Usage:
/// - `return_compiler_error!(location => "Expected {} here", thing; { ViolatedInvariant => "..." })`
/// - `return_compiler_error!("Unexpected tree shape")`
#[macro_export]
macro_rules! return_compiler_error {
    // Located variant with format arguments and metadata
    ($location:expr => $fmt:expr $(, $arg:expr)* ; { $( $key:ident => $value:expr ),* $(,)? }) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: format!($fmt $(, $arg)*),
            location: $location,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Compiler,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key, $value); )*
                map
            },
        });
    }};
    // Located variant with format arguments
    ($location:expr => $fmt:expr $(, $arg:expr)* $(,)?) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: format!($fmt $(, $arg)*),
            location: $location,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Compiler,
            metadata: std::collections::HashMap::new(),
        });
    }};
    // Variant with format string and arguments (no location)
    ($fmt:expr, $($arg:expr),+ $(,)?) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::compiler_error(
            format!($fmt, $($arg),+),
        ));
    }};
    // Simple variant with just message
    ($msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::compiler_error($msg));
    }};
}
