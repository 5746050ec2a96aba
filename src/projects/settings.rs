use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::return_config_error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const SCRIPT_FILE_EXTENSION: &str = "js";
pub const DECOMPOSED_FILE_SUFFIX: &str = "decomposed";
pub const CONFIG_FILE_NAME: &str = "sprout.toml";

/// Prefix for every temporary introduced by the expression decomposer
pub const DEFAULT_TEMP_NAME_PREFIX: &str = "JSCompiler_temp_";

/// Marker placed between the prefix and the unique id for temporaries known to be constant
pub const CONSTANT_TEMP_MARKER: &str = "const_";

// This is a guess about how much should be initially allocated for the token and node vecs.
// Just a heuristic based on small snippets of code.
pub const SRC_TO_TOKEN_RATIO: usize = 5; // About 1/5 source code to tokens
pub const TOKEN_TO_NODE_RATIO: usize = 1; // Roughly one node per token for expression heavy code

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix of decomposer temporaries
    pub temp_name_prefix: String,

    /// Names of the functions whose call sites get exposed.
    /// Empty means every call with a plain name as its callee.
    pub expose_calls: Vec<String>,

    /// Also hoist each exposed call into its own temporary
    pub relocate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            temp_name_prefix: String::from(DEFAULT_TEMP_NAME_PREFIX),
            expose_calls: Vec::new(),
            relocate: false,
        }
    }
}

impl Config {
    /// Loads a config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Config, CompilerError> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => return_config_error!(path, format!("Could not read config file: {e}")),
        };

        Config::from_toml_str(&source, path)
    }

    pub fn from_toml_str(source: &str, path: &Path) -> Result<Config, CompilerError> {
        let config: Config = match toml::from_str(source) {
            Ok(config) => config,
            Err(e) => return_config_error!(path, format!("Invalid config: {e}"), {
                CompilationStage => "Config",
                PrimarySuggestion => "Valid keys are 'temp_name_prefix', 'expose_calls' and 'relocate'",
            }),
        };

        if !is_valid_temp_name_prefix(&config.temp_name_prefix) {
            return_config_error!(
                path,
                format!(
                    "'{}' can't start a variable name, so it can't be used as the temp name prefix",
                    config.temp_name_prefix
                ),
                {
                    PrimarySuggestion => "Use letters, digits, '_' or '$' and don't start with a digit",
                }
            );
        }

        Ok(config)
    }

    /// Looks for a config file in the given directory, falling back to the defaults
    pub fn discover(dir: &Path) -> Result<Config, CompilerError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Config::from_file(&path)
        } else {
            Ok(Config::default())
        }
    }
}

/// Temporaries are `<prefix><id>`, so the prefix has to be able to start a variable name
pub fn is_valid_temp_name_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }

    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
