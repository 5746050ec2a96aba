//! Runs the expression decomposer over whole files.
//!
//! Each file is tokenized, parsed and then every call site the config asks for is exposed,
//! so it ends up being evaluated in a statement of its own position.
//! Files are independent of each other, so they are processed in parallel,
//! each with its own tree, name ids and set of known constants.

use crate::compiler_frontend::Flag;
use crate::compiler_frontend::ast::ast::Ast;
use crate::compiler_frontend::ast::ast_nodes::{NodeId, NodeKind};
use crate::compiler_frontend::ast::parse_script::parse_script;
use crate::compiler_frontend::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_frontend::compiler_pass::{ChangeTracker, UniqueNameIdSupplier};
use crate::compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
use crate::compiler_frontend::optimizers::expression_decomposer::{
    DecompositionType, ExpressionDecomposer,
};
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use crate::projects::settings::{Config, DECOMPOSED_FILE_SUFFIX, SCRIPT_FILE_EXTENSION};
use crate::{ast_log, return_file_error, timer_log};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use saying::say;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// How one call site looked before it was exposed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSiteReport {
    pub callee: String,
    pub line: i32,
    pub column: i32,
    pub classification: DecompositionType,

    /// Whether the call was hoisted into a temporary of its own
    pub relocated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub call_sites: Vec<CallSiteReport>,
}

#[derive(Debug)]
pub struct DecomposeOutput {
    pub source: String,
    pub report: Vec<CallSiteReport>,
    pub warnings: Vec<CompilerWarning>,
    pub changes: usize,
}

#[derive(Debug, Default)]
pub struct BuildOutput {
    pub reports: Vec<FileReport>,
    pub messages: CompilerMessages,
}

/// Tokenizes and parses a single file, then exposes its call sites.
///
/// Returns the rewritten source and a report of every call site that was looked at.
/// Call sites that can't be exposed are reported and left untouched.
pub fn decompose_source(
    source: &str,
    path: &Path,
    config: &Config,
) -> Result<DecomposeOutput, CompilerMessages> {
    let file_error = |e: CompilerError| CompilerMessages::from_error(e.with_file_path(path.to_path_buf()));

    let time = Instant::now();
    let tokens = tokenize(source, path).map_err(file_error)?;
    timer_log!(time, "Tokenized in: ");

    let time = Instant::now();
    let mut ast = parse_script(&tokens).map_err(file_error)?;
    timer_log!(time, "Parsed in: ");

    let call_sites = collect_call_sites(&ast, &config.expose_calls);
    ast_log!("Found ", Blue call_sites.len(), Reset " call sites to expose");

    let mut changes = ChangeTracker::new();
    let mut id_supplier = UniqueNameIdSupplier::new();
    let mut known_constants = FxHashSet::default();
    let mut decomposer =
        ExpressionDecomposer::new(&mut changes, &mut id_supplier, &mut known_constants);
    decomposer.set_temp_name_prefix(config.temp_name_prefix.as_str());

    let mut report = Vec::with_capacity(call_sites.len());
    let mut warnings = Vec::new();

    let time = Instant::now();
    for call in call_sites {
        // Earlier rewrites may have split the statement this call was in,
        // but calls are only ever moved, never dropped
        if !ast.is_descendant_or_self(call, ast.root) {
            continue;
        }

        let location = ast.location(call);
        let classification = decomposer.classify(&ast, call).map_err(file_error)?;
        let mut relocated = false;

        match classification {
            DecompositionType::Undecomposable => {
                warnings.push(CompilerWarning::new(
                    &ast.node_to_source(call),
                    location,
                    WarningKind::UndecomposableCallSite,
                    path.to_path_buf(),
                ));
            }

            DecompositionType::Movable | DecompositionType::Decomposable => {
                decomposer
                    .decompose_until_movable(&mut ast, call)
                    .map_err(file_error)?;

                if config.relocate && !stands_alone(&ast, call) {
                    decomposer.relocate(&mut ast, call).map_err(file_error)?;
                    relocated = true;
                }
            }
        }

        report.push(CallSiteReport {
            callee: callee_name(&ast, call).unwrap_or_default().to_owned(),
            line: location.start_pos.line_number,
            column: location.start_pos.char_column,
            classification,
            relocated,
        });
    }
    timer_log!(time, "Decomposed in: ");

    ast.check_tree_invariants().map_err(file_error)?;

    Ok(DecomposeOutput {
        source: ast.to_source_lines(),
        report,
        warnings,
        changes: changes.changes,
    })
}

/// Reads, decomposes and (unless checking) writes every file in parallel.
pub fn build_files(paths: &[PathBuf], config: &Config, flags: &[Flag]) -> BuildOutput {
    let time = Instant::now();

    let results: Vec<Result<(FileReport, Vec<CompilerWarning>), CompilerMessages>> = paths
        .par_iter()
        .map(|path| build_file(path, config, flags))
        .collect();

    let mut output = BuildOutput::default();
    for result in results {
        match result {
            Ok((report, warnings)) => {
                output.reports.push(report);
                output.messages.warnings.extend(warnings);
            }
            Err(messages) => output.messages.extend(messages),
        }
    }

    if !flags.contains(&Flag::DisableTimers) && !flags.contains(&Flag::Json) {
        let duration = time.elapsed();
        say!(
            "\nDecomposed ",
            Blue output.reports.len(),
            Reset " of ",
            Blue paths.len(),
            Reset " files in: ",
            Green Bold #duration
        );
    }

    output
}

fn build_file(
    path: &Path,
    config: &Config,
    flags: &[Flag],
) -> Result<(FileReport, Vec<CompilerWarning>), CompilerMessages> {
    let source = read_source(path).map_err(CompilerMessages::from_error)?;
    let output = decompose_source(&source, path, config)?;

    if !flags.contains(&Flag::Check) {
        write_output(&output_path(path), &output.source).map_err(CompilerMessages::from_error)?;
    }

    Ok((
        FileReport {
            path: path.to_path_buf(),
            call_sites: output.report,
        },
        output.warnings,
    ))
}

/// Expands directories into the script files inside them (recursively).
/// Files that are already decomposer output are skipped.
pub fn collect_script_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CompilerError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_directory(path, &mut files)?;
        } else if path.is_file() {
            files.push(path.to_owned());
        } else {
            return_file_error!(path, "No file or directory at this path");
        }
    }

    Ok(files)
}

fn collect_directory(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CompilerError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return_file_error!(dir, format!("Could not read directory: {e}")),
    };

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => return_file_error!(dir, format!("Could not read directory entry: {e}")),
        }
    }

    // Directory order isn't stable across platforms
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_directory(&path, files)?;
        } else if is_script_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_script_file(path: &Path) -> bool {
    if path.extension().is_none_or(|extension| extension != SCRIPT_FILE_EXTENSION) {
        return false;
    }

    // a.decomposed.js
    !path
        .file_stem()
        .map(Path::new)
        .and_then(Path::extension)
        .is_some_and(|suffix| suffix == DECOMPOSED_FILE_SUFFIX)
}

/// `dir/name.js` -> `dir/name.decomposed.js`
pub fn output_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(
        "{stem}.{DECOMPOSED_FILE_SUFFIX}.{SCRIPT_FILE_EXTENSION}"
    ))
}

fn read_source(path: &Path) -> Result<String, CompilerError> {
    match fs::read_to_string(path) {
        Ok(source) => Ok(source),
        Err(e) => return_file_error!(path, format!("Could not read source file: {e}")),
    }
}

fn write_output(path: &Path, source: &str) -> Result<(), CompilerError> {
    match fs::write(path, source) {
        Ok(()) => Ok(()),
        Err(e) => return_file_error!(path, format!("Error writing file: {e}")),
    }
}

/// Calls through a plain name, in source order, filtered by the names the config asks for
fn collect_call_sites(ast: &Ast, expose_calls: &[String]) -> Vec<NodeId> {
    ast.preorder(ast.root)
        .into_iter()
        .filter(|node| matches!(ast.kind(*node), NodeKind::Call))
        .filter(|call| {
            callee_name(ast, *call).is_some_and(|name| {
                expose_calls.is_empty() || expose_calls.iter().any(|exposed| exposed == name)
            })
        })
        .collect()
}

fn callee_name(ast: &Ast, call: NodeId) -> Option<&str> {
    ast.first_child(call).and_then(|callee| ast.name_of(callee))
}

/// A call that already is a whole statement or a whole initializer gains nothing from relocating
fn stands_alone(ast: &Ast, call: NodeId) -> bool {
    let Some(parent) = ast.parent(call) else {
        return false;
    };

    match ast.kind(parent) {
        NodeKind::ExprResult => true,
        NodeKind::Name(_) => ast
            .parent(parent)
            .is_some_and(|declaration| matches!(ast.kind(declaration), NodeKind::Var)),
        _ => false,
    }
}
