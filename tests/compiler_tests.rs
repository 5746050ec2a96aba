use sprout::{
    Config, DecompositionType, ErrorType, Flag, WarningKind, build_files, collect_script_files,
    decompose_source, error_type_to_str, output_path,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn decompose(source: &str, config: &Config) -> sprout::DecomposeOutput {
    decompose_source(source, Path::new("main.js"), config).expect("source should decompose")
}

fn write(dir: &Path, relative: &str, source: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, source).expect("write test file");
    path
}

// ============================================================
// Single sources
// ============================================================
#[test]
fn every_call_is_exposed_in_source_order() {
    let output = decompose("x = a() + b();", &Config::default());

    assert_eq!(
        output.source,
        "var JSCompiler_temp_const_0 = a();\nx = JSCompiler_temp_const_0 + b();\n"
    );

    let classifications = output
        .report
        .iter()
        .map(|call_site| (call_site.callee.as_str(), call_site.classification))
        .collect::<Vec<_>>();
    assert_eq!(
        classifications,
        vec![
            ("a", DecompositionType::Movable),
            ("b", DecompositionType::Decomposable),
        ]
    );
    assert!(output.warnings.is_empty());
    assert_eq!(output.changes, 1);
}

#[test]
fn expose_calls_limits_which_call_sites_are_touched() {
    let config = Config {
        expose_calls: vec![String::from("c")],
        ..Config::default()
    };
    let output = decompose("x = a() + b(); y = b() + c();", &config);

    assert_eq!(
        output.source,
        "x = a() + b();\nvar JSCompiler_temp_const_0 = b();\ny = JSCompiler_temp_const_0 + c();\n"
    );
    assert_eq!(output.report.len(), 1);
    assert_eq!(output.report[0].callee, "c");
    assert_eq!(output.report[0].line, 1);
}

#[test]
fn relocate_hoists_calls_that_are_not_already_alone() {
    let config = Config {
        relocate: true,
        ..Config::default()
    };
    let output = decompose("log();\nvar x = 1 + compute();", &config);

    assert_eq!(
        output.source,
        "log();\nvar JSCompiler_temp_0 = compute();\nvar x = 1 + JSCompiler_temp_0;\n"
    );

    let relocated = output
        .report
        .iter()
        .map(|call_site| (call_site.callee.as_str(), call_site.relocated))
        .collect::<Vec<_>>();
    assert_eq!(relocated, vec![("log", false), ("compute", true)]);
    assert_eq!(output.report[1].line, 2);
}

#[test]
fn undecomposable_call_sites_are_left_alone_with_a_warning() {
    let output = decompose("while (next()) { step(); }", &Config::default());

    assert_eq!(output.source, "while (next()) { step(); }\n");
    assert_eq!(output.report.len(), 2);
    assert_eq!(output.report[0].classification, DecompositionType::Undecomposable);
    assert_eq!(output.report[1].classification, DecompositionType::Movable);

    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].warning_kind, WarningKind::UndecomposableCallSite);
    assert_eq!(output.warnings[0].file_path, PathBuf::from("main.js"));
}

#[test]
fn custom_prefixes_name_the_temporaries() {
    let config = Config {
        temp_name_prefix: String::from("$tmp"),
        ..Config::default()
    };
    let output = decompose("x = a() ? b() : 0;", &config);

    assert!(output.source.contains("var $tmp0;"), "{}", output.source);
    assert!(!output.source.contains("JSCompiler_temp_"));
}

#[test]
fn syntax_errors_carry_the_file_path() {
    let messages = decompose_source("x = ;", Path::new("broken.js"), &Config::default())
        .expect_err("missing value should fail");

    assert_eq!(messages.errors.len(), 1);
    assert_eq!(messages.errors[0].error_type, ErrorType::Syntax);
    assert_eq!(messages.errors[0].location.scope, PathBuf::from("broken.js"));
    assert_eq!(error_type_to_str(&messages.errors[0].error_type), "Syntax Error");
}

// ============================================================
// Files and directories
// ============================================================
#[test]
fn output_files_sit_next_to_their_source() {
    assert_eq!(
        output_path(Path::new("src/app/main.js")),
        PathBuf::from("src/app/main.decomposed.js")
    );
}

#[test]
fn directories_are_searched_for_scripts_in_sorted_order() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "b.js", "b();");
    write(dir.path(), "a.js", "a();");
    write(dir.path(), "a.decomposed.js", "a();");
    write(dir.path(), "notes.txt", "not a script");
    write(dir.path(), "nested/c.js", "c();");

    let files = collect_script_files(&[dir.path().to_path_buf()]).expect("collect files");

    assert_eq!(
        files,
        vec![
            dir.path().join("a.js"),
            dir.path().join("b.js"),
            dir.path().join("nested/c.js"),
        ]
    );
}

#[test]
fn missing_paths_are_file_errors() {
    let dir = TempDir::new().expect("temp dir");
    let error = collect_script_files(&[dir.path().join("nope.js")]).expect_err("no such file");
    assert_eq!(error.error_type, ErrorType::File);
}

#[test]
fn building_writes_decomposed_files() {
    let dir = TempDir::new().expect("temp dir");
    let first = write(dir.path(), "first.js", "x = a() + b();");
    let second = write(dir.path(), "second.js", "y = c() + d();");

    let output = build_files(
        &[first.to_owned(), second.to_owned()],
        &Config::default(),
        &[Flag::DisableTimers],
    );

    assert!(output.messages.errors.is_empty());
    assert_eq!(output.reports.len(), 2);
    assert_eq!(output.reports[0].path, first);
    assert_eq!(output.reports[1].path, second);

    let written = fs::read_to_string(output_path(&first)).expect("first output written");
    assert_eq!(
        written,
        "var JSCompiler_temp_const_0 = a();\nx = JSCompiler_temp_const_0 + b();\n"
    );

    // Each file gets its own temporary ids
    let written = fs::read_to_string(output_path(&second)).expect("second output written");
    assert_eq!(
        written,
        "var JSCompiler_temp_const_0 = c();\ny = JSCompiler_temp_const_0 + d();\n"
    );
}

#[test]
fn check_mode_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let script = write(dir.path(), "main.js", "x = a() + b();");

    let output = build_files(
        &[script.to_owned()],
        &Config::default(),
        &[Flag::Check, Flag::DisableTimers],
    );

    assert_eq!(output.reports.len(), 1);
    assert!(!output_path(&script).exists());
}

#[test]
fn a_broken_file_does_not_stop_the_others() {
    let dir = TempDir::new().expect("temp dir");
    let broken = write(dir.path(), "broken.js", "x = (;");
    let fine = write(dir.path(), "fine.js", "f();");

    let output = build_files(&[broken, fine.to_owned()], &Config::default(), &[Flag::DisableTimers]);

    assert_eq!(output.reports.len(), 1);
    assert_eq!(output.reports[0].path, fine);
    assert_eq!(output.messages.errors.len(), 1);
    assert_eq!(output.messages.errors[0].error_type, ErrorType::Syntax);
}

// ============================================================
// Config
// ============================================================
#[test]
fn config_fields_are_optional() {
    let config = Config::from_toml_str("relocate = true", Path::new("sprout.toml"))
        .expect("config should parse");

    assert!(config.relocate);
    assert_eq!(config.temp_name_prefix, "JSCompiler_temp_");
    assert!(config.expose_calls.is_empty());
}

#[test]
fn config_reads_every_field() {
    let source = "temp_name_prefix = \"tmp$\"\nexpose_calls = [\"inline_me\", \"also\"]\nrelocate = false\n";
    let config = Config::from_toml_str(source, Path::new("sprout.toml")).expect("config should parse");

    assert_eq!(
        config,
        Config {
            temp_name_prefix: String::from("tmp$"),
            expose_calls: vec![String::from("inline_me"), String::from("also")],
            relocate: false,
        }
    );
}

#[test]
fn bad_configs_are_config_errors() {
    let unknown_key = Config::from_toml_str("prefix = \"t_\"", Path::new("sprout.toml"))
        .expect_err("unknown keys should fail");
    assert_eq!(unknown_key.error_type, ErrorType::Config);

    let bad_prefix = Config::from_toml_str("temp_name_prefix = \"1tmp\"", Path::new("sprout.toml"))
        .expect_err("digit prefix should fail");
    assert_eq!(bad_prefix.error_type, ErrorType::Config);
    assert_eq!(bad_prefix.location.scope, PathBuf::from("sprout.toml"));
}

#[test]
fn config_is_discovered_in_the_working_directory() {
    let dir = TempDir::new().expect("temp dir");
    assert_eq!(Config::discover(dir.path()).expect("defaults"), Config::default());

    write(dir.path(), "sprout.toml", "expose_calls = [\"foo\"]");
    let config = Config::discover(dir.path()).expect("config file should load");
    assert_eq!(config.expose_calls, vec![String::from("foo")]);
}
