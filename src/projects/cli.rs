//! Command-line entrypoint for sprout.
//!
//! Parses the command and flags, loads the config and dispatches into the build system.

use crate::build_system::build::{self, FileReport};
use crate::compiler_frontend::Flag;
use crate::compiler_frontend::compiler_errors::CompilerMessages;
use crate::compiler_frontend::display_messages::print_compiler_messages;
use crate::projects::settings::{Config, is_valid_temp_name_prefix};
use saying::say;
use std::env;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    // Rewrites files so their call sites are exposed
    Decompose(CommandOptions),

    // Only reports how each call site classifies, without writing anything
    Classify(CommandOptions),

    Help,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CommandOptions {
    paths: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    prefix: Option<String>,
}

pub fn start_cli() {
    let compiler_args: Vec<String> = env::args().collect();

    if compiler_args.len() < 2 {
        print_help(false);
        return;
    }

    let command = match get_command(&compiler_args[1..]) {
        Ok(command) => command,
        Err(e) => {
            say!(Red e);
            print_help(true);
            return;
        }
    };

    // Gather a list of any additional flags
    let flags = get_flags(&compiler_args);

    match command {
        Command::Help => {
            print_help(false);
        }

        Command::Decompose(options) => {
            let output = match run_build(&options, &flags) {
                Ok(output) => output,
                Err(messages) => {
                    print_compiler_messages(messages);
                    return;
                }
            };

            if !flags.contains(&Flag::Check) {
                for report in &output.reports {
                    let written = build::output_path(&report.path);
                    say!("Wrote ", Blue written.to_string_lossy());
                }
            }

            print_messages(output.messages, &flags);
        }

        Command::Classify(options) => {
            // Classifying never writes output files
            let mut flags = flags;
            flags.push(Flag::Check);

            let output = match run_build(&options, &flags) {
                Ok(output) => output,
                Err(messages) => {
                    print_compiler_messages(messages);
                    return;
                }
            };

            if flags.contains(&Flag::Json) {
                match serde_json::to_string_pretty(&output.reports) {
                    Ok(json) => println!("{json}"),
                    Err(e) => say!(Red "Could not serialize the report: ", e),
                }
            } else {
                print_reports(&output.reports);
            }

            print_messages(output.messages, &flags);
        }
    }
}

fn run_build(
    options: &CommandOptions,
    flags: &[Flag],
) -> Result<build::BuildOutput, CompilerMessages> {
    let mut config = match &options.config_path {
        Some(path) => Config::from_file(path),
        None => match env::current_dir() {
            Ok(dir) => Config::discover(&dir),
            Err(_) => Ok(Config::default()),
        },
    }
    .map_err(CompilerMessages::from_error)?;

    if let Some(prefix) = &options.prefix {
        config.temp_name_prefix = prefix.to_owned();
    }

    if flags.contains(&Flag::Relocate) {
        config.relocate = true;
    }

    let files = build::collect_script_files(&options.paths).map_err(CompilerMessages::from_error)?;

    Ok(build::build_files(&files, &config, flags))
}

fn print_messages(mut messages: CompilerMessages, flags: &[Flag]) {
    if flags.contains(&Flag::DisableWarnings) {
        messages.warnings.clear();
    }

    print_compiler_messages(messages);
}

fn print_reports(reports: &[FileReport]) {
    for report in reports {
        let path = report.path.to_string_lossy();
        say!(Green Bold "\n", path);

        if report.call_sites.is_empty() {
            say!(Bright Black "  no call sites");
        }

        for call_site in &report.call_sites {
            let classification = format!("{:?}", call_site.classification);
            let callee = &call_site.callee;
            let line = call_site.line;
            say!("  ", Bold callee, Reset " (line ", line, ") ", Dark Magenta classification);
        }
    }
}

fn get_command(args: &[String]) -> Result<Command, String> {
    let command = args.first().map(String::as_str);

    match command {
        Some("help") => Ok(Command::Help),
        Some("decompose") => Ok(Command::Decompose(parse_command_options(&args[1..])?)),
        Some("classify") => Ok(Command::Classify(parse_command_options(&args[1..])?)),
        Some(command) => Err(format!("Invalid command: '{command}'")),
        None => Err(String::from("Missing command")),
    }
}

fn parse_command_options(args: &[String]) -> Result<CommandOptions, String> {
    let mut options = CommandOptions::default();
    let mut index = 0usize;

    while let Some(arg) = args.get(index) {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.get(index + 1) else {
                    return Err(String::from("Missing value for --config"));
                };
                if path.starts_with("--") {
                    return Err(String::from("Missing value for --config"));
                }
                options.config_path = Some(PathBuf::from(path));
                index += 2;
            }
            "--prefix" => {
                let Some(prefix) = args.get(index + 1) else {
                    return Err(String::from("Missing value for --prefix"));
                };
                if !is_valid_temp_name_prefix(prefix) {
                    return Err(format!(
                        "Invalid --prefix value: '{prefix}'. It has to be able to start a variable name."
                    ));
                }
                options.prefix = Some(prefix.to_owned());
                index += 2;
            }
            "--relocate" | "--check" | "--json" | "--hide-warnings" | "--hide-timers" => {
                index += 1;
            }
            _ if arg.starts_with("--") => {
                return Err(format!(
                    "Unknown flag: '{arg}'. Run 'sprout help' to see the supported flags."
                ));
            }
            _ => {
                options.paths.push(PathBuf::from(arg));
                index += 1;
            }
        }
    }

    if options.paths.is_empty() {
        return Err(String::from("Expected at least one file or directory to work on"));
    }

    Ok(options)
}

fn get_flags(args: &[String]) -> Vec<Flag> {
    let mut flags = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--relocate" => flags.push(Flag::Relocate),
            "--check" => flags.push(Flag::Check),
            "--json" => flags.push(Flag::Json),
            "--hide-warnings" => flags.push(Flag::DisableWarnings),
            "--hide-timers" => flags.push(Flag::DisableTimers),
            _ => {}
        }
    }

    flags
}

fn print_help(commands_only: bool) {
    if !commands_only {
        say!(Bright Black "------------------------------------");
        say!(Green Bold "sprout - exposes call sites as statements of their own");
        say!("Usage: ", Bold "<command>", Italic " <paths...>");
    }
    say!(Green Bold "\nCommands:");
    say!("  decompose <paths>   - Writes <name>.decomposed.js next to each script");
    say!("  classify <paths>    - Reports how each call site classifies");
    say!("  help                - Shows this message");

    say!(Green Bold "\nFlags:");
    say!("  --config <file>   (default: ./sprout.toml when present)");
    say!("  --prefix <name>   (default: JSCompiler_temp_)");
    say!("  --relocate        Also hoist each exposed call into its own temporary");
    say!("  --check           Don't write any files");
    say!("  --json            Print the classify report as JSON");
    say!("  --hide-warnings");
    say!("  --hide-timers");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
