//! Command-line entrypoint for the minic compiler.
//!
//! Parses the command and its flags, loads the project config and hands off to the build system.

use crate::build_system::build;
use crate::compiler_frontend::compiler_errors::CompilerMessages;
use crate::compiler_frontend::display_messages::print_compiler_messages;
use crate::projects::settings::Config;
use saying::say;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    // Compiles a serialized program tree to assembly
    Build(BuildOptions),

    Help,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct BuildOptions {
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    flags: Vec<Flag>,
}

/// Per-build overrides of the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    ShowAst,
    HideTac,
    NoOptimize,
    HideWarnings,
}

pub fn start_cli() -> ExitCode {
    let compiler_args: Vec<String> = env::args().collect();

    if compiler_args.len() < 2 {
        print_help(false);
        return ExitCode::SUCCESS;
    }

    let command = match get_command(&compiler_args[1..]) {
        Ok(command) => command,
        Err(e) => {
            say!(Red e);
            print_help(true);
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            print_help(false);
            ExitCode::SUCCESS
        }

        Command::Build(options) => run_build(options),
    }
}

fn run_build(options: BuildOptions) -> ExitCode {
    let loaded = match &options.config_path {
        Some(path) => Config::load(path),
        None => match env::current_dir() {
            Ok(dir) => Config::load_from_dir(&dir),
            Err(_) => Ok(Config::default()),
        },
    };

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            print_compiler_messages(CompilerMessages::from_error(e, Vec::new()));
            return ExitCode::FAILURE;
        }
    };
    apply_flags(&mut config, &options.flags);

    say!("\nCompiling ", Blue #options.input);
    let mut messages = build::build(&options.input, options.output.as_deref(), &config);
    let failed = !messages.errors.is_empty();

    if options.flags.contains(&Flag::HideWarnings) {
        messages.warnings.clear();
    }
    print_compiler_messages(messages);

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn apply_flags(config: &mut Config, flags: &[Flag]) {
    for flag in flags {
        match flag {
            Flag::ShowAst => config.show_ast = true,
            Flag::HideTac => config.show_tac = false,
            Flag::NoOptimize => config.optimize_tac = false,
            Flag::HideWarnings => {}
        }
    }
}

fn get_command(args: &[String]) -> Result<Command, String> {
    let command = args.first().map(String::as_str);

    match command {
        Some("help") | Some("--help") => Ok(Command::Help),
        Some("build") => parse_build_command(&args[1..]),
        Some(other) => Err(format!("Invalid command: '{other}'")),
        None => Err(String::from("No command given")),
    }
}

fn parse_build_command(args: &[String]) -> Result<Command, String> {
    let mut options = BuildOptions::default();
    let mut input: Option<PathBuf> = None;
    let mut index = 0usize;

    while let Some(arg) = args.get(index) {
        match arg.as_str() {
            "-o" | "--output" => {
                options.output = Some(flag_value(args, index, arg)?);
                index += 2;
            }
            "--config" => {
                options.config_path = Some(flag_value(args, index, arg)?);
                index += 2;
            }
            "--show-ast" => {
                options.flags.push(Flag::ShowAst);
                index += 1;
            }
            "--hide-tac" => {
                options.flags.push(Flag::HideTac);
                index += 1;
            }
            "--no-opt" => {
                options.flags.push(Flag::NoOptimize);
                index += 1;
            }
            "--hide-warnings" => {
                options.flags.push(Flag::HideWarnings);
                index += 1;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown build flag: '{arg}'"));
            }
            _ => {
                if input.is_some() {
                    return Err(String::from("Build command accepts exactly one input file."));
                }
                input = Some(PathBuf::from(arg));
                index += 1;
            }
        }
    }

    match input {
        Some(input) => {
            options.input = input;
            Ok(Command::Build(options))
        }
        None => Err(String::from("Missing the program tree to build (a .json file)")),
    }
}

fn flag_value(args: &[String], index: usize, flag: &str) -> Result<PathBuf, String> {
    match args.get(index + 1) {
        Some(value) if !value.starts_with('-') => Ok(PathBuf::from(value)),
        _ => Err(format!("Missing value for {flag}")),
    }
}

fn print_help(commands_only: bool) {
    if !commands_only {
        say!(Bright Black "------------------------------------");
        say!(Green Bold "minic, a MIPS back end for a small imperative language");
        say!("Usage: ", Bold "<command>", Italic " <args>");
    }
    say!(Green Bold "\nCommands:");
    say!("  build <tree.json>   - Compiles a program tree to MIPS assembly");
    say!("  help                - Shows this message");

    say!(Green Bold "\nBuild flags:");
    say!("  -o, --output <path>   (default: the input with a .s extension)");
    say!("  --config <path>       (default: minic.toml in the current directory)");
    say!("  --show-ast");
    say!("  --hide-tac");
    say!("  --no-opt");
    say!("  --hide-warnings");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
