//! Tests for CLI command parsing and flag handling.

use super::{BuildOptions, Command, Flag, apply_flags, get_command};
use crate::projects::settings::Config;
use std::path::PathBuf;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn build_command_with_only_an_input() {
    let command = get_command(&args(&["build", "program.json"])).expect("command should parse");
    assert_eq!(
        command,
        Command::Build(BuildOptions {
            input: PathBuf::from("program.json"),
            ..BuildOptions::default()
        })
    );
}

#[test]
fn build_command_parses_every_flag() {
    let command = get_command(&args(&[
        "build",
        "--show-ast",
        "program.json",
        "-o",
        "out.s",
        "--config",
        "settings.toml",
        "--hide-tac",
        "--no-opt",
        "--hide-warnings",
    ]))
    .expect("command should parse");

    assert_eq!(
        command,
        Command::Build(BuildOptions {
            input: PathBuf::from("program.json"),
            output: Some(PathBuf::from("out.s")),
            config_path: Some(PathBuf::from("settings.toml")),
            flags: vec![
                Flag::ShowAst,
                Flag::HideTac,
                Flag::NoOptimize,
                Flag::HideWarnings
            ],
        })
    );
}

#[test]
fn build_command_needs_an_input() {
    let error = get_command(&args(&["build", "--no-opt"])).expect_err("no input");
    assert!(error.contains("Missing"));
}

#[test]
fn build_command_rejects_two_inputs() {
    assert!(get_command(&args(&["build", "a.json", "b.json"])).is_err());
}

#[test]
fn flags_that_take_a_value_reject_a_missing_one() {
    let error = get_command(&args(&["build", "a.json", "-o"])).expect_err("missing value");
    assert_eq!(error, "Missing value for -o");

    let error = get_command(&args(&["build", "a.json", "--config", "--no-opt"]))
        .expect_err("flag is not a value");
    assert_eq!(error, "Missing value for --config");
}

#[test]
fn unknown_flags_and_commands_are_rejected() {
    assert!(get_command(&args(&["build", "a.json", "--fast"])).is_err());
    assert!(get_command(&args(&["run", "a.json"])).is_err());
    assert_eq!(get_command(&args(&["help"])), Ok(Command::Help));
}

#[test]
fn flags_override_the_config() {
    let mut config = Config::default();
    apply_flags(
        &mut config,
        &[Flag::ShowAst, Flag::HideTac, Flag::NoOptimize],
    );

    assert!(config.show_ast);
    assert!(!config.show_tac);
    assert!(!config.optimize_tac);
    assert_eq!(config.entry_point, "main");
}
