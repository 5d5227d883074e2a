use minic::projects::cli::start_cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    start_cli()
}
