//! branch-policy binary entry point.

use std::process::ExitCode;

use branchpolicy::cli;
use branchpolicy::ui::output::{format_command, Level};

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(err) => {
            println!("{}", format_command(Level::Error, format!("{:#}", err)));
            ExitCode::FAILURE
        }
    }
}
