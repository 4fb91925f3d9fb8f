//! GPU Bench CLI entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match gpubench_cli::run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
