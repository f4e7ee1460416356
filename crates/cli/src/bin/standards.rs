use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    standards_cli::main_entry()
}
