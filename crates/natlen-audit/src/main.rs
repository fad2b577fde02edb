use std::process::ExitCode;

use clap::Parser;
use natlen_contracts::EXIT_USAGE;

fn main() -> ExitCode {
    let cli = natlen_audit::Cli::parse();
    match natlen_audit::run(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("natlen-audit: {err:#}");
            ExitCode::from(EXIT_USAGE as u8)
        }
    }
}
