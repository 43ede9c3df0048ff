//! Release config CLI
//!
//! Resolves `TARGET_RELEASE` from the release config directories and writes
//! the makefile fragment and flag artifacts the build consumes.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose).map_err(|e| CliError::user(format!("Logging setup failed: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    if cli.list {
        return commands::run_list(&cli);
    }

    let written = commands::run_generate(&cli)?;
    if cli.verbose {
        for path in &written {
            println!("{} {}", "wrote".green(), path);
        }
    }
    Ok(())
}
