//! c4 CLI - C4 architecture models as code

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use c4_cli::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the flag
    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    if let Err(e) = c4_cli::cli::run(cli) {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
