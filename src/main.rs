use clap::Parser;
use multirename::cli::{Cli, run};
use multirename::logging::{LogLevel, init_logger};
use multirename::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logger(LogLevel::from_occurrences(cli.verbose)) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
