mod cli;
mod commands;
mod config;
mod domain;
mod logging;
mod services;

use clap::Parser;
use cli::Cli;
use domain::errors::GenerateError;
use std::process::ExitCode;

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<GenerateError>() {
        Some(GenerateError::ToolFailed { code, .. }) => u8::try_from(*code)
            .ok()
            .filter(|c| *c != 0)
            .unwrap_or(1),
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match commands::dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
