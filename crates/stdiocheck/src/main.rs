//! stdiocheck - classify finished tool jobs from exit codes and output.

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::process::ExitCode;
use stdiocheck_cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init_logging(&args.log_level, args.log_json);

    let state = match &args.command {
        Command::Check(check) => commands::check(check)?.state,
        Command::Run(run) => commands::run(run).await?.state,
        Command::Validate(validate) => {
            commands::validate(validate)?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    // ok = 0, generic_error = 1, oom_error = 2
    Ok(ExitCode::from(state.exit_status() as u8))
}
