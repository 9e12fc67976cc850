// patrol/src/main.rs
//! Patrol entry point.
//!
//! Exit codes: 0 when the input passed, 1 when a scan found issues, 2 on
//! usage, I/O or configuration errors.

use clap::Parser;
use std::process::ExitCode;

use patrol::cli::Cli;
use patrol::{dispatch, logger};

const EXIT_FAILED_SCAN: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    logger::init_logger(logger::level_for_flags(args.quiet, args.debug));

    match dispatch(args.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILED_SCAN),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
