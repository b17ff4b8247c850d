//! pinbatch CLI: add a folder through a worker pool, then pin or unpin the recorded hashes.

use clap::Parser;
use pinbatch::engine::{Cli, handle_run};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = match handle_run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    };
    log::debug!("Total time: {:?}", start_time.elapsed());
    code
}
