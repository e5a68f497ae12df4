// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Decide the output format (flag, or ask on stdin)
// 4. Run the batch: fetch every URL, write every result
// 5. Exit with proper code (0 = clean, 1 = results missing, 2 = error)
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod error; // src/error.rs - typed setup and fetch errors
mod output; // src/output/ - rendering and writing results
mod probe; // src/probe/ - the fetch-and-collect pipeline
mod runner; // src/runner.rs - one complete run, start to finish
mod setup; // src/setup/ - paths, files and the format prompt

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every URL produced a result and every result was written
//   Ok(1) = some results are missing or failed to write
//   Err   = setup failed, nothing was dispatched
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mode = match cli.format {
        Some(mode) => mode,
        None => {
            let stdin = io::stdin();
            let mode = setup::ask_output_mode(stdin.lock(), io::stdout())
                .context("could not determine the output format")?;
            println!();
            mode
        }
    };

    let config = cli.into_config(mode);
    let summary = runner::run(&config).await?;

    println!("Exit");
    if summary.is_clean() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
