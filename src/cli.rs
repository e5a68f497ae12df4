// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below IS the CLI. Each field becomes
// a flag, its doc comment becomes the --help text, and clap parses the
// value into the field's type (PathBuf, NonZeroUsize, humantime::Duration).
// =============================================================================

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputMode;
use crate::runner::RunConfig;

#[derive(Parser, Debug)]
#[command(
    name = "latency-probe",
    version,
    about = "Fetch a list of URLs concurrently and record status, headers and latency",
    long_about = "latency-probe reads whitespace-separated URLs from a file, sends one GET per URL \
                  all at once, and writes every response's status code, headers and latency \
                  (or the error) to an output file as text or JSON."
)]
pub struct Cli {
    /// File with whitespace-separated URLs (must exist)
    #[arg(short, long, default_value = "./urls")]
    pub input: PathBuf,

    /// File to write results to (created or truncated)
    #[arg(short, long, default_value = "./output.txt")]
    pub output: PathBuf,

    /// Output format; when omitted you will be asked
    #[arg(long, value_enum)]
    pub format: Option<OutputMode>,

    /// Maximum number of requests in flight (default: no limit)
    #[arg(long)]
    pub concurrency: Option<NonZeroUsize>,

    /// Stop waiting for results after this long, e.g. "30s" or "2m"
    #[arg(long)]
    pub drain_timeout: Option<humantime::Duration>,

    /// User-Agent header sent with every request
    #[arg(long, default_value = concat!("latency-probe/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,
}

impl Cli {
    /// Builds the run configuration once the output mode is known.
    pub fn into_config(self, mode: OutputMode) -> RunConfig {
        RunConfig {
            input: self.input,
            output: self.output,
            mode,
            concurrency: self.concurrency.map(NonZeroUsize::get),
            drain_timeout: self.drain_timeout.map(Into::into),
            user_agent: self.user_agent,
        }
    }
}
