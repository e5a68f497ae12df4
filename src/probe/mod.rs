// src/probe/mod.rs
// =============================================================================
// The fetch-and-collect pipeline.
//
// Submodules:
// - job: RequestJob and splitting the input into jobs
// - result: FetchResult, the success/failure outcome of one fetch
// - fetcher: one HTTP GET with a deadline on the handoff
// - aggregator: fans fetches out and results back in
//
// Rust concepts:
// - pub use: re-export items so callers write `probe::Aggregator`
// =============================================================================

mod aggregator;
mod fetcher;
mod job;
mod result;

pub use aggregator::{Aggregator, DrainReport, ResultSink};
pub use fetcher::Fetcher;
pub use job::parse_jobs;
pub use result::{FetchResult, Outcome};

#[cfg(test)]
pub use result::Headers;
