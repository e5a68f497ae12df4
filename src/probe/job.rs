// src/probe/job.rs
// =============================================================================
// A RequestJob is one URL to fetch.
//
// Jobs come from the input file: every whitespace-separated token is one job,
// so newlines, tabs and spaces all work as separators. No validation happens
// here; a malformed token still becomes a job and fails later as a Result.
// =============================================================================

/// One URL waiting to be fetched. Consumed by exactly one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestJob {
    pub url: String,
}

impl RequestJob {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Splits input text into jobs, one per whitespace-separated token.
pub fn parse_jobs(input: &str) -> Vec<RequestJob> {
    input.split_whitespace().map(RequestJob::new).collect()
}
