// src/error.rs
// =============================================================================
// Typed errors for the two places where failures have meaning:
//
// - SetupError: anything that goes wrong before the first request is sent.
//   These are fatal and end the run with exit code 2.
// - FetchError: anything that goes wrong while fetching a single URL.
//   These are never fatal, they become a failure Result in the output.
//
// The binary edge (main.rs) still uses anyhow, so a SetupError converts into
// anyhow::Error with the ? operator.
// =============================================================================

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing a run. Nothing has been dispatched yet.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("path is empty")]
    EmptyPath,

    #[error("'{path}' contains inadmissible characters")]
    InadmissiblePath { path: PathBuf },

    #[error("input file '{path}' doesn't exist")]
    InputMissing { path: PathBuf },

    #[error("input path '{path}' is not a file")]
    InputNotAFile { path: PathBuf },

    #[error("failed to read input file '{path}': {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open output file '{path}': {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },

    #[error("no answer given for the output format prompt")]
    PromptClosed,

    #[error("failed to read the output format answer: {source}")]
    PromptIo {
        #[source]
        source: std::io::Error,
    },
}

/// Why a single fetch produced a failure Result instead of a success.
///
/// The Display text is exactly what ends up in the `error` field.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {source}")]
    InvalidUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build request: {}", chain(.source))]
    BuildRequest {
        #[source]
        source: reqwest::Error,
    },

    #[error("{}", chain(.source))]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("request timeout")]
    Timeout,
}

// reqwest hides the interesting part ("Connection refused", "dns error")
// in the source chain, so walk it and join every level.
fn chain<E: StdError + ?Sized>(err: &E) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        // hyper and reqwest sometimes repeat the inner message verbatim
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}
