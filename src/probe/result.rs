// src/probe/result.rs
// =============================================================================
// The outcome of fetching one RequestJob.
//
// A fetch either succeeds (we got a status code and headers) or fails (we
// know which URL failed and why). Those two shapes never mix, so Outcome is
// an enum instead of one struct with optional fields: a success can't carry
// an error and a failure can't carry a status code.
//
// The latency is not part of the outcome. The aggregator stamps it when it
// drains the result, measured from the moment the whole batch started.
//
// JSON shape (field names are the public output format):
//   success: { "status_code": 200, "headers": {...}, "latency": 0.12 }
//   failure: { "url": "...", "error": "...", "latency": 0.12 }
// =============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Serialize, Serializer};

use crate::error::FetchError;

/// Header name to every value the server sent for it, in arrival order.
pub type Headers = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success {
        status_code: u16,
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        headers: Headers,
    },
    Failure {
        #[serde(skip_serializing_if = "String::is_empty")]
        url: String,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Time since the batch started, set when the result is drained.
    #[serde(serialize_with = "serialize_secs")]
    pub latency: Duration,
}

impl FetchResult {
    pub fn success(status_code: u16, headers: Headers) -> Self {
        Self {
            outcome: Outcome::Success {
                status_code,
                headers,
            },
            latency: Duration::ZERO,
        }
    }

    pub fn failure(url: impl Into<String>, error: &FetchError) -> Self {
        Self {
            outcome: Outcome::Failure {
                url: url.into(),
                error: error.to_string(),
            },
            latency: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure { error, .. } => Some(error.as_str()),
            Outcome::Success { .. } => None,
        }
    }
}

/// Copies a response's headers into an owned, name-sorted map.
///
/// Values that are not valid UTF-8 are kept, lossily decoded.
pub fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for name in map.keys() {
        let values = map
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();
        headers.insert(name.as_str().to_string(), values);
    }
    headers
}

fn serialize_secs<S: Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(latency.as_secs_f64())
}
