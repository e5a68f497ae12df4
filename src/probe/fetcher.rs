// src/probe/fetcher.rs
// =============================================================================
// Fetches one URL and hands exactly one FetchResult to the collector.
//
// Order of checks (the first one that applies wins):
// 1. The URL can't be turned into a request   -> failure, "invalid url: ..."
// 2. The request fails on the wire             -> failure, transport error
// 3. The collector isn't free before deadline  -> failure, "request timeout"
// 4. Otherwise                                 -> success (status + headers)
//
// The deadline starts when the fetch starts. The HTTP call itself is not cut
// short by it; the deadline only bounds the handoff to the collector. When the
// handoff loses the race, the response we already have is thrown away.
//
// Rust concepts:
// - tokio::time::timeout_at: races a future against a fixed point in time
// - mpsc::Sender: the sending half of the collector, cloned per fetch
// =============================================================================

use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc::Sender;
use tokio::time::{self, Instant};
use tracing::{debug, warn};
use url::Url;

use super::job::RequestJob;
use super::result::{collect_headers, FetchResult};
use crate::error::FetchError;

/// How long a fetch has to hand its result to the collector.
pub const REQUEST_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    deadline: Duration,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            deadline: REQUEST_DEADLINE,
        }
    }

    #[cfg(test)]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Fetches `job` and sends exactly one result into `collector`.
    pub async fn fetch(&self, job: RequestJob, collector: Sender<FetchResult>) {
        let deadline = Instant::now() + self.deadline;

        let response = match self.send_request(&job.url).await {
            Ok(response) => response,
            Err(err) => {
                debug!(url = %job.url, error = %err, "fetch failed");
                deliver(&collector, FetchResult::failure(job.url, &err)).await;
                return;
            }
        };

        let status_code = response.status().as_u16();
        let headers = collect_headers(response.headers());
        // Dropping the response closes the body without reading it
        drop(response);
        debug!(url = %job.url, status_code, "fetch completed");

        // The timed-out send must be dropped before the fallback send queues up
        let handoff = collector.send(FetchResult::success(status_code, headers));
        let handed_off = time::timeout_at(deadline, handoff).await;
        match handed_off {
            Ok(Ok(())) => {}
            Ok(Err(_)) => warn!(url = %job.url, "collector closed, result dropped"),
            Err(_) => {
                debug!(url = %job.url, "handoff missed the deadline");
                deliver(&collector, FetchResult::failure(job.url, &FetchError::Timeout)).await;
            }
        }
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let url = Url::parse(url).map_err(|source| FetchError::InvalidUrl { source })?;
        let request = self
            .client
            .get(url)
            .build()
            .map_err(|source| FetchError::BuildRequest { source })?;

        self.client
            .execute(request)
            .await
            .map_err(|source| FetchError::Transport { source })
    }
}

// Failure results are not raced against the deadline: they wait for a slot.
async fn deliver(collector: &Sender<FetchResult>, result: FetchResult) {
    if collector.send(result).await.is_err() {
        warn!("collector closed, result dropped");
    }
}
