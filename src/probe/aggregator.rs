// src/probe/aggregator.rs
// =============================================================================
// The driver loop: fan out one fetch per job, fan the results back in.
//
// How it works:
// 1. Remember the start time of the whole batch
// 2. Spawn one tokio task per job (all at once, unless a limit is set)
// 3. Drain the collector channel until every job has reported
// 4. Stamp each result with the time since step 1 and pass it to the sink
//
// Results reach the sink in the order fetches finish, not the order of the
// input file. The collector holds one result at a time, so fetches that
// finish together queue up on it.
//
// The drain stops early in two cases:
// - every sender is gone but results are missing (a fetch task died)
// - the optional drain timeout elapsed
// Both are reported through DrainReport rather than as errors.
// =============================================================================

use std::time::Duration;

use futures::stream::{self, StreamExt}; // StreamExt gives us .for_each_concurrent()
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use super::fetcher::Fetcher;
use super::job::RequestJob;
use super::result::FetchResult;

/// Number of results the collector holds before fetches have to wait.
pub const COLLECTOR_CAPACITY: usize = 1;

/// Receives every drained result, one call per result.
pub trait ResultSink {
    fn accept(&mut self, result: FetchResult);
}

/// How a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub dispatched: usize,
    pub received: usize,
}

impl DrainReport {
    pub fn is_complete(&self) -> bool {
        self.received == self.dispatched
    }

    pub fn missing(&self) -> usize {
        self.dispatched - self.received
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    fetcher: Fetcher,
    concurrency: Option<usize>,
    drain_timeout: Option<Duration>,
}

impl Aggregator {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            concurrency: None,
            drain_timeout: None,
        }
    }

    /// Caps how many fetches run at once. `None` starts every fetch immediately.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit;
        self
    }

    /// Bounds the whole drain. `None` waits for every result.
    pub fn with_drain_timeout(mut self, limit: Option<Duration>) -> Self {
        self.drain_timeout = limit;
        self
    }

    /// Fetches every job and forwards each result to `sink` as it arrives.
    pub async fn run<S>(&self, jobs: Vec<RequestJob>, sink: &mut S) -> DrainReport
    where
        S: ResultSink + ?Sized,
    {
        // We must see exactly this many results before the batch is done
        let dispatched = jobs.len();

        // The collector: every fetch gets a clone of the sending half,
        // we keep the receiving half and drain it below
        let (collector, mut results) = mpsc::channel(COLLECTOR_CAPACITY);

        // t0 for every latency in this batch, taken before the first spawn
        let started = Instant::now();
        info!(jobs = dispatched, concurrency = ?self.concurrency, "dispatching batch");
        self.dispatch(jobs, collector);

        // `received` lives out here so a timed-out drain still tells us
        // how far it got
        let mut received = 0;
        let draining = drain(&mut results, dispatched, started, sink, &mut received);
        match self.drain_timeout {
            Some(limit) => {
                if time::timeout(limit, draining).await.is_err() {
                    warn!(limit = ?limit, "drain timeout elapsed");
                }
            }
            None => draining.await,
        }

        let report = DrainReport {
            dispatched,
            received,
        };
        if !report.is_complete() {
            warn!(missing = report.missing(), "batch ended with results missing");
        }
        info!(
            received = report.received,
            elapsed = ?started.elapsed(),
            "batch drained"
        );
        report
    }

    // Runs in its own task so the caller can start draining right away.
    fn dispatch(&self, jobs: Vec<RequestJob>, collector: Sender<FetchResult>) {
        let fetcher = self.fetcher.clone();
        let limit = self.concurrency;

        tokio::spawn(async move {
            // for_each_concurrent(None, ..) pulls every job at once;
            // Some(n) keeps at most n fetches in flight
            stream::iter(jobs)
                .for_each_concurrent(limit, move |job| {
                    let fetcher = fetcher.clone();
                    let collector = collector.clone();
                    async move {
                        let url = job.url.clone();
                        // Each fetch is its own task so a panic stays contained
                        // and shows up here as a JoinError
                        let task = tokio::spawn(async move { fetcher.fetch(job, collector).await });
                        if let Err(err) = task.await {
                            error!(url = %url, error = %err, "fetch task ended without a result");
                        }
                    }
                })
                .await;
        });
    }
}

async fn drain<S>(
    results: &mut Receiver<FetchResult>,
    expected: usize,
    started: Instant,
    sink: &mut S,
    received: &mut usize,
) where
    S: ResultSink + ?Sized,
{
    while *received < expected {
        match results.recv().await {
            Some(mut result) => {
                result.latency = started.elapsed();
                debug!(
                    success = result.is_success(),
                    error = ?result.error(),
                    latency = ?result.latency,
                    "result drained"
                );
                sink.accept(result);
                *received += 1;
            }
            None => {
                error!("collector closed before every result arrived");
                return;
            }
        }
    }
}
