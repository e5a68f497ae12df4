// src/runner.rs
// =============================================================================
// Wires one complete run together:
//
//   input file -> jobs -> aggregator (fetch + collect) -> output sink -> file
//
// Setup happens first and in full: the input is read and the output file is
// created before the first request goes out, so a bad path never leaves a
// half-finished batch behind.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::error::SetupError;
use crate::output::{OutputMode, OutputSink, SinkSummary};
use crate::probe::{parse_jobs, Aggregator, DrainReport, Fetcher};
use crate::setup::{create_output, read_input};

/// Everything a run needs, decided before dispatch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: OutputMode,
    pub concurrency: Option<usize>,
    pub drain_timeout: Option<Duration>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub drain: DrainReport,
    pub sink: SinkSummary,
}

impl RunSummary {
    /// Every job reported and every report reached the output file.
    pub fn is_clean(&self) -> bool {
        self.drain.is_complete() && self.sink.failed == 0
    }
}

pub async fn run(config: &RunConfig) -> Result<RunSummary, SetupError> {
    // Setup: any failure here returns before a single request is sent
    let input = read_input(&config.input)?;
    let jobs = parse_jobs(&input);
    let writer = create_output(&config.output)?;

    // One client for the whole batch; clones share the connection pool.
    // No .timeout() here: the fetcher's own deadline is the only limit
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|source| SetupError::BuildClient { source })?;

    let aggregator = Aggregator::new(Fetcher::new(client))
        .with_concurrency(config.concurrency)
        .with_drain_timeout(config.drain_timeout);

    // The sink writes each result as the aggregator drains it
    let mut sink = OutputSink::new(writer, config.mode);
    let drain = aggregator.run(jobs, &mut sink).await;

    // Flush the BufWriter; we only need the counters afterwards
    let (_, sink) = sink.finish();

    info!(
        output = %config.output.display(),
        written = sink.written,
        failed_writes = sink.failed,
        "output written"
    );
    Ok(RunSummary { drain, sink })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::fs;

    fn config(dir: &std::path::Path, mode: OutputMode) -> RunConfig {
        RunConfig {
            input: dir.join("urls"),
            output: dir.join("out/output.txt"),
            mode,
            concurrency: None,
            drain_timeout: None,
            user_agent: "latency-probe-test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_json_end_to_end() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET)
                .path("/health")
                .header("user-agent", "latency-probe-test");
            then.status(200).header("content-type", "text/plain");
        }).await;

        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), OutputMode::Json);
        fs::write(&config.input, format!("{}\nexample.com\n", server.url("/health"))).unwrap();

        let summary = run(&config).await.unwrap();
        assert!(summary.is_clean());
        assert_eq!(summary.drain.received, 2);
        assert_eq!(summary.sink.written, 2);
        mock.assert_async().await;

        let text = fs::read_to_string(&config.output).unwrap();
        let docs: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&text)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs.len(), 2);

        let ok = docs.iter().find(|d| d.get("status_code").is_some()).unwrap();
        assert_eq!(ok["status_code"], 200);
        assert_eq!(ok["headers"]["content-type"][0], "text/plain");
        assert!(ok.get("url").is_none());
        assert!(ok.get("error").is_none());

        let failed = docs.iter().find(|d| d.get("error").is_some()).unwrap();
        assert_eq!(failed["url"], "example.com");
        assert!(failed["error"].as_str().unwrap().starts_with("invalid url"));
        assert!(failed.get("status_code").is_none());
    }

    #[tokio::test]
    async fn test_run_text_mode() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(418).header("x-teapot", "short and stout");
        }).await;

        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), OutputMode::Text);
        fs::write(&config.input, format!("{} http://127.0.0.1:1/", server.url("/"))).unwrap();

        let summary = run(&config).await.unwrap();
        assert!(summary.is_clean());

        let text = fs::read_to_string(&config.output).unwrap();
        assert!(text.contains("\tCode: 418\n"));
        assert!(text.contains("x-teapot: [short and stout]"));
        assert!(text.contains("\"http://127.0.0.1:1/\" - error: "));
    }

    #[tokio::test]
    async fn test_missing_input_aborts_before_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), OutputMode::Text);

        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, SetupError::InputMissing { .. }));
        assert!(!config.output.exists());
    }

    #[tokio::test]
    async fn test_empty_input_writes_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), OutputMode::Json);
        fs::write(&config.input, "\n  \n").unwrap();

        let summary = run(&config).await.unwrap();
        assert_eq!(summary.drain.dispatched, 0);
        assert!(summary.is_clean());
        assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
    }
}
