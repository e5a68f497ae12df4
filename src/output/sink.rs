// src/output/sink.rs
// =============================================================================
// Writes rendered results to the output destination as they are drained.
//
// A failed write is logged and counted, then the next result is written as
// usual. The run keeps going; the count shows up in the final exit code.
// =============================================================================

use std::io::Write;

use tracing::error;

use super::format::OutputMode;
use crate::probe::{FetchResult, ResultSink};

pub struct OutputSink<W: Write> {
    writer: W,
    mode: OutputMode,
    written: usize,
    failed: usize,
}

/// Counters returned once the sink is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkSummary {
    pub written: usize,
    pub failed: usize,
}

impl<W: Write> OutputSink<W> {
    pub fn new(writer: W, mode: OutputMode) -> Self {
        Self {
            writer,
            mode,
            written: 0,
            failed: 0,
        }
    }

    /// Flushes buffered output and returns the counters.
    pub fn finish(mut self) -> (W, SinkSummary) {
        if let Err(e) = self.writer.flush() {
            error!(error = %e, "failure when flushing output");
            self.failed += 1;
        }
        let summary = SinkSummary {
            written: self.written,
            failed: self.failed,
        };
        (self.writer, summary)
    }
}

impl<W: Write> ResultSink for OutputSink<W> {
    fn accept(&mut self, result: FetchResult) {
        let rendered = match self.mode.render(&result) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!(error = %e, "failure when marshaling to json");
                self.failed += 1;
                return;
            }
        };

        match self.writer.write_all(rendered.as_bytes()) {
            Ok(()) => self.written += 1,
            Err(e) => {
                error!(error = %e, "failure when writing to output");
                self.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::probe::Headers;
    use std::io;

    // Fails every other write
    struct Flaky {
        calls: usize,
        data: Vec<u8>,
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_rendering_per_result() {
        let mut sink = OutputSink::new(Vec::new(), OutputMode::Json);
        sink.accept(FetchResult::success(200, Headers::new()));
        sink.accept(FetchResult::failure("http://127.0.0.1:1/", &FetchError::Timeout));
        sink.accept(FetchResult::success(503, Headers::new()));

        let (buf, summary) = sink.finish();
        assert_eq!(summary, SinkSummary { written: 3, failed: 0 });

        let text = String::from_utf8(buf).unwrap();
        let docs: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&text)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[1]["error"], "request timeout");
        assert_eq!(docs[2]["status_code"], 503);
    }

    #[test]
    fn test_write_failure_does_not_stop_later_results() {
        let writer = Flaky {
            calls: 0,
            data: Vec::new(),
        };
        let mut sink = OutputSink::new(writer, OutputMode::Text);
        for code in [200, 201, 202] {
            sink.accept(FetchResult::success(code, Headers::new()));
        }

        let (writer, summary) = sink.finish();
        assert_eq!(summary, SinkSummary { written: 2, failed: 1 });
        let text = String::from_utf8(writer.data).unwrap();
        assert!(text.contains("Code: 200"));
        assert!(!text.contains("Code: 201"));
        assert!(text.contains("Code: 202"));
    }
}
