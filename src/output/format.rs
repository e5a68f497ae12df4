// src/output/format.rs
// =============================================================================
// Turns one FetchResult into the text that goes into the output file.
//
// Two modes, picked once per run:
// - Text: an indented block per result, meant for people
// - Json: one pretty-printed JSON document per result (3-space indent)
//
// Example text block for a success:
//
//     Code: 200
//     Headers:
//         content-type: [text/html]
//     Latency: 0.184210 sec
//
// and for a failure:
//
//   "https://bad.example" - error: request timeout
// =============================================================================

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::probe::{FetchResult, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-readable blocks
    Text,
    /// Pretty-printed JSON documents
    Json,
}

impl OutputMode {
    pub fn render(self, result: &FetchResult) -> serde_json::Result<String> {
        match self {
            OutputMode::Text => Ok(render_text(result)),
            OutputMode::Json => render_json(result),
        }
    }
}

pub fn render_text(result: &FetchResult) -> String {
    match &result.outcome {
        Outcome::Failure { url, error } => format!("\n{:?} - error: {}\n", url, error),
        Outcome::Success {
            status_code,
            headers,
        } => {
            let mut block = format!("\n\tCode: {}\n\tHeaders: \n", status_code);
            for (name, values) in headers {
                // Writing into a String can't fail
                let _ = writeln!(block, "\t\t{}: [{}]", name, values.join(", "));
            }
            let _ = writeln!(block, "\tLatency: {:.6} sec", result.latency.as_secs_f64());
            block
        }
    }
}

pub fn render_json(result: &FetchResult) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"   "));
    result.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::probe::Headers;
    use std::time::Duration;

    fn success() -> FetchResult {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), vec!["text/html".to_string()]);
        headers.insert(
            "set-cookie".to_string(),
            vec!["a=1".to_string(), "b=2".to_string()],
        );
        let mut result = FetchResult::success(200, headers);
        result.latency = Duration::from_millis(250);
        result
    }

    #[test]
    fn test_text_success_block() {
        assert_eq!(
            render_text(&success()),
            "\n\tCode: 200\n\tHeaders: \n\t\tcontent-type: [text/html]\n\t\tset-cookie: [a=1, b=2]\n\tLatency: 0.250000 sec\n"
        );
    }

    #[test]
    fn test_text_failure_line_quotes_url() {
        let result = FetchResult::failure("https://bad.example", &FetchError::Timeout);
        assert_eq!(
            render_text(&result),
            "\n\"https://bad.example\" - error: request timeout\n"
        );
    }

    #[test]
    fn test_json_uses_three_space_indent() {
        let rendered = render_json(&FetchResult::failure("x", &FetchError::Timeout)).unwrap();
        assert_eq!(
            rendered,
            "{\n   \"url\": \"x\",\n   \"error\": \"request timeout\",\n   \"latency\": 0.0\n}\n"
        );
    }

    #[test]
    fn test_json_success_omits_url_and_error() {
        let rendered = OutputMode::Json.render(&success()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(value.get("url").is_none());
        assert!(value.get("error").is_none());
        assert_eq!(value["status_code"], 200);
        assert_eq!(value["headers"]["set-cookie"][1], "b=2");
    }
}
