// src/output/mod.rs
// =============================================================================
// Rendering and writing results.
//
// - format: OutputMode and the text/JSON renderers
// - sink: OutputSink, which writes each drained result as it arrives
// =============================================================================

mod format;
mod sink;

pub use format::OutputMode;
pub use sink::{OutputSink, SinkSummary};
