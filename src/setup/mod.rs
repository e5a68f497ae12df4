// src/setup/mod.rs
// =============================================================================
// Everything that must succeed before the batch is dispatched: checking the
// input and output paths, and asking for the output format.
// =============================================================================

mod paths;
mod prompt;

pub use paths::{create_output, read_input};
pub use prompt::ask_output_mode;
