// src/setup/prompt.rs
// =============================================================================
// Asks the user which output format to use when --format wasn't given.
//
// The answer must be exactly "Yes" (JSON) or "No" (text). Anything else
// re-prints the hint and reads another line. Running out of input before a
// valid answer is a setup error, so a closed stdin can't loop forever.
// =============================================================================

use std::io::{BufRead, Write};

use crate::error::SetupError;
use crate::output::OutputMode;

const HINT: &str = "Please, enter either Yes or No:";

pub fn ask_output_mode<R, W>(mut input: R, mut out: W) -> Result<OutputMode, SetupError>
where
    R: BufRead,
    W: Write,
{
    let io_err = |source| SetupError::PromptIo { source };

    write!(out, "Would you like output in json. {}", HINT).map_err(io_err)?;
    out.flush().map_err(io_err)?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(SetupError::PromptClosed);
        }

        match line.trim_end_matches(['\r', '\n']) {
            "Yes" => return Ok(OutputMode::Json),
            "No" => return Ok(OutputMode::Text),
            _ => {
                write!(out, "Invalid input. {}", HINT).map_err(io_err)?;
                out.flush().map_err(io_err)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answers: &str) -> (Result<OutputMode, SetupError>, String) {
        let mut out = Vec::new();
        let result = ask_output_mode(answers.as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_yes_selects_json() {
        let (mode, printed) = ask("Yes\n");
        assert_eq!(mode.unwrap(), OutputMode::Json);
        assert_eq!(printed, "Would you like output in json. Please, enter either Yes or No:");
    }

    #[test]
    fn test_no_selects_text() {
        let (mode, _) = ask("No\r\n");
        assert_eq!(mode.unwrap(), OutputMode::Text);
    }

    #[test]
    fn test_reprompts_until_valid() {
        let (mode, printed) = ask("yes\nmaybe\nNo\n");
        assert_eq!(mode.unwrap(), OutputMode::Text);
        assert_eq!(printed.matches("Invalid input.").count(), 2);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let (mode, _) = ask("what\n");
        assert!(matches!(mode, Err(SetupError::PromptClosed)));
    }
}
