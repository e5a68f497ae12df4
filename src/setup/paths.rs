// src/setup/paths.rs
// =============================================================================
// File handling that happens before any request is sent.
//
// - validate_path: rejects empty paths and paths with '#'
// - read_input: the input file must already exist; read it whole
// - create_output: make missing parent directories, then create/truncate
//
// Every failure here is a SetupError and ends the run.
// =============================================================================

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::error::SetupError;

pub fn validate_path(path: &Path) -> Result<(), SetupError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(SetupError::EmptyPath);
    }
    if text.contains('#') {
        return Err(SetupError::InadmissiblePath {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

pub fn read_input(path: &Path) -> Result<String, SetupError> {
    validate_path(path)?;

    let metadata = fs::metadata(path).map_err(|_| SetupError::InputMissing {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(SetupError::InputNotAFile {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|source| SetupError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

pub fn create_output(path: &Path) -> Result<BufWriter<File>, SetupError> {
    validate_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!(dir = %parent.display(), "creating output directory");
            fs::create_dir_all(parent).map_err(|source| SetupError::CreateOutputDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let file = File::create(path).map_err(|source| SetupError::OpenOutput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}
