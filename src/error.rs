//! Top-level error type for the `tonto-lint` binary.
//!
//! The library never fails: `analyze` always returns a result, however many
//! diagnostics it collected (spec.md §7). Only the binary's I/O boundary —
//! reading the file, decoding it as UTF-8 — can fail outright (spec.md
//! §6.2, "non-UTF-8 input is rejected by the caller, not the core").

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CliError {
    Io { path: PathBuf, source: std::io::Error },
    NotUtf8 { path: PathBuf },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io { path, source } => write!(f, "failed to read '{}': {source}", path.display()),
            CliError::NotUtf8 { path } => write!(f, "'{}' is not valid UTF-8", path.display()),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io { source, .. } => Some(source),
            CliError::NotUtf8 { .. } => None,
        }
    }
}
