//! Error types for the keystroke logger
//!
//! None of these escape the public logging surface: `InputEventLogger`
//! converts them into booleans and `FlushOutcome`s so the host editor never
//! has to handle a logging failure.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while managing the log file
#[derive(Debug, Error)]
pub enum CmdlogError {
    /// No log directory is configured
    #[error("command logging is disabled (no log directory configured)")]
    Disabled,

    /// The log file could not be opened or created
    #[error("Cannot open cmdlog {}", path.display())]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Appending a line failed
    #[error("failed to write cmdlog line: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for logger operations
pub type CmdlogResult<T> = Result<T, CmdlogError>;
