//! Error types for the `dvdoll` crate.
//!
//! This module defines [`DvdollError`], the unified error type returned by all
//! fallible operations in the crate. Every variant renders the exact message
//! printed after `ERROR:` when the session aborts.

use std::{io::Error as IoError, process::ExitStatus};

use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `dvdoll` operations.
///
/// None of these are recoverable: the binary prints the message and exits
/// with status 1.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DvdollError {
    /// A required external program could not be found.
    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    /// A required session value was left empty.
    #[error("{0} is required.")]
    MissingValue(&'static str),

    /// A title or chapter number was zero or not a number.
    #[error("{0} must be greater than zero.")]
    NotPositive(&'static str),

    /// `ffprobe` printed nothing for the first audio stream.
    #[error("no audio codec detected. Check if ffprobe is in your PATH and the input is valid")]
    NoAudioCodec,

    /// An external program ran but exited unsuccessfully.
    #[error("{program} failed ({status}){}", format_stderr(.stderr))]
    ToolFailed {
        /// Program that was executed.
        program: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
        /// Captured standard error, empty when stderr was inherited.
        stderr: String,
    },

    /// An external program could not be started at all.
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        /// Program that was executed.
        program: String,
        /// Underlying OS error.
        #[source]
        source: IoError,
    },

    /// An I/O error occurred while talking to the terminal.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// The title list could not be serialized.
    #[error("JSON error: {0}")]
    JsonError(#[from] JsonError),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::DvdollError;

    #[test]
    fn messages_match_session_wording() {
        assert_eq!(
            DvdollError::ToolNotFound("ffprobe".to_string()).to_string(),
            "ffprobe not found in PATH"
        );
        assert_eq!(
            DvdollError::MissingValue("Input path").to_string(),
            "Input path is required."
        );
        assert_eq!(
            DvdollError::NotPositive("Last chapter").to_string(),
            "Last chapter must be greater than zero."
        );
    }
}
