//! Error types for the NCE core library.
//!
//! The activation engine and the memory stores never fail: every lookup is
//! total and returns an absence signal. Errors only arise at the edges of
//! the system, while loading data files or configuration.

use thiserror::Error;

/// Top-level error type for all NCE operations.
#[derive(Error, Debug)]
pub enum NceError {
    /// A data file was structurally malformed.
    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        /// Which file (or `<memory>` for in-memory sources) failed.
        file: String,
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, NceError>;
