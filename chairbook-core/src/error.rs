//! Error types for the chairbook engine.

use thiserror::Error;

/// Errors that can occur at the fallible edges of the engine.
///
/// UI-level illegal transitions are not errors; the scheduler reports those
/// as ignored transitions instead.
#[derive(Error, Debug)]
pub enum ChairbookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid time window: {start} must be before {end}")]
    InvalidTimeWindow { start: String, end: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for chairbook operations.
pub type ChairbookResult<T> = Result<T, ChairbookError>;
