use thiserror::Error;

/// salescope error types
///
/// Data-quality problems (missing fields, bad dates, empty groups) never
/// surface here; they degrade to zeros, exclusions or sentinels instead.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Input had the wrong overall shape (e.g. not an array of records)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Failed to parse JSON/JSONL or a command-line value
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for salescope
pub type Result<T> = std::result::Result<T, AnalyticsError>;
