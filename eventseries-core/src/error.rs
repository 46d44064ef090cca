//! Error types for series generation.

use thiserror::Error;

/// Errors that can occur while generating an event series.
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("No sessions match the selected dates and days")]
    NoOccurrencesGenerated,

    #[error("Invalid weekday index {0} (expected 0=Sunday through 6=Saturday)")]
    InvalidWeekday(u8),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),
}

impl SeriesError {
    /// True when the error stems from what the submitter entered rather than
    /// from a technical failure. Callers should re-prompt for these.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            SeriesError::InvalidRange(_)
                | SeriesError::NoOccurrencesGenerated
                | SeriesError::InvalidWeekday(_)
                | SeriesError::InvalidTime(_)
        )
    }
}

/// Result type alias for series operations.
pub type SeriesResult<T> = Result<T, SeriesError>;
