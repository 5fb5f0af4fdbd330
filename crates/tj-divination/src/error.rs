//! Error types for the casters.

use thiserror::Error;

/// Result type for divination operations.
pub type DivinationResult<T> = Result<T, DivinationError>;

/// Errors that can occur while casting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DivinationError {
    /// Caller input is out of domain, e.g. a zero the caller did not replace.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Calendar resolution failed.
    #[error("{0}")]
    Calendar(#[from] tj_calendar::CalendarError),
}
