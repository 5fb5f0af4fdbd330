//! Error types for calendar resolution.

/// Alias for `Result<T, CalendarError>`.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Errors raised while adjusting or resolving a timestamp.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Caller input is malformed or outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The calendar-conversion collaborator could not answer, or answered
    /// with data that breaks the sexagenary invariants.
    #[error("calendar unavailable: {0}")]
    CalendarUnavailable(String),
}
