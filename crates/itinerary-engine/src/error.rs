//! Error types for itinerary-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),

    #[error("Invalid pace: {0}")]
    InvalidPace(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Suggestion store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PlannerError {
    /// Wrap an error raised by a persistence backend.
    pub fn store<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        PlannerError::Store(err.into())
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
