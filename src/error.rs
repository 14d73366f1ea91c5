//! Error types for the agcd-period library.

use thiserror::Error;

/// Result type alias for period estimation operations.
pub type Result<T> = std::result::Result<T, PeriodError>;

/// Errors that can occur during period estimation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeriodError {
    /// An input value cannot be used as an integer event timestamp.
    #[error("invalid event at index {index}: {reason}")]
    InputType { index: usize, reason: String },

    /// No events remain after preprocessing.
    #[error("empty input data")]
    EmptyData,

    /// Not enough distinct events to infer a period.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Statistics were requested before any votes were accumulated.
    #[error("histogram is empty: no candidate period received a vote")]
    EmptyHistogram,

    /// Input was declared sorted but is not in ascending order.
    #[error("events declared sorted but out of order at index {index}")]
    UnsortedInput { index: usize },

    /// Duplicate timestamps while deduplication is disabled.
    #[error("duplicate event {value} with deduplication disabled")]
    DuplicateEvent { value: i64 },

    /// The distance between first and last event does not fit in 63 bits.
    #[error("event span overflows a 64-bit signed difference")]
    SpanOverflow,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PeriodError {
    /// Whether the error describes the input events rather than estimator state.
    ///
    /// Callers scanning many event groups skip a group on a data error.
    pub fn is_data_error(&self) -> bool {
        !matches!(
            self,
            PeriodError::EmptyHistogram | PeriodError::InvalidParameter(_)
        )
    }
}
