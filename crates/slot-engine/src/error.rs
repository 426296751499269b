//! Error types for slot-engine operations.

use thiserror::Error;

use crate::model::BookingStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid date format. Expected YYYY-MM-DD, got: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid event type field `{field}`: {reason}")]
    InvalidEventType { field: &'static str, reason: String },

    #[error("Invalid booking transition: {from:?} -> {to:?}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;

/// Failure reported by a data source behind one of the [`crate::source`] traits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("source timed out after {0} ms")]
    Timeout(u64),
}

impl From<SourceError> for SlotError {
    fn from(err: SourceError) -> Self {
        SlotError::Store(err.to_string())
    }
}
