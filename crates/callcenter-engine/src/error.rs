//! Error types for callcenter-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallCenterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid opening hours: {0}")]
    InvalidOpeningHours(String),

    #[error("No call center working days configured")]
    NoWorkingDays,
}

pub type Result<T> = std::result::Result<T, CallCenterError>;
