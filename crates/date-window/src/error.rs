//! Error types for date window resolution.
//!
//! Only configuration mistakes and calendar overflow surface here. Tokens the
//! resolver cannot understand are logged and skipped, never returned as errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateWindowError {
    #[error("Invalid date math: {0}")]
    InvalidDateMath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, DateWindowError>;
