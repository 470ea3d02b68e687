// src/error.rs

use thiserror::Error;

/// Errors raised while configuring, running or reporting a shrinkage simulation.
#[derive(Error, Debug)]
pub enum ShrinkageError {
    /// Invalid configuration, detected before the day loop starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A simulation invariant was violated (a floor or clamp let a bad value through).
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ShrinkageError>;
