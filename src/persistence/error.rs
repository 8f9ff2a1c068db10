//! This module contains the error types for the persistence layer.

use thiserror::Error;

/// Errors that can occur while loading or storing the threshold value.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading or writing the threshold file failed.
    #[error("Threshold storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored content could not be parsed as a threshold value.
    #[error("Malformed threshold content: {0:?}")]
    Malformed(String),
}
