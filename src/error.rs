//! Errors raised while assembling or persisting networks

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// A shape or size parameter was zero
    #[error("{name} must be greater than zero")]
    EmptyDimension { name: &'static str },

    /// The convolution stack would shrink the sequence to nothing
    #[error("input has {timesteps} timesteps, the convolutional stack needs at least {minimum}")]
    SequenceTooShort { timesteps: usize, minimum: usize },

    #[error("checkpoint {path:?}: {reason}")]
    Checkpoint { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Reject zero-sized dimensions before they reach burn.
pub(crate) fn non_zero(name: &'static str, value: usize) -> Result<usize> {
    if value == 0 {
        Err(NetworkError::EmptyDimension { name })
    } else {
        Ok(value)
    }
}
