//! Error types for the sakura-fx core.

use thiserror::Error;

/// Errors produced by engine construction and stepping.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero (or overflowed) when sizing a field or viewport.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A parameter value was present but unusable (e.g. a negative radius).
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A cell coordinate was outside the field bounds.
    #[error("index ({x}, {y}) out of bounds for field of size ({width}, {height})")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A data buffer did not match the declared field dimensions.
    #[error("dimension mismatch: expected {expected} cells, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// No engine is registered under the requested name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// Writing a snapshot or frame dump failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParam`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
