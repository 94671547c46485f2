//! Errors from parsing trigger descriptions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    /// A threshold needs exactly an element anchor and a viewport anchor.
    #[error("threshold '{0}' must have the form '<element> <viewport>'")]
    MalformedThreshold(String),

    #[error("unknown anchor '{0}' (expected top, center or bottom)")]
    UnknownAnchor(String),

    /// The part after `+=` / `-=` was not a number of pixels.
    #[error("bad pixel offset in '{0}'")]
    BadOffset(String),

    #[error("unknown toggle action '{0}'")]
    UnknownAction(String),

    /// Toggle actions come in fours: enter, leave, enter-back, leave-back.
    #[error("toggle actions need 4 entries, got {0}")]
    ToggleArity(usize),
}
