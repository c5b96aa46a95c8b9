use thiserror::Error;

use kp_access::Kind;

// -----------------------------------------------------------------------------
// Error

/// A failure specific to the containers of this crate.
///
/// Reported as the backend cause of a [`kp_access::Error`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ObjectError {
    #[error("index {index} is out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("cannot materialize a container of kind {0}")]
    UnsupportedHint(Kind),
}
