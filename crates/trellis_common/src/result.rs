//! Internal error type for broken graph invariants.

/// Result type for checks that can only fail because of a bug in Trellis.
///
/// User-facing conditions (a file that cannot be parsed, an instance whose
/// type is not defined anywhere) are not errors of this kind; they are
/// tracked states of the registry.
pub type TrellisResult<T> = Result<T, InternalError>;

/// An internal invariant violation, for example a referrer set that disagrees
/// with the top-module sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal invariant violated: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
