use thiserror::Error;

/// Contract violations raised while applying deltas.
///
/// None of these are expected at runtime when producers behave; they are
/// surfaced loudly instead of being masked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Empty patch path {0:?}: operations must address at least one segment")]
    EmptyPath(String),

    #[error("Revision mismatch on thread {thread_id}: expected {expected}, got {actual}")]
    RevisionMismatch {
        thread_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Delta for thread {actual} applied to draft of thread {expected}")]
    ThreadMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, ApplyError>;
