use draftline_core::ApplyError;
use draftline_persist::PersistError;
use thiserror::Error;

use crate::cases::CaseError;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Empty message")]
    EmptyMessage,

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Message {message_id} belongs to thread {message_thread_id}, not {thread_id}")]
    ForeignMessage {
        thread_id: String,
        message_id: String,
        message_thread_id: String,
    },

    #[error("Producer returned revision {actual} for thread {thread_id}, expected {expected}")]
    RevisionMismatch {
        thread_id: String,
        expected: u64,
        actual: u64,
    },

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Storage(#[from] PersistError),

    #[error(transparent)]
    Case(#[from] CaseError),

    #[error("Engine configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DraftError>;
