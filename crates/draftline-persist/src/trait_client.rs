use async_trait::async_trait;
use draftline_core::{DraftState, Message, Thread};

use crate::error::Result;

/// Storage operations for threads, their messages and the per-thread draft
///
/// Implementations must keep messages in append order and return the last
/// draft written for a thread. Callers serialize writes per thread.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Store a new thread together with its initial draft
    async fn create_thread(&self, thread: Thread, draft: DraftState) -> Result<()>;

    /// Get a thread by ID
    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// List threads, newest first
    async fn list_threads(&self, limit: Option<i64>, skip: Option<i64>) -> Result<Vec<Thread>>;

    /// Append a message to its thread
    async fn save_message(&self, message: Message) -> Result<()>;

    /// All messages of a thread in the order they were appended
    async fn get_messages(&self, thread_id: &str) -> Result<Vec<Message>>;

    /// Current draft of a thread
    async fn get_draft(&self, thread_id: &str) -> Result<Option<DraftState>>;

    /// Replace the stored draft of a thread
    async fn save_draft(&self, draft: DraftState) -> Result<()>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
