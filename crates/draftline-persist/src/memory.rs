use std::collections::HashMap;

use async_trait::async_trait;
use draftline_core::{DraftState, Message, Thread};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::retention::HighlightRetention;
use crate::trait_client::PersistenceClient;

/// Process-local storage. Everything is lost when the process exits.
#[derive(Default)]
pub struct InMemoryPersistenceClient {
    threads: RwLock<HashMap<String, Thread>>,
    messages: RwLock<HashMap<String, Vec<Message>>>,
    drafts: RwLock<HashMap<String, DraftState>>,
    retention: HighlightRetention,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(mut self, retention: HighlightRetention) -> Self {
        self.retention = retention;
        self
    }
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
    async fn create_thread(&self, thread: Thread, draft: DraftState) -> Result<()> {
        let mut threads = self.threads.write().await;
        if threads.contains_key(&thread.id) {
            return Err(PersistError::ThreadExists(thread.id));
        }

        self.drafts
            .write()
            .await
            .insert(thread.id.clone(), self.retention.apply(draft));
        self.messages.write().await.entry(thread.id.clone()).or_default();
        tracing::debug!(thread_id = %thread.id, "Thread stored in memory");
        threads.insert(thread.id.clone(), thread);
        Ok(())
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        Ok(self.threads.read().await.get(thread_id).cloned())
    }

    async fn list_threads(&self, limit: Option<i64>, skip: Option<i64>) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self.threads.read().await.values().cloned().collect();
        threads.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = skip.unwrap_or(0).max(0) as usize;
        let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(threads.into_iter().skip(skip).take(limit).collect())
    }

    async fn save_message(&self, message: Message) -> Result<()> {
        if !self.threads.read().await.contains_key(&message.thread_id) {
            return Err(PersistError::ThreadNotFound(message.thread_id));
        }
        self.messages
            .write()
            .await
            .entry(message.thread_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn get_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .read()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_draft(&self, thread_id: &str) -> Result<Option<DraftState>> {
        Ok(self.drafts.read().await.get(thread_id).cloned())
    }

    async fn save_draft(&self, draft: DraftState) -> Result<()> {
        if !self.threads.read().await.contains_key(&draft.thread_id) {
            return Err(PersistError::ThreadNotFound(draft.thread_id));
        }
        let draft = self.retention.apply(draft);
        tracing::debug!(thread_id = %draft.thread_id, revision = draft.revision, "Draft stored in memory");
        self.drafts.write().await.insert(draft.thread_id.clone(), draft);
        Ok(())
    }
}
