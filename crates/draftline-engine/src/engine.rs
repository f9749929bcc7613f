use std::sync::Arc;

use dashmap::DashMap;
use draftline_core::{Delta, DraftState, Message, Thread};
use draftline_persist::PersistenceClient;
use draftline_producer::DeltaProducer;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::cases::{Case, CaseTracker};
use crate::error::{DraftError, Result};

pub const DEFAULT_AUTHOR: &str = "anon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// How many log entries a draft view carries
    pub recent_deltas: usize,
    /// Create threads on first reference instead of reporting them missing
    pub auto_create_threads: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recent_deltas: 10,
            auto_create_threads: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub author: Option<String>,
    pub text: String,
    pub image_ref: Option<String>,
}

/// Outcome of running one message through the producer
#[derive(Debug, Clone)]
pub struct AppliedDelta {
    pub delta: Delta,
    pub doc: Value,
    /// False when the producer held the revision; `doc` is then a preview
    /// and nothing was stored
    pub recorded: bool,
}

#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub message: Message,
    pub applied: AppliedDelta,
    pub case: Option<Case>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftView {
    pub thread_id: String,
    pub revision: u64,
    pub doc: Value,
    pub recent_deltas: Vec<Delta>,
}

/// Thread registry and draft revision engine
///
/// Every change to a thread (message append, production, apply, persist)
/// runs under that thread's lock, so message order and delta order agree.
/// Different threads never wait on each other.
pub struct DraftEngine {
    store: Arc<dyn PersistenceClient>,
    producer: Arc<dyn DeltaProducer>,
    cases: Option<Arc<CaseTracker>>,
    config: EngineConfig,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl DraftEngine {
    pub fn new(
        store: Arc<dyn PersistenceClient>,
        producer: Arc<dyn DeltaProducer>,
        cases: Option<Arc<CaseTracker>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            producer,
            cases,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn cases(&self) -> Option<&Arc<CaseTracker>> {
        self.cases.as_ref()
    }

    pub fn producer_name(&self) -> &'static str {
        self.producer.name()
    }

    pub fn store(&self) -> &Arc<dyn PersistenceClient> {
        &self.store
    }

    async fn lock_thread(&self, thread_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Create a thread with its revision-0 draft
    pub async fn create_thread(&self, id: Option<String>, title: Option<String>) -> Result<Thread> {
        let mut thread = Thread::new(id);
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            thread = thread.with_title(title.trim());
        }

        let _guard = self.lock_thread(&thread.id).await;
        if let Some(existing) = self.store.get_thread(&thread.id).await? {
            return Ok(existing);
        }
        self.store
            .create_thread(thread.clone(), DraftState::new(thread.id.as_str()))
            .await?;

        tracing::info!(thread_id = %thread.id, "Thread created");
        Ok(thread)
    }

    /// Id of an existing thread, creating it when absent or when no id is given
    pub async fn ensure_thread(&self, id: Option<&str>) -> Result<String> {
        if let Some(id) = id {
            if self.store.get_thread(id).await?.is_some() {
                return Ok(id.to_string());
            }
        }
        let thread = self.create_thread(id.map(str::to_string), None).await?;
        Ok(thread.id)
    }

    /// Resolve a thread referenced by a caller, honouring `auto_create_threads`
    pub async fn resolve_thread(&self, id: &str) -> Result<String> {
        if self.config.auto_create_threads {
            return self.ensure_thread(Some(id)).await;
        }
        match self.store.get_thread(id).await? {
            Some(thread) => Ok(thread.id),
            None => Err(DraftError::ThreadNotFound(id.to_string())),
        }
    }

    pub async fn get_thread(&self, thread_id: &str) -> Result<Thread> {
        self.store
            .get_thread(thread_id)
            .await?
            .ok_or_else(|| DraftError::ThreadNotFound(thread_id.to_string()))
    }

    pub async fn list_threads(&self, limit: Option<i64>, skip: Option<i64>) -> Result<Vec<Thread>> {
        Ok(self.store.list_threads(limit, skip).await?)
    }

    pub async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        self.get_thread(thread_id).await?;
        Ok(self.store.get_messages(thread_id).await?)
    }

    /// Append a message to an existing thread's history
    pub async fn add_message(
        &self,
        thread_id: &str,
        author: &str,
        text: &str,
        image_ref: Option<String>,
    ) -> Result<Message> {
        let _guard = self.lock_thread(thread_id).await;
        self.append_message(thread_id, author, text, image_ref).await
    }

    async fn append_message(
        &self,
        thread_id: &str,
        author: &str,
        text: &str,
        image_ref: Option<String>,
    ) -> Result<Message> {
        self.get_thread(thread_id).await?;
        let message = Message::new(thread_id, author, text).with_image_ref(image_ref);
        self.store.save_message(message.clone()).await?;
        tracing::debug!(thread_id, message_id = %message.id, "Message appended");
        Ok(message)
    }

    /// Produce, apply and persist the delta for a message already in the thread
    pub async fn apply_new_message(&self, thread_id: &str, message: &Message) -> Result<AppliedDelta> {
        if message.thread_id != thread_id {
            return Err(DraftError::ForeignMessage {
                thread_id: thread_id.to_string(),
                message_id: message.id.clone(),
                message_thread_id: message.thread_id.clone(),
            });
        }
        let _guard = self.lock_thread(thread_id).await;
        let case_id = self.case_id_for(thread_id).await;
        self.produce_and_apply(thread_id, message, case_id).await
    }

    /// Validate, append and apply a new message as one step
    pub async fn post_message(&self, thread_id: &str, input: NewMessage) -> Result<PostedMessage> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(DraftError::EmptyMessage);
        }
        let author = input
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_AUTHOR);
        let image_ref = input.image_ref.filter(|r| !r.trim().is_empty());

        let thread_id = self.resolve_thread(thread_id).await?;
        let _guard = self.lock_thread(&thread_id).await;

        let message = self.append_message(&thread_id, author, text, image_ref).await?;
        let case = match &self.cases {
            Some(tracker) => Some(tracker.record_message(&message).await),
            None => None,
        };
        let case_id = case.as_ref().map(|c| c.id.clone());
        let applied = self.produce_and_apply(&thread_id, &message, case_id).await?;

        Ok(PostedMessage {
            message,
            applied,
            case,
        })
    }

    async fn case_id_for(&self, thread_id: &str) -> Option<String> {
        match &self.cases {
            Some(tracker) => tracker.case_for_thread(thread_id).await.map(|c| c.id),
            None => None,
        }
    }

    /// Caller must hold the thread lock
    async fn produce_and_apply(
        &self,
        thread_id: &str,
        message: &Message,
        case_id: Option<String>,
    ) -> Result<AppliedDelta> {
        let mut state = self
            .store
            .get_draft(thread_id)
            .await?
            .ok_or_else(|| DraftError::ThreadNotFound(thread_id.to_string()))?;

        let delta = self
            .producer
            .produce(thread_id, message, &state)
            .await
            .with_case_id(case_id);

        if delta.revision == state.revision {
            let doc = state.preview(&delta)?;
            tracing::warn!(
                thread_id,
                revision = state.revision,
                producer = self.producer.name(),
                "Producer held the revision, delta not recorded"
            );
            return Ok(AppliedDelta {
                delta,
                doc,
                recorded: false,
            });
        }
        if delta.revision != state.next_revision() {
            return Err(DraftError::RevisionMismatch {
                thread_id: thread_id.to_string(),
                expected: state.next_revision(),
                actual: delta.revision,
            });
        }

        let doc = state.advance(delta.clone())?.clone();
        self.store.save_draft(state).await?;

        tracing::info!(
            thread_id,
            revision = delta.revision,
            ops = delta.ops.len(),
            highlights = delta.highlights.len(),
            "Draft advanced"
        );
        Ok(AppliedDelta {
            delta,
            doc,
            recorded: true,
        })
    }

    /// Current draft with the configured suffix of its delta log
    pub async fn get_draft(&self, thread_id: &str) -> Result<DraftView> {
        let thread_id = self.resolve_thread(thread_id).await?;
        let state = self
            .store
            .get_draft(&thread_id)
            .await?
            .ok_or_else(|| DraftError::ThreadNotFound(thread_id.clone()))?;

        Ok(DraftView {
            recent_deltas: state.recent_deltas(self.config.recent_deltas).to_vec(),
            thread_id: state.thread_id,
            revision: state.revision,
            doc: state.doc,
        })
    }
}
