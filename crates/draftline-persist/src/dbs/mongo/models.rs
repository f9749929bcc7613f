use chrono::{DateTime, Utc};
use draftline_core::{Delta, DraftState, Message, Thread};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Thread document. The thread id is the primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Message document. `seq` is the position within the thread and gives the
/// append order back on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub thread_id: String,
    pub seq: i64,
    pub author: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Draft document, keyed by thread id. `summary` is denormalized from `doc`
/// so listings do not need to decode the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDraft {
    #[serde(rename = "_id")]
    pub thread_id: String,
    pub revision: i64,
    pub summary: String,
    pub doc: Value,
    #[serde(default)]
    pub deltas: Vec<Delta>,
    pub updated_at: DateTime<Utc>,
}

impl From<Thread> for MongoThread {
    fn from(thread: Thread) -> Self {
        Self {
            id: thread.id,
            title: thread.title,
            created_at: thread.created_at,
        }
    }
}

impl From<MongoThread> for Thread {
    fn from(thread: MongoThread) -> Self {
        Self {
            id: thread.id,
            title: thread.title,
            created_at: thread.created_at,
        }
    }
}

impl MongoMessage {
    pub fn from_message(msg: Message, seq: i64) -> Self {
        Self {
            id: msg.id,
            thread_id: msg.thread_id,
            seq,
            author: msg.author,
            text: msg.text,
            image_ref: msg.image_ref,
            created_at: msg.created_at,
        }
    }
}

impl From<MongoMessage> for Message {
    fn from(msg: MongoMessage) -> Self {
        Self {
            id: msg.id,
            thread_id: msg.thread_id,
            author: msg.author,
            text: msg.text,
            image_ref: msg.image_ref,
            created_at: msg.created_at,
        }
    }
}

impl From<DraftState> for MongoDraft {
    fn from(draft: DraftState) -> Self {
        Self {
            summary: draftline_core::document::summary(&draft.doc).to_string(),
            revision: i64::try_from(draft.revision).unwrap_or(i64::MAX),
            thread_id: draft.thread_id,
            doc: draft.doc,
            deltas: draft.deltas,
            updated_at: Utc::now(),
        }
    }
}

impl From<MongoDraft> for DraftState {
    fn from(draft: MongoDraft) -> Self {
        Self {
            thread_id: draft.thread_id,
            revision: u64::try_from(draft.revision).unwrap_or_default(),
            doc: draft.doc,
            deltas: draft.deltas,
        }
    }
}
