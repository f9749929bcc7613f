use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to threads created without one.
pub const DEFAULT_THREAD_TITLE: &str = "Untitled thread";

/// A conversation context owning exactly one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    /// Create a thread, generating an id when none is supplied
    pub fn new(id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: DEFAULT_THREAD_TITLE.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// A single message in a thread. Append-only: never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub thread_id: String,
    pub author: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        thread_id: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            thread_id: thread_id.into(),
            author: author.into(),
            text: text.into(),
            image_ref: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_image_ref(mut self, image_ref: Option<String>) -> Self {
        self.image_ref = image_ref;
        self
    }
}
