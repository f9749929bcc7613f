use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::truncate_chars;
use crate::thread::Message;

/// Longest quote an evidence reference carries, in characters.
pub const MAX_QUOTE_CHARS: usize = 280;

/// A single patch instruction against a draft document.
///
/// `set`, `merge` and `append` all replace the value at `path`; the three
/// tags are kept apart on the wire so producers can state intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Set { path: String, value: Value },
    Merge { path: String, value: Value },
    Append { path: String, value: Value },
    Remove { path: String },
}

impl Operation {
    pub fn set(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Set {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self::Remove { path: path.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Set { path, .. }
            | Self::Merge { path, .. }
            | Self::Append { path, .. }
            | Self::Remove { path } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    NewParam,
    MissingInfo,
    Risk,
    NextStep,
    ResolutionSignal,
}

/// Where in a thread a highlight came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    pub thread_id: String,
    pub message_id: String,
    pub quote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_ids: Option<Vec<String>>,
}

impl EvidenceRef {
    /// Cite a whole message, quoting at most [`MAX_QUOTE_CHARS`] of it
    pub fn from_message(message: &Message) -> Self {
        Self {
            thread_id: message.thread_id.clone(),
            message_id: message.id.clone(),
            quote: truncate_chars(&message.text, MAX_QUOTE_CHARS),
            author_id: Some(message.author.clone()),
            ts: Some(message.created_at),
            media_ids: message.image_ref.clone().map(|r| vec![r]),
        }
    }
}

/// Annotation explaining why a delta matters. Never touches the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub kind: HighlightKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<EvidenceRef>,
}

impl Highlight {
    pub fn new(kind: HighlightKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: EvidenceRef) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

/// One atomic, versioned batch of document changes for a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub thread_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(rename = "draft_revision")]
    pub revision: u64,
    #[serde(default)]
    pub ops: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
}

impl Delta {
    pub fn new(thread_id: impl Into<String>, revision: u64) -> Self {
        Self {
            thread_id: thread_id.into(),
            case_id: None,
            revision,
            ops: Vec::new(),
            highlights: Vec::new(),
        }
    }

    pub fn with_op(mut self, op: Operation) -> Self {
        self.ops.push(op);
        self
    }

    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlights.push(highlight);
        self
    }

    pub fn with_case_id(mut self, case_id: Option<String>) -> Self {
        self.case_id = case_id;
        self
    }
}
