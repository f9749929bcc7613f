use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::apply::apply_delta;
use crate::delta::Delta;
use crate::document::initial_document;
use crate::error::{ApplyError, Result};

/// Per-thread draft: current revision, current document, and the ordered
/// log of every delta that produced it.
///
/// The only transition is [`DraftState::advance`], which moves the revision
/// forward by exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    pub thread_id: String,
    pub revision: u64,
    pub doc: Value,
    #[serde(default)]
    pub deltas: Vec<Delta>,
}

impl DraftState {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            revision: 0,
            doc: initial_document(),
            deltas: Vec::new(),
        }
    }

    /// Revision the next accepted delta must carry
    pub fn next_revision(&self) -> u64 {
        self.revision + 1
    }

    /// Apply `delta` and append it to the log.
    ///
    /// Either the revision, document and log all change, or nothing does.
    pub fn advance(&mut self, delta: Delta) -> Result<&Value> {
        if delta.thread_id != self.thread_id {
            return Err(ApplyError::ThreadMismatch {
                expected: self.thread_id.clone(),
                actual: delta.thread_id,
            });
        }
        if delta.revision != self.next_revision() {
            return Err(ApplyError::RevisionMismatch {
                thread_id: self.thread_id.clone(),
                expected: self.next_revision(),
                actual: delta.revision,
            });
        }

        let next = apply_delta(&self.doc, &delta)?;
        self.revision = delta.revision;
        self.doc = next;
        self.deltas.push(delta);
        Ok(&self.doc)
    }

    /// Document this delta would produce, without recording anything.
    pub fn preview(&self, delta: &Delta) -> Result<Value> {
        apply_delta(&self.doc, delta)
    }

    /// Rebuild the document from the initial value and the full log.
    pub fn replay(&self) -> Result<Value> {
        self.deltas
            .iter()
            .try_fold(initial_document(), |doc, delta| apply_delta(&doc, delta))
    }

    /// The last `n` entries of the delta log, oldest first.
    pub fn recent_deltas(&self, n: usize) -> &[Delta] {
        let start = self.deltas.len().saturating_sub(n);
        &self.deltas[start..]
    }
}
