pub mod apply;
pub mod delta;
pub mod document;
pub mod error;
pub mod pointer;
pub mod state;
pub mod text;
pub mod thread;

pub use apply::{apply_delta, apply_ops};
pub use delta::{Delta, EvidenceRef, Highlight, HighlightKind, Operation};
pub use document::initial_document;
pub use error::{ApplyError, Result};
pub use state::DraftState;
pub use thread::{Message, Thread};
