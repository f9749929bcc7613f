//! # Draftline
//!
//! Keeps one structured "case draft" per conversation thread and moves it
//! forward one revision per incoming message.
//!
//! Each message is turned into a [`Delta`] (ordered patch operations plus
//! evidence-linked highlights) by a [`DeltaProducer`], then applied to the
//! thread's document by the [`DraftEngine`]. Replaying the delta log from the
//! initial document always reproduces the current document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use draftline::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = DraftEngineBuilder::new()
//!         .producer(Arc::new(HeuristicDeltaProducer::new()?))
//!         .build()?;
//!
//!     let thread = engine.create_thread(None, None).await?;
//!     let posted = engine
//!         .post_message(&thread.id, NewMessage {
//!             author: Some("ana".into()),
//!             text: "temp 21C, pH 7.4".into(),
//!             image_ref: None,
//!         })
//!         .await?;
//!
//!     println!("{}", posted.applied.doc);
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! - **`draftline-core`**: document model, path resolver, delta applier, draft state
//! - **`draftline-llm`**: chat-completion client (OpenAI compatible)
//! - **`draftline-persist`**: storage trait, in-memory and MongoDB backends
//! - **`draftline-producer`**: heuristic and model-backed delta producers
//! - **`draftline-engine`**: thread registry, serialized apply, case tracking

pub mod prelude;

pub use draftline_core::{
    apply_delta, apply_ops, initial_document, ApplyError, Delta, DraftState, EvidenceRef,
    Highlight, HighlightKind, Message, Operation, Thread,
};

pub use draftline_llm::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, ClientFactory, Content,
    Message as ChatMessage, OpenAIClient, OpenAIConfig, ProviderConfig,
};

pub use draftline_persist::{
    HighlightRetention, InMemoryPersistenceClient, PersistError, PersistenceBuilder,
    PersistenceClient, StorageBackend,
};

#[cfg(feature = "mongodb")]
pub use draftline_persist::MongoPersistenceClient;

pub use draftline_producer::{
    DeltaProducer, HeuristicDeltaProducer, MediaAnalyzer, ModelDeltaProducer,
    ModelProducerConfig, ProducerError, ProducerFault,
};
pub use draftline_producer::fallback::{degraded_delta, FAULT_SUMMARY};

pub use draftline_engine::{
    AppliedDelta, Case, CaseError, CasePolicy, CaseStatus, CaseTracker, DraftEngine,
    DraftEngineBuilder, DraftError, DraftView, EngineConfig, NewMessage, PostedMessage,
    ResolutionInput,
};
