//! Prelude module for convenient imports
//!
//! ```rust
//! use draftline::prelude::*;
//! ```

pub use crate::{
    Delta, DraftState, Highlight, HighlightKind, Message, Operation, Thread,
    ChatClient, OpenAIClient,
    PersistenceClient, InMemoryPersistenceClient, HighlightRetention,
    DeltaProducer, HeuristicDeltaProducer, ModelDeltaProducer, ModelProducerConfig,
    DraftEngine, DraftEngineBuilder, DraftError, NewMessage,
};
