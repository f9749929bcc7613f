pub mod builder;
pub mod cases;
pub mod engine;
pub mod error;

pub use builder::DraftEngineBuilder;
pub use cases::{Case, CaseError, CasePolicy, CaseStatus, CaseTracker, ResolutionInput};
pub use engine::{AppliedDelta, DraftEngine, DraftView, EngineConfig, NewMessage, PostedMessage};
pub use error::{DraftError, Result};
