pub mod error;
pub mod fallback;
pub mod heuristic;
pub mod media;
pub mod model;
pub mod strategy;
pub mod templates;

pub use error::{ProducerError, ProducerFault};
pub use heuristic::HeuristicDeltaProducer;
pub use media::MediaAnalyzer;
pub use model::{ModelDeltaProducer, ModelProducerConfig};
pub use strategy::DeltaProducer;
pub use templates::{DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT_TEMPLATE, DEFAULT_VISION_PROMPT};
