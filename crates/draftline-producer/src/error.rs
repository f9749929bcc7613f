use std::time::Duration;

use thiserror::Error;

/// Why a model-backed production attempt failed. Absorbed by the producer
/// and turned into a degraded delta.
#[derive(Error, Debug)]
pub enum ProducerFault {
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model request failed: {0}")]
    Request(String),

    #[error("model reply had no content")]
    EmptyReply,

    #[error("model reply is not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

impl ProducerFault {
    /// Stable label written into the degraded document
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "Timeout",
            Self::Request(_) => "RequestError",
            Self::EmptyReply => "EmptyReply",
            Self::MalformedReply(_) => "MalformedReply",
        }
    }
}

/// Errors raised while building a producer
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read prompt template {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
