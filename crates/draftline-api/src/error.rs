use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use draftline::{ApplyError, CaseError, DraftError, PersistError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Case not found")]
    CaseNotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Draft apply error: {0}")]
    Apply(#[from] ApplyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DraftError> for ApiError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::EmptyMessage => Self::BadRequest(err.to_string()),
            DraftError::ThreadNotFound(id) => Self::ThreadNotFound(id),
            DraftError::Apply(e) => Self::Apply(e),
            DraftError::Storage(e) => Self::Persist(e),
            DraftError::Case(e) => e.into(),
            DraftError::Config(msg) => Self::Config(msg),
            DraftError::RevisionMismatch { .. } | DraftError::ForeignMessage { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<CaseError> for ApiError {
    fn from(err: CaseError) -> Self {
        match err {
            CaseError::NotFound(id) => Self::CaseNotFound(id),
            CaseError::InvalidOutcome(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ThreadNotFound(_) | ApiError::CaseNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Apply(ref e) => {
                tracing::error!("Draft apply error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Draft apply error".to_string())
            }
            ApiError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error".to_string())
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
