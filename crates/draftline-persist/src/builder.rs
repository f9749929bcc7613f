use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::memory::InMemoryPersistenceClient;
use crate::retention::HighlightRetention;
use crate::trait_client::PersistenceClient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

/// Builds the configured storage backend behind a trait object
pub struct PersistenceBuilder {
    backend: StorageBackend,
    mongodb_uri: Option<String>,
    database: Option<String>,
    retention: HighlightRetention,
}

impl PersistenceBuilder {
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::Memory,
            mongodb_uri: None,
            database: None,
            retention: HighlightRetention::Keep,
        }
    }

    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub fn highlights(mut self, retention: HighlightRetention) -> Self {
        self.retention = retention;
        self
    }

    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        tracing::info!(backend = ?self.backend, highlights = ?self.retention, "Building storage backend");
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(
                InMemoryPersistenceClient::new().with_retention(self.retention),
            )),
            StorageBackend::Mongodb => self.build_mongo().await,
        }
    }

    #[cfg(feature = "mongodb")]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        let uri = self
            .mongodb_uri
            .ok_or_else(|| PersistError::Config("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| PersistError::Config("database is required".to_string()))?;

        let client = crate::dbs::mongo::MongoPersistenceClient::connect(&uri, &database)
            .await?
            .with_retention(self.retention);
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "mongodb"))]
    async fn build_mongo(self) -> Result<Arc<dyn PersistenceClient>> {
        Err(PersistError::Config(
            "mongodb backend requested but this build lacks the `mongodb` feature".to_string(),
        ))
    }
}

impl Default for PersistenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftline_core::{DraftState, Thread};

    #[tokio::test]
    async fn test_memory_backend_is_default() {
        let client = PersistenceBuilder::new().build().await.unwrap();
        let thread = Thread::new(Some("t1".to_string()));
        client
            .create_thread(thread, DraftState::new("t1"))
            .await
            .unwrap();
        assert!(client.get_thread("t1").await.unwrap().is_some());
    }

    #[cfg(not(feature = "mongodb"))]
    #[tokio::test]
    async fn test_mongodb_without_feature_is_config_error() {
        let result = PersistenceBuilder::new()
            .backend(StorageBackend::Mongodb)
            .build()
            .await;
        assert!(matches!(result, Err(PersistError::Config(_))));
    }
}
