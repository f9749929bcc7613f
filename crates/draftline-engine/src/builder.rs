use std::sync::Arc;

use draftline_persist::{InMemoryPersistenceClient, PersistenceClient};
use draftline_producer::DeltaProducer;

use crate::cases::{CasePolicy, CaseTracker};
use crate::engine::{DraftEngine, EngineConfig};
use crate::error::{DraftError, Result};

/// Builder for [`DraftEngine`]
///
/// A producer is required. Storage defaults to the in-memory backend and case
/// tracking is off unless a policy is given.
pub struct DraftEngineBuilder {
    store: Option<Arc<dyn PersistenceClient>>,
    producer: Option<Arc<dyn DeltaProducer>>,
    case_policy: Option<CasePolicy>,
    config: EngineConfig,
}

impl DraftEngineBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            producer: None,
            case_policy: None,
            config: EngineConfig::default(),
        }
    }

    pub fn store(mut self, store: Arc<dyn PersistenceClient>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn producer(mut self, producer: Arc<dyn DeltaProducer>) -> Self {
        self.producer = Some(producer);
        self
    }

    pub fn cases(mut self, policy: CasePolicy) -> Self {
        self.case_policy = Some(policy);
        self
    }

    pub fn recent_deltas(mut self, n: usize) -> Self {
        self.config.recent_deltas = n;
        self
    }

    pub fn auto_create_threads(mut self, enabled: bool) -> Self {
        self.config.auto_create_threads = enabled;
        self
    }

    pub fn build(self) -> Result<DraftEngine> {
        let producer = self
            .producer
            .ok_or_else(|| DraftError::Config("producer is required".to_string()))?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryPersistenceClient::new()));
        let cases = self.case_policy.map(|p| Arc::new(CaseTracker::new(p)));

        Ok(DraftEngine::new(store, producer, cases, self.config))
    }
}

impl Default for DraftEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
