use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use draftline::{
    CasePolicy, ClientFactory, DeltaProducer, DraftEngine, DraftEngineBuilder,
    HeuristicDeltaProducer, ModelDeltaProducer, ModelProducerConfig, OpenAIConfig,
    PersistenceBuilder, ProviderConfig,
};

use crate::config::{Config, ProducerStrategy};

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<DraftEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: DraftEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }

    /// Wire storage, producer and engine from configuration
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let mut storage = PersistenceBuilder::new()
            .backend(config.storage.backend)
            .database(config.storage.database.clone())
            .highlights(config.storage.highlights);
        if !config.mongodb_uri.is_empty() {
            storage = storage.mongodb_uri(config.mongodb_uri.clone());
        }
        let store = storage.build().await.context("Failed to initialize storage")?;
        tracing::info!(backend = ?config.storage.backend, "Storage ready");

        let producer = build_producer(&config)?;
        tracing::info!(strategy = producer.name(), "Delta producer ready");

        let mut builder = DraftEngineBuilder::new()
            .store(store)
            .producer(producer)
            .recent_deltas(config.draft.recent_deltas)
            .auto_create_threads(config.draft.auto_create_threads);
        if config.cases.enabled {
            builder = builder.cases(CasePolicy {
                follow_up_days: config.cases.follow_up_days,
                max_follow_ups: config.cases.max_follow_ups,
            });
        }
        let engine = builder.build()?;

        Ok(Self::new(config, engine))
    }
}

fn build_producer(config: &Config) -> anyhow::Result<Arc<dyn DeltaProducer>> {
    match config.producer.strategy {
        ProducerStrategy::Heuristic => Ok(Arc::new(HeuristicDeltaProducer::new()?)),
        ProducerStrategy::Model => {
            let mut provider = OpenAIConfig::new(config.openai_api_key.clone());
            if let Some(base_url) = &config.openai_base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            let client = ClientFactory::create_chat_client(ProviderConfig::OpenAI(provider))?;

            let mut producer_config = ModelProducerConfig::default()
                .with_model(config.producer.model.clone())
                .with_vision_model(config.producer.vision_model.clone())
                .with_timeout(Duration::from_millis(config.producer.timeout_ms));
            if let Some(path) = &config.producer.prompt_path {
                producer_config = producer_config.with_system_prompt_file(path)?;
            }
            if let Some(path) = &config.producer.vision_prompt_path {
                producer_config = producer_config.with_vision_prompt_file(path)?;
            }

            Ok(Arc::new(ModelDeltaProducer::new(client, producer_config)))
        }
    }
}
