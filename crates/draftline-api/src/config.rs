use config::{builder::DefaultState, Config as ConfigLoader, ConfigBuilder, ConfigError, File};
use draftline::{HighlightRetention, StorageBackend};
use serde::Deserialize;
use std::path::Path;

/// Environment variables that override single config keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("CORS_ENABLED", "cors.enabled"),
    ("STORAGE_BACKEND", "storage.backend"),
    ("STORAGE_DATABASE", "storage.database"),
    ("STORAGE_HIGHLIGHTS", "storage.highlights"),
    ("PRODUCER_STRATEGY", "producer.strategy"),
    ("PRODUCER_MODEL", "producer.model"),
    ("PRODUCER_VISION_MODEL", "producer.vision_model"),
    ("PRODUCER_TIMEOUT_MS", "producer.timeout_ms"),
    ("PRODUCER_PROMPT_PATH", "producer.prompt_path"),
    ("PRODUCER_VISION_PROMPT_PATH", "producer.vision_prompt_path"),
    ("DRAFT_RECENT_DELTAS", "draft.recent_deltas"),
    ("DRAFT_AUTO_CREATE_THREADS", "draft.auto_create_threads"),
    ("CASES_ENABLED", "cases.enabled"),
    ("CASES_FOLLOW_UP_DAYS", "cases.follow_up_days"),
    ("CASES_MAX_FOLLOW_UPS", "cases.max_follow_ups"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub producer: ProducerConfig,
    pub draft: DraftConfig,
    pub cases: CasesConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    pub mongodb_uri: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database: String,
    pub highlights: HighlightRetention,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database: "draftline".to_string(),
            highlights: HighlightRetention::Keep,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProducerStrategy {
    #[default]
    Heuristic,
    Model,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    pub strategy: ProducerStrategy,
    pub model: String,
    pub vision_model: String,
    pub timeout_ms: u64,
    pub prompt_path: Option<String>,
    pub vision_prompt_path: Option<String>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            strategy: ProducerStrategy::Heuristic,
            model: "gpt-3.5-turbo".to_string(),
            vision_model: "gpt-4o-mini".to_string(),
            timeout_ms: 30_000,
            prompt_path: None,
            vision_prompt_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub recent_deltas: usize,
    pub auto_create_threads: bool,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            recent_deltas: 10,
            auto_create_threads: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CasesConfig {
    pub enabled: bool,
    pub follow_up_days: i64,
    pub max_follow_ups: u32,
}

impl Default for CasesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            follow_up_days: 7,
            max_follow_ups: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, STORAGE_, PRODUCER_, DRAFT_, CASES_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        Self::from_builder(builder, |key| std::env::var(key).ok())
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Apply environment overrides and secrets looked up through `env`,
    /// then check that the chosen backends have what they need
    pub fn from_builder(
        mut builder: ConfigBuilder<DefaultState>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        for &(var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, env(var))?;
        }
        if let Some(origins) = env("CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            builder = builder.set_override("cors.origins", origins)?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets come from ENV only, never from TOML
        cfg.mongodb_uri = env("MONGODB_URI").unwrap_or_default();
        cfg.openai_api_key = env("OPENAI_API_KEY").unwrap_or_default();
        cfg.openai_base_url = env("OPENAI_BASE_URL").filter(|u| !u.is_empty());

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.producer.strategy == ProducerStrategy::Model && self.openai_api_key.is_empty() {
            return Err(ConfigError::Message(
                "OPENAI_API_KEY environment variable is required when producer.strategy = \"model\""
                    .to_string(),
            ));
        }
        if self.server.request_timeout_secs.saturating_mul(1000) <= self.producer.timeout_ms {
            return Err(ConfigError::Message(format!(
                "server.request_timeout_secs ({}s) must exceed producer.timeout_ms ({}ms) \
                 so producer faults reach the client as degraded drafts",
                self.server.request_timeout_secs, self.producer.timeout_ms
            )));
        }
        if self.storage.backend == StorageBackend::Mongodb && self.mongodb_uri.is_empty() {
            return Err(ConfigError::Message(
                "MONGODB_URI environment variable is required when storage.backend = \"mongodb\""
                    .to_string(),
            ));
        }
        Ok(())
    }
}
