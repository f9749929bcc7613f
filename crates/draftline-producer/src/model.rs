use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use draftline_core::document::{summary, EXTRACTED_PATH, HIGHLIGHTS_PATH, SUMMARY_PATH};
use draftline_core::{Delta, DraftState, EvidenceRef, Highlight, HighlightKind, Message, Operation};
use draftline_llm::{ChatClient, ChatOptions, ChatRequest, Message as ChatMessage};
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Instant;

use crate::error::{ProducerError, ProducerFault};
use crate::fallback::degraded_delta;
use crate::media::{MediaAnalyzer, DEFAULT_VISION_MODEL};
use crate::strategy::DeltaProducer;
use crate::templates::{
    load_template, render_user_prompt, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT_TEMPLATE,
    DEFAULT_VISION_PROMPT,
};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct ModelProducerConfig {
    pub model: String,
    pub vision_model: String,
    pub timeout: Duration,
    pub system_prompt: String,
    pub user_template: String,
    pub vision_prompt: String,
}

impl Default for ModelProducerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_template: DEFAULT_USER_PROMPT_TEMPLATE.to_string(),
            vision_prompt: DEFAULT_VISION_PROMPT.to_string(),
        }
    }
}

impl ModelProducerConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_system_prompt_file(mut self, path: impl AsRef<Path>) -> Result<Self, ProducerError> {
        self.system_prompt = load_template(path)?;
        Ok(self)
    }

    pub fn with_vision_prompt_file(mut self, path: impl AsRef<Path>) -> Result<Self, ProducerError> {
        self.vision_prompt = load_template(path)?;
        Ok(self)
    }
}

/// Highlight as a model writes it: bare text, or text with a kind
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplyHighlight {
    Text(String),
    Tagged { kind: String, text: String },
}

impl ReplyHighlight {
    fn into_parts(self) -> (HighlightKind, String) {
        match self {
            Self::Text(text) => (HighlightKind::NextStep, text),
            Self::Tagged { kind, text } => {
                let kind = serde_json::from_value(Value::String(kind))
                    .unwrap_or(HighlightKind::NextStep);
                (kind, text)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelReply {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    extracted: Option<Value>,
    #[serde(default)]
    highlights: Option<Vec<ReplyHighlight>>,
}

impl ModelReply {
    fn into_delta(self, thread_id: &str, revision: u64, message: &Message) -> Delta {
        let mut delta = Delta::new(thread_id, revision);

        if let Some(summary) = self.summary {
            delta = delta.with_op(Operation::set(SUMMARY_PATH, summary));
        }
        if let Some(extracted) = self.extracted {
            delta = delta.with_op(Operation::set(EXTRACTED_PATH, extracted));
        }
        if let Some(highlights) = self.highlights {
            let evidence = EvidenceRef::from_message(message);
            let mut display = Vec::with_capacity(highlights.len());
            for highlight in highlights {
                let (kind, text) = highlight.into_parts();
                display.push(Value::String(text.clone()));
                delta = delta.with_highlight(Highlight::new(kind, text).with_evidence(evidence.clone()));
            }
            delta = delta.with_op(Operation::set(HIGHLIGHTS_PATH, Value::Array(display)));
        }
        delta
    }
}

/// Producer backed by a chat-completion model
///
/// Sends the current summary and the new message, expects a JSON object
/// `{summary, extracted, highlights}` back. Faults of any kind turn into a
/// degraded delta that holds the revision.
pub struct ModelDeltaProducer {
    client: Arc<dyn ChatClient>,
    config: ModelProducerConfig,
    media: MediaAnalyzer,
}

impl ModelDeltaProducer {
    pub fn new(client: Arc<dyn ChatClient>, config: ModelProducerConfig) -> Self {
        let media = MediaAnalyzer::new(Arc::clone(&client))
            .with_model(config.vision_model.clone())
            .with_prompt(config.vision_prompt.clone())
            .with_timeout(config.timeout);
        Self { client, config, media }
    }

    pub fn config(&self) -> &ModelProducerConfig {
        &self.config
    }

    async fn try_produce(
        &self,
        thread_id: &str,
        message: &Message,
        state: &DraftState,
    ) -> Result<Delta, ProducerFault> {
        // One deadline covers the image pass and the text pass together.
        let deadline = Instant::now() + self.config.timeout;
        let findings = self.media.analyze_until(message, deadline).await;
        let user_prompt = render_user_prompt(
            &self.config.user_template,
            summary(&state.doc),
            &message.author,
            &message.text,
            &findings,
        );

        let request = ChatRequest::new(
            self.config.model.clone(),
            vec![
                ChatMessage::system(self.config.system_prompt.as_str()),
                ChatMessage::human(user_prompt),
            ],
        )
        .with_options(ChatOptions::new().json_object());

        let response = tokio::time::timeout_at(deadline, self.client.chat(request))
            .await
            .map_err(|_| ProducerFault::Timeout(self.config.timeout))?
            .map_err(|e| ProducerFault::Request(format!("{e:#}")))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                thread_id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Model usage"
            );
        }

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProducerFault::EmptyReply)?;
        let reply: ModelReply = serde_json::from_str(&content)?;

        Ok(reply.into_delta(thread_id, state.next_revision(), message))
    }
}

#[async_trait]
impl DeltaProducer for ModelDeltaProducer {
    async fn produce(&self, thread_id: &str, message: &Message, state: &DraftState) -> Delta {
        match self.try_produce(thread_id, message, state).await {
            Ok(delta) => {
                tracing::debug!(
                    thread_id,
                    revision = delta.revision,
                    ops = delta.ops.len(),
                    model = %self.config.model,
                    "Model delta produced"
                );
                delta
            }
            Err(fault) => {
                tracing::warn!(
                    thread_id,
                    error_type = fault.error_type(),
                    error = %fault,
                    "Model producer fault, returning degraded delta"
                );
                degraded_delta(thread_id, state.revision, message, &fault)
            }
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_highlights_accept_strings_and_objects() {
        let reply: ModelReply = serde_json::from_value(json!({
            "summary": "Pale frog, water cold",
            "extracted": {"symptoms": ["pale skin"]},
            "highlights": [
                "Check humidity",
                {"kind": "risk", "text": "Water too cold"},
                {"kind": "something_else", "text": "Odd kind"}
            ]
        }))
        .unwrap();

        let message = Message::new("t1", "ana", "my frog is pale");
        let delta = reply.into_delta("t1", 1, &message);

        let kinds: Vec<HighlightKind> = delta.highlights.iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![HighlightKind::NextStep, HighlightKind::Risk, HighlightKind::NextStep]
        );
        assert_eq!(
            delta.ops.last().unwrap(),
            &Operation::set(
                HIGHLIGHTS_PATH,
                json!(["Check humidity", "Water too cold", "Odd kind"])
            )
        );
    }

    #[test]
    fn test_partial_reply_only_touches_given_fields() {
        let reply: ModelReply = serde_json::from_str(r#"{"summary": "only this"}"#).unwrap();
        let delta = reply.into_delta("t1", 3, &Message::new("t1", "ana", "x"));
        assert_eq!(delta.revision, 3);
        assert_eq!(delta.ops, vec![Operation::set(SUMMARY_PATH, "only this")]);
        assert!(delta.highlights.is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = ModelProducerConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.vision_model, DEFAULT_VISION_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
