use std::sync::Arc;
use std::time::Duration;

use draftline_core::Message;
use draftline_llm::{ChatClient, ChatOptions, ChatRequest, Content, Message as ChatMessage};
use serde::Deserialize;
use tokio::time::Instant;

use crate::error::ProducerFault;
use crate::templates::DEFAULT_VISION_PROMPT;

pub const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Default, Deserialize)]
struct VisionReply {
    #[serde(default)]
    findings: Vec<String>,
}

/// Image pass over a message's attached media
///
/// Any failure yields no findings; the text pass still runs.
pub struct MediaAnalyzer {
    client: Arc<dyn ChatClient>,
    model: String,
    prompt: String,
    timeout: Duration,
}

impl MediaAnalyzer {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            model: DEFAULT_VISION_MODEL.to_string(),
            prompt: DEFAULT_VISION_PROMPT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Findings for the message's image; empty when there is none
    pub async fn analyze(&self, message: &Message) -> Vec<String> {
        self.analyze_until(message, Instant::now() + self.timeout).await
    }

    /// Like [`MediaAnalyzer::analyze`], giving up at `deadline`
    pub async fn analyze_until(&self, message: &Message, deadline: Instant) -> Vec<String> {
        let Some(image_ref) = message.image_ref.as_deref() else {
            return Vec::new();
        };

        match self.describe(&message.text, image_ref, deadline).await {
            Ok(findings) => {
                tracing::debug!(
                    message_id = %message.id,
                    findings = findings.len(),
                    "Image analyzed"
                );
                findings
            }
            Err(fault) => {
                tracing::warn!(
                    message_id = %message.id,
                    error = %fault,
                    "Image analysis failed, continuing without findings"
                );
                Vec::new()
            }
        }
    }

    async fn describe(
        &self,
        text: &str,
        image_ref: &str,
        deadline: Instant,
    ) -> Result<Vec<String>, ProducerFault> {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(self.prompt.as_str()),
                ChatMessage::human(Content::text_with_image(text, image_ref)),
            ],
        )
        .with_options(ChatOptions::new().json_object());

        let response = tokio::time::timeout_at(deadline, self.client.chat(request))
            .await
            .map_err(|_| ProducerFault::Timeout(self.timeout))?
            .map_err(|e| ProducerFault::Request(format!("{e:#}")))?;

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProducerFault::EmptyReply)?;
        let reply: VisionReply = serde_json::from_str(&content)?;

        Ok(reply
            .findings
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect())
    }
}
