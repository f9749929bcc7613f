use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use draftline_core::{DraftState, HighlightKind, Message};
use draftline_llm::{ChatClient, ChatRequest, ChatResponse, OpenAIClient};
use draftline_producer::fallback::FAULT_SUMMARY;
use draftline_producer::{DeltaProducer, ModelDeltaProducer, ModelProducerConfig};
use mockito::Matcher;
use serde_json::json;

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn producer_for(server: &mockito::Server) -> ModelDeltaProducer {
    let client = OpenAIClient::new("test-key").unwrap().with_base_url(server.url());
    ModelDeltaProducer::new(Arc::new(client), ModelProducerConfig::default())
}

#[tokio::test]
async fn test_reply_becomes_next_revision() {
    let mut server = mockito::Server::new_async().await;
    let reply = json!({
        "summary": "Pale frog in cold water",
        "extracted": {"parameters": {"temp": "18"}},
        "highlights": [{"kind": "risk", "text": "Water below 20 C"}]
    });
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("json_object".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&reply.to_string()))
        .create_async()
        .await;

    let producer = producer_for(&server);
    let message = Message::new("t1", "ana", "water is 18 degrees");
    let state = DraftState::new("t1");

    let delta = producer.produce("t1", &message, &state).await;
    mock.assert_async().await;

    assert_eq!(delta.revision, 1);
    let doc = state.preview(&delta).unwrap();
    assert_eq!(doc["summary"], "Pale frog in cold water");
    assert_eq!(doc["extracted"]["parameters"]["temp"], "18");
    assert_eq!(doc["highlights"], json!(["Water below 20 C"]));
    assert_eq!(delta.highlights[0].kind, HighlightKind::Risk);
    assert_eq!(
        delta.highlights[0].evidence.as_ref().unwrap().message_id,
        message.id
    );
}

#[tokio::test]
async fn test_http_error_degrades_and_holds_revision() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let producer = producer_for(&server);
    let mut state = DraftState::new("t1");
    state.revision = 2;

    let delta = producer
        .produce("t1", &Message::new("t1", "ana", "hello"), &state)
        .await;

    assert_eq!(delta.revision, 2);
    let doc = state.preview(&delta).unwrap();
    assert_eq!(doc["summary"], FAULT_SUMMARY);
    assert_eq!(doc["extracted"]["error_type"], "RequestError");
    assert!(doc["extracted"]["error_message"]
        .as_str()
        .unwrap()
        .contains("500"));
    assert!(delta.highlights.iter().all(|h| h.kind == HighlightKind::Risk));
}

#[tokio::test]
async fn test_malformed_reply_degrades() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("this is not json"))
        .create_async()
        .await;

    let producer = producer_for(&server);
    let state = DraftState::new("t1");
    let delta = producer
        .produce("t1", &Message::new("t1", "ana", "hello"), &state)
        .await;

    assert_eq!(delta.revision, 0);
    let doc = state.preview(&delta).unwrap();
    assert_eq!(doc["extracted"]["error_type"], "MalformedReply");
}

#[tokio::test]
async fn test_image_findings_reach_the_text_pass() {
    let mut server = mockito::Server::new_async().await;
    let vision = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("image_url".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(r#"{"findings": ["pale skin"]}"#))
        .create_async()
        .await;
    let text = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Image findings: pale skin".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(r#"{"summary": "Frog looks pale"}"#))
        .create_async()
        .await;

    let producer = producer_for(&server);
    let message = Message::new("t1", "ana", "see photo")
        .with_image_ref(Some("https://example.com/frog.jpg".to_string()));
    let delta = producer
        .produce("t1", &message, &DraftState::new("t1"))
        .await;

    vision.assert_async().await;
    text.assert_async().await;
    assert_eq!(delta.revision, 1);
}

#[tokio::test]
async fn test_failed_image_pass_does_not_fail_the_delta() {
    let mut server = mockito::Server::new_async().await;
    let _vision = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("image_url".into()))
        .with_status(503)
        .create_async()
        .await;
    let _text = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Image findings: none".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(r#"{"summary": "No image detail"}"#))
        .create_async()
        .await;

    let producer = producer_for(&server);
    let message = Message::new("t1", "ana", "see photo")
        .with_image_ref(Some("https://example.com/frog.jpg".to_string()));
    let state = DraftState::new("t1");
    let delta = producer.produce("t1", &message, &state).await;

    assert_eq!(delta.revision, 1);
    assert_eq!(state.preview(&delta).unwrap()["summary"], "No image detail");
}

struct SlowClient;

#[async_trait]
impl ChatClient for SlowClient {
    async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        anyhow::bail!("should have timed out first")
    }
}

#[tokio::test]
async fn test_timeout_is_a_fault() {
    let producer = ModelDeltaProducer::new(
        Arc::new(SlowClient),
        ModelProducerConfig::default().with_timeout(Duration::from_millis(20)),
    );
    let state = DraftState::new("t1");
    let delta = producer
        .produce("t1", &Message::new("t1", "ana", "hello"), &state)
        .await;

    assert_eq!(delta.revision, 0);
    assert_eq!(
        state.preview(&delta).unwrap()["extracted"]["error_type"],
        "Timeout"
    );
}

#[tokio::test]
async fn test_image_and_text_passes_share_one_deadline() {
    let timeout = Duration::from_millis(200);
    let producer = ModelDeltaProducer::new(
        Arc::new(SlowClient),
        ModelProducerConfig::default().with_timeout(timeout),
    );
    let state = DraftState::new("t1");
    let message = Message::new("t1", "ana", "look at this frog")
        .with_image_ref(Some("https://example.com/frog.jpg".to_string()));

    let started = std::time::Instant::now();
    let delta = producer.produce("t1", &message, &state).await;
    let elapsed = started.elapsed();

    assert_eq!(delta.revision, 0);
    assert!(
        elapsed < timeout + timeout / 2,
        "producer ran for {elapsed:?}, past its {timeout:?} budget"
    );
}
