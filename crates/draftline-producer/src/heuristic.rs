use async_trait::async_trait;
use draftline_core::document::SUMMARY_PATH;
use draftline_core::text::truncate_chars;
use draftline_core::{Delta, DraftState, EvidenceRef, Highlight, HighlightKind, Message, Operation};
use regex::Regex;
use serde_json::{Number, Value};

use crate::error::ProducerError;
use crate::strategy::DeltaProducer;

pub const TEMP_PATH: &str = "/extracted/water/temp_c";
pub const PH_PATH: &str = "/extracted/water/ph";

/// Longest running summary the heuristic writes, in characters
pub const MAX_SUMMARY_CHARS: usize = 200;

const TEMP_PATTERN: &str = r"(?i)temp(?:erature)?\s*[:=]?\s*(\d+(\.\d+)?)\s*(c|°c)?";
const PH_PATTERN: &str = r"(?i)\bpH\s*[:=]?\s*(\d+(\.\d+)?)";

/// Regex-based producer: pulls water temperature and pH out of the text and
/// keeps a one-line running summary. Needs no external service.
pub struct HeuristicDeltaProducer {
    temp: Regex,
    ph: Regex,
}

impl HeuristicDeltaProducer {
    pub fn new() -> Result<Self, ProducerError> {
        Ok(Self {
            temp: Regex::new(TEMP_PATTERN)?,
            ph: Regex::new(PH_PATTERN)?,
        })
    }

    /// First number captured by `pattern`, as written and as a JSON number
    fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<(&'t str, Value)> {
        let raw = pattern.captures(text)?.get(1)?.as_str();
        Some((raw, parse_number(raw)?))
    }
}

/// Decimal text to a JSON number. Whole values become integers so `21` and
/// `21.0` land in the document the same way.
fn parse_number(raw: &str) -> Option<Value> {
    let value: f64 = raw.parse().ok()?;
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Some(Value::Number(Number::from(value as i64)));
    }
    Number::from_f64(value).map(Value::Number)
}

#[async_trait]
impl DeltaProducer for HeuristicDeltaProducer {
    async fn produce(&self, thread_id: &str, message: &Message, state: &DraftState) -> Delta {
        let mut delta = Delta::new(thread_id, state.next_revision());
        let text = message.text.as_str();

        if let Some((raw, value)) = Self::capture(&self.temp, text) {
            delta = delta
                .with_op(Operation::set(TEMP_PATH, value))
                .with_highlight(
                    Highlight::new(HighlightKind::NewParam, format!("Extracted water temp: {raw} °C"))
                        .with_evidence(EvidenceRef::from_message(message)),
                );
        }

        if let Some((raw, value)) = Self::capture(&self.ph, text) {
            delta = delta
                .with_op(Operation::set(PH_PATH, value))
                .with_highlight(
                    Highlight::new(HighlightKind::NewParam, format!("Extracted pH: {raw}"))
                        .with_evidence(EvidenceRef::from_message(message)),
                );
        }

        let summary = format!("Latest: {} says: {}", message.author, message.text);
        delta = delta.with_op(Operation::set(
            SUMMARY_PATH,
            truncate_chars(&summary, MAX_SUMMARY_CHARS),
        ));

        tracing::debug!(
            thread_id,
            revision = delta.revision,
            ops = delta.ops.len(),
            "Heuristic delta produced"
        );
        delta
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn produce(text: &str) -> (Message, Delta) {
        let producer = HeuristicDeltaProducer::new().unwrap();
        let message = Message::new("t1", "ana", text);
        let delta = producer
            .produce("t1", &message, &DraftState::new("t1"))
            .await;
        (message, delta)
    }

    #[test]
    fn test_parse_number_keeps_integers_whole() {
        assert_eq!(parse_number("21"), Some(json!(21)));
        assert_eq!(parse_number("21.0"), Some(json!(21)));
        assert_eq!(parse_number("7.4"), Some(json!(7.4)));
    }

    #[tokio::test]
    async fn test_temp_and_ph_extracted() {
        let (message, delta) = produce("temp 21C, pH 7.4").await;

        assert_eq!(delta.revision, 1);
        assert_eq!(delta.ops[0], Operation::set(TEMP_PATH, 21));
        assert_eq!(delta.ops[1], Operation::set(PH_PATH, 7.4));
        assert_eq!(delta.highlights.len(), 2);
        assert_eq!(delta.highlights[0].text, "Extracted water temp: 21 °C");
        assert_eq!(delta.highlights[1].text, "Extracted pH: 7.4");
        for highlight in &delta.highlights {
            assert_eq!(highlight.kind, HighlightKind::NewParam);
            let evidence = highlight.evidence.as_ref().unwrap();
            assert_eq!(evidence.message_id, message.id);
            assert_eq!(evidence.quote, "temp 21C, pH 7.4");
        }
    }

    #[tokio::test]
    async fn test_long_form_and_separators() {
        let (_, delta) = produce("Temperature: 24.5 °C and PH=6").await;
        assert_eq!(delta.ops[0], Operation::set(TEMP_PATH, 24.5));
        assert_eq!(delta.ops[1], Operation::set(PH_PATH, 6));
    }

    #[tokio::test]
    async fn test_ph_needs_word_boundary() {
        let (_, delta) = produce("graph 7").await;
        assert!(delta.ops.iter().all(|op| op.path() != PH_PATH));
    }

    #[tokio::test]
    async fn test_summary_only_when_nothing_matches() {
        let (_, delta) = produce("my frog looks pale").await;
        assert_eq!(delta.ops, vec![Operation::set(SUMMARY_PATH, "Latest: ana says: my frog looks pale")]);
        assert!(delta.highlights.is_empty());
    }

    #[tokio::test]
    async fn test_summary_truncated() {
        let (_, delta) = produce(&"a".repeat(500)).await;
        let Operation::Set { value, .. } = delta.ops.last().unwrap() else {
            panic!("expected set");
        };
        assert_eq!(value.as_str().unwrap().chars().count(), MAX_SUMMARY_CHARS);
    }

    #[tokio::test]
    async fn test_revision_follows_state() {
        let producer = HeuristicDeltaProducer::new().unwrap();
        let mut state = DraftState::new("t1");
        state.revision = 6;
        let delta = producer
            .produce("t1", &Message::new("t1", "ana", "hi"), &state)
            .await;
        assert_eq!(delta.revision, 7);
    }
}
