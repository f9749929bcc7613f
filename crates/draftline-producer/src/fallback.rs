use draftline_core::document::{EXTRACTED_PATH, HIGHLIGHTS_PATH, SUMMARY_PATH};
use draftline_core::{Delta, EvidenceRef, Highlight, HighlightKind, Message, Operation};
use serde_json::json;

use crate::error::ProducerFault;

/// Summary written into the document when the model could not be used
pub const FAULT_SUMMARY: &str = "⚠️ AI CONNECTION ERROR";

pub const FAULT_SUGGESTION: &str = "Check the service logs or the OpenAI key and billing";

/// Delta describing a producer fault. It keeps `revision` unchanged, which
/// tells the engine not to record it.
pub fn degraded_delta(
    thread_id: &str,
    revision: u64,
    message: &Message,
    fault: &ProducerFault,
) -> Delta {
    let evidence = EvidenceRef::from_message(message);

    Delta::new(thread_id, revision)
        .with_op(Operation::set(SUMMARY_PATH, FAULT_SUMMARY))
        .with_op(Operation::set(
            EXTRACTED_PATH,
            json!({
                "error_type": fault.error_type(),
                "error_message": fault.to_string(),
                "suggestion": FAULT_SUGGESTION,
            }),
        ))
        .with_op(Operation::set(
            HIGHLIGHTS_PATH,
            json!(["System Error", "Check OpenAI Key"]),
        ))
        .with_highlight(
            Highlight::new(HighlightKind::Risk, format!("System Error: {fault}"))
                .with_evidence(evidence),
        )
        .with_highlight(Highlight::new(HighlightKind::Risk, "Check OpenAI Key"))
}
