use serde_json::{json, Value};

pub const SUMMARY_PATH: &str = "/summary";
pub const EXTRACTED_PATH: &str = "/extracted";
pub const HIGHLIGHTS_PATH: &str = "/highlights";

/// The document every draft starts from. Replaying a thread's full delta log
/// on top of this value reproduces its current document.
pub fn initial_document() -> Value {
    json!({
        "summary": "",
        "extracted": {},
        "highlights": [],
    })
}

/// Current free-text summary, empty when absent or not a string
pub fn summary(doc: &Value) -> &str {
    doc.get("summary").and_then(Value::as_str).unwrap_or_default()
}
