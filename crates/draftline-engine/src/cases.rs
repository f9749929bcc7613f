use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use draftline_core::text::ellipsize;
use draftline_core::Message;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_CASE_TITLE: &str = "Frog problem";
pub const MAX_TITLE_CHARS: usize = 120;
pub const MAX_SHORT_SUMMARY_CHARS: usize = 140;
pub const DEFAULT_RESOLUTION_SUMMARY: &str = "Outcome recorded, see case thread for full details.";
pub const DEFAULT_RESOLVER: &str = "demo-user";

const TAG_RULES: &[(&[&str], &str)] = &[
    (&["slime", "slimy"], "skin:slime_coat"),
    (&["handling", "grab", "picked up"], "behavior:handling_response"),
    (&["arrival", "new frogs", "shipment"], "context:new_arrivals"),
];

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Case not found")]
    NotFound(String),

    #[error("Invalid resolution outcome: {0}")]
    InvalidOutcome(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Open,
    Partial,
    Resolved,
    Unresolved,
}

impl CaseStatus {
    /// Statuses a resolution may set. `OPEN` is not one of them.
    pub fn parse_outcome(outcome: &str) -> Result<Self, CaseError> {
        match outcome {
            "RESOLVED" => Ok(Self::Resolved),
            "PARTIAL" => Ok(Self::Partial),
            "UNRESOLVED" => Ok(Self::Unresolved),
            other => Err(CaseError::InvalidOutcome(other.to_string())),
        }
    }

    fn wants_follow_up(self) -> bool {
        matches!(self, Self::Open | Self::Partial)
    }
}

/// A tracked problem report, opened by the first message of a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub thread_id: String,
    pub created_by_user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub title: String,
    pub initial_message_id: String,
    pub message_ids: Vec<String>,
    pub tags: Vec<String>,

    pub status: CaseStatus,
    pub resolution_summary_short: Option<String>,
    pub resolution_summary_full: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by_user_id: Option<String>,

    pub follow_up_due_at: Option<DateTime<Utc>>,
    pub last_follow_up_sent_at: Option<DateTime<Utc>>,
    pub follow_up_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionInput {
    #[serde(default)]
    pub user_id: Option<String>,
    pub outcome: String,
    #[serde(default)]
    pub free_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasePolicy {
    pub follow_up_days: i64,
    pub max_follow_ups: u32,
}

impl Default for CasePolicy {
    fn default() -> Self {
        Self {
            follow_up_days: 7,
            max_follow_ups: 3,
        }
    }
}

fn derive_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default().trim();
    let title = if first_line.is_empty() {
        DEFAULT_CASE_TITLE
    } else {
        first_line
    };
    ellipsize(title, MAX_TITLE_CHARS)
}

fn derive_tags(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    TAG_RULES
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| text.contains(n)))
        .map(|(_, tag)| tag.to_string())
        .collect()
}

#[derive(Default)]
struct CaseBook {
    cases: HashMap<String, Case>,
    by_thread: HashMap<String, String>,
}

/// In-process registry of cases and their follow-up schedule
#[derive(Default)]
pub struct CaseTracker {
    book: RwLock<CaseBook>,
    policy: CasePolicy,
}

impl CaseTracker {
    pub fn new(policy: CasePolicy) -> Self {
        Self {
            book: RwLock::new(CaseBook::default()),
            policy,
        }
    }

    pub fn policy(&self) -> CasePolicy {
        self.policy
    }

    fn follow_up_after(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        from + Duration::days(self.policy.follow_up_days)
    }

    /// Open a case for the thread's first message, or attach the message to
    /// the thread's existing case
    pub async fn record_message(&self, message: &Message) -> Case {
        let mut book = self.book.write().await;
        let now = Utc::now();

        if let Some(case_id) = book.by_thread.get(&message.thread_id).cloned() {
            if let Some(case) = book.cases.get_mut(&case_id) {
                case.message_ids.push(message.id.clone());
                case.updated_at = now;
                return case.clone();
            }
        }

        let case = Case {
            id: uuid::Uuid::new_v4().to_string(),
            thread_id: message.thread_id.clone(),
            created_by_user_id: message.author.clone(),
            created_at: now,
            updated_at: now,
            title: derive_title(&message.text),
            initial_message_id: message.id.clone(),
            message_ids: vec![message.id.clone()],
            tags: derive_tags(&message.text),
            status: CaseStatus::Open,
            resolution_summary_short: None,
            resolution_summary_full: None,
            resolved_at: None,
            resolved_by_user_id: None,
            follow_up_due_at: Some(self.follow_up_after(now)),
            last_follow_up_sent_at: None,
            follow_up_count: 0,
        };

        tracing::info!(case_id = %case.id, thread_id = %case.thread_id, tags = ?case.tags, "Case opened");
        book.by_thread.insert(case.thread_id.clone(), case.id.clone());
        book.cases.insert(case.id.clone(), case.clone());
        case
    }

    pub async fn case_for_thread(&self, thread_id: &str) -> Option<Case> {
        let book = self.book.read().await;
        book.by_thread
            .get(thread_id)
            .and_then(|id| book.cases.get(id))
            .cloned()
    }

    /// All cases, most recently updated first
    pub async fn list(&self) -> Vec<Case> {
        let mut cases: Vec<Case> = self.book.read().await.cases.values().cloned().collect();
        cases.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        cases
    }

    pub async fn get(&self, case_id: &str) -> Result<Case, CaseError> {
        self.book
            .read()
            .await
            .cases
            .get(case_id)
            .cloned()
            .ok_or_else(|| CaseError::NotFound(case_id.to_string()))
    }

    /// Record the outcome reported for a case and stop follow-ups
    pub async fn resolve(&self, case_id: &str, input: ResolutionInput) -> Result<Case, CaseError> {
        let mut book = self.book.write().await;
        let case = book
            .cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.to_string()))?;
        let status = CaseStatus::parse_outcome(&input.outcome)?;

        let full = input
            .free_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_RESOLUTION_SUMMARY)
            .to_string();

        let now = Utc::now();
        case.status = status;
        case.resolved_at = Some(now);
        case.resolved_by_user_id = Some(input.user_id.unwrap_or_else(|| DEFAULT_RESOLVER.to_string()));
        case.follow_up_due_at = None;
        case.updated_at = now;
        case.resolution_summary_short = Some(ellipsize(&full, MAX_SHORT_SUMMARY_CHARS));
        case.resolution_summary_full = Some(full);

        tracing::info!(case_id, status = ?status, "Case resolution recorded");
        Ok(case.clone())
    }

    /// Cases whose follow-up is due at `now`
    pub async fn due_follow_ups(&self, now: DateTime<Utc>) -> Vec<Case> {
        let book = self.book.read().await;
        let mut due: Vec<Case> = book
            .cases
            .values()
            .filter(|c| {
                c.status.wants_follow_up()
                    && c.follow_up_due_at.is_some_and(|at| at <= now)
                    && c.follow_up_count < self.policy.max_follow_ups
            })
            .cloned()
            .collect();
        due.sort_by(|a, b| a.follow_up_due_at.cmp(&b.follow_up_due_at));
        due
    }

    pub async fn mark_follow_up_sent(
        &self,
        case_id: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<Case, CaseError> {
        let mut book = self.book.write().await;
        let case = book
            .cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.to_string()))?;

        case.last_follow_up_sent_at = Some(sent_at);
        case.follow_up_count += 1;
        case.follow_up_due_at = if case.follow_up_count >= self.policy.max_follow_ups {
            None
        } else {
            Some(self.follow_up_after(sent_at))
        };
        case.updated_at = Utc::now();
        Ok(case.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(thread: &str, text: &str) -> Message {
        Message::new(thread, "ana", text)
    }

    fn resolution(outcome: &str, free_text: Option<&str>) -> ResolutionInput {
        ResolutionInput {
            user_id: None,
            outcome: outcome.to_string(),
            free_text: free_text.map(str::to_string),
        }
    }

    #[test]
    fn test_title_from_first_line() {
        assert_eq!(derive_title("  Pale frog  \nmore detail"), "Pale frog");
        assert_eq!(derive_title("\nsecond line"), DEFAULT_CASE_TITLE);

        let long = derive_title(&"x".repeat(200));
        assert_eq!(long.chars().count(), MAX_TITLE_CHARS);
        assert!(long.ends_with("..."));
    }

    #[test]
    fn test_tags_from_keywords() {
        assert_eq!(
            derive_tags("Slimy skin after the SHIPMENT"),
            vec!["skin:slime_coat", "context:new_arrivals"]
        );
        assert_eq!(derive_tags("picked up and it froze"), vec!["behavior:handling_response"]);
        assert!(derive_tags("all fine").is_empty());
    }

    #[test]
    fn test_outcome_parsing() {
        assert_eq!(CaseStatus::parse_outcome("PARTIAL").unwrap(), CaseStatus::Partial);
        assert!(matches!(
            CaseStatus::parse_outcome("OPEN"),
            Err(CaseError::InvalidOutcome(_))
        ));
        assert!(CaseStatus::parse_outcome("resolved").is_err());
    }

    #[tokio::test]
    async fn test_first_message_opens_case_later_ones_attach() {
        let tracker = CaseTracker::default();
        let first = message("t1", "Slimy frog");
        let opened = tracker.record_message(&first).await;

        assert_eq!(opened.status, CaseStatus::Open);
        assert_eq!(opened.initial_message_id, first.id);
        assert_eq!(opened.follow_up_count, 0);
        let due = opened.follow_up_due_at.unwrap() - opened.created_at;
        assert_eq!(due, Duration::days(7));

        let second = message("t1", "still slimy");
        let attached = tracker.record_message(&second).await;
        assert_eq!(attached.id, opened.id);
        assert_eq!(attached.message_ids, vec![first.id, second.id]);
        assert_eq!(tracker.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_resolution_sets_summaries_and_stops_follow_ups() {
        let tracker = CaseTracker::default();
        let case = tracker.record_message(&message("t1", "pale")).await;

        let resolved = tracker
            .resolve(&case.id, resolution("RESOLVED", Some(&"y".repeat(300))))
            .await
            .unwrap();
        assert_eq!(resolved.status, CaseStatus::Resolved);
        assert_eq!(resolved.resolved_by_user_id.as_deref(), Some(DEFAULT_RESOLVER));
        assert!(resolved.follow_up_due_at.is_none());
        assert_eq!(
            resolved.resolution_summary_short.as_ref().unwrap().chars().count(),
            MAX_SHORT_SUMMARY_CHARS
        );
        assert_eq!(resolved.resolution_summary_full.unwrap().len(), 300);
    }

    #[tokio::test]
    async fn test_resolution_default_summary_and_errors() {
        let tracker = CaseTracker::default();
        let case = tracker.record_message(&message("t1", "pale")).await;

        let partial = tracker
            .resolve(&case.id, resolution("PARTIAL", Some("   ")))
            .await
            .unwrap();
        assert_eq!(partial.resolution_summary_full.as_deref(), Some(DEFAULT_RESOLUTION_SUMMARY));

        assert!(matches!(
            tracker.resolve(&case.id, resolution("MAYBE", None)).await,
            Err(CaseError::InvalidOutcome(_))
        ));
        assert!(matches!(
            tracker.resolve("nope", resolution("RESOLVED", None)).await,
            Err(CaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_up_schedule() {
        let tracker = CaseTracker::default();
        let case = tracker.record_message(&message("t1", "pale")).await;
        let now = Utc::now();

        assert!(tracker.due_follow_ups(now).await.is_empty());
        let later = now + Duration::days(8);
        assert_eq!(tracker.due_follow_ups(later).await.len(), 1);

        let sent = tracker.mark_follow_up_sent(&case.id, later).await.unwrap();
        assert_eq!(sent.follow_up_count, 1);
        assert_eq!(sent.follow_up_due_at, Some(later + Duration::days(7)));
        assert!(tracker.due_follow_ups(later).await.is_empty());

        tracker.mark_follow_up_sent(&case.id, later).await.unwrap();
        let last = tracker.mark_follow_up_sent(&case.id, later).await.unwrap();
        assert_eq!(last.follow_up_count, 3);
        assert!(last.follow_up_due_at.is_none());
        assert!(tracker
            .due_follow_ups(later + Duration::days(365))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_resolved_cases_are_not_due() {
        let tracker = CaseTracker::default();
        let case = tracker.record_message(&message("t1", "pale")).await;
        tracker
            .resolve(&case.id, resolution("UNRESOLVED", None))
            .await
            .unwrap();
        assert!(tracker
            .due_follow_ups(Utc::now() + Duration::days(30))
            .await
            .is_empty());
    }

    #[test]
    fn test_case_serializes_camel_case() {
        let json = serde_json::to_value(Case {
            id: "c1".into(),
            thread_id: "t1".into(),
            created_by_user_id: "ana".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            title: "Pale".into(),
            initial_message_id: "m1".into(),
            message_ids: vec!["m1".into()],
            tags: vec![],
            status: CaseStatus::Open,
            resolution_summary_short: None,
            resolution_summary_full: None,
            resolved_at: None,
            resolved_by_user_id: None,
            follow_up_due_at: None,
            last_follow_up_sent_at: None,
            follow_up_count: 0,
        })
        .unwrap();
        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["followUpCount"], 0);
        assert_eq!(json["threadId"], "t1");
    }
}
