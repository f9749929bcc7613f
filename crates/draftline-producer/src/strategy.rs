use async_trait::async_trait;
use draftline_core::{Delta, DraftState, Message};

/// Turns a new message into the next delta for a thread's draft
///
/// Producers never fail: a producer that cannot do its job returns a
/// degraded delta instead. On success the delta carries
/// `state.revision + 1`; a degraded delta carries `state.revision`.
#[async_trait]
pub trait DeltaProducer: Send + Sync {
    async fn produce(&self, thread_id: &str, message: &Message, state: &DraftState) -> Delta;

    /// Short name used in logs and health output
    fn name(&self) -> &'static str;
}
