use draftline_core::DraftState;
use serde::{Deserialize, Serialize};

/// Whether highlights attached to deltas survive being written to storage
///
/// Highlights are always returned to the caller that produced them. With
/// `Strip`, the delta log kept in storage only carries the ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightRetention {
    #[default]
    Keep,
    Strip,
}

impl HighlightRetention {
    pub fn apply(self, mut draft: DraftState) -> DraftState {
        if self == Self::Strip {
            for delta in &mut draft.deltas {
                delta.highlights.clear();
            }
        }
        draft
    }
}
