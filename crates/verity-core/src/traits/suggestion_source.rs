use crate::models::{AiOutput, Claim};

/// The external AI collaborator. A black box that answers with a
/// suggestion or nothing.
///
/// Implementations own their transport, timeouts, and model choice. A
/// source that never answers simply leaves the claim in the manual queue.
pub trait SuggestionSource: Send + Sync {
    fn suggest(&self, claim: &Claim) -> Option<AiOutput>;
}
