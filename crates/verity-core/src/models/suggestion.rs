//! AI suggestions, human edits, and the suggestion revision log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::verdict::{validate_explanation, validate_sources, VerdictLabel};
use crate::errors::{VerityError, VerityResult};

/// What the AI collaborator returns for a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiOutput {
    pub verdict: VerdictLabel,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    pub explanation: String,
    pub sources: Vec<String>,
}

impl AiOutput {
    pub fn validate(&self) -> VerityResult<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(VerityError::validation(
                "confidence",
                format!("must be within [0, 1], got {}", self.confidence),
            ));
        }
        validate_explanation(&self.explanation)?;
        validate_sources(&self.sources)
    }
}

/// The one machine-generated suggestion attached to a claim.
///
/// Holds the current content. Edits mutate it in place; every version,
/// including the raw AI output, is kept in the revision log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSuggestion {
    pub id: String,
    pub claim_id: String,
    pub verdict: VerdictLabel,
    pub confidence: f64,
    pub explanation: String,
    pub sources: Vec<String>,
    pub edited_by_human: bool,
    pub edited_by: Option<String>,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AiSuggestion {
    /// Current content as an [`AiOutput`].
    pub fn content(&self) -> AiOutput {
        AiOutput {
            verdict: self.verdict,
            confidence: self.confidence,
            explanation: self.explanation.clone(),
            sources: self.sources.clone(),
        }
    }
}

/// Changes a fact-checker proposes to a suggestion.
///
/// `sources` replaces the list; `added_sources` is appended after any
/// replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionEdits {
    pub verdict: Option<VerdictLabel>,
    pub explanation: Option<String>,
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub added_sources: Vec<String>,
}

impl SuggestionEdits {
    /// Applies the edits to `current`.
    ///
    /// Returns `None` when the result has zero content changes, which is
    /// what decides `ai` versus `org` responsibility. Appending any source
    /// always counts as a change.
    pub fn apply(&self, current: &AiOutput) -> Option<AiOutput> {
        let mut next = current.clone();
        if let Some(verdict) = self.verdict {
            next.verdict = verdict;
        }
        if let Some(explanation) = &self.explanation {
            next.explanation = explanation.clone();
        }
        if let Some(sources) = &self.sources {
            next.sources = sources.clone();
        }
        next.sources.extend(self.added_sources.iter().cloned());

        if next.verdict == current.verdict
            && next.explanation == current.explanation
            && next.sources == current.sources
        {
            None
        } else {
            Some(next)
        }
    }
}

/// Who produced a suggestion revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SuggestionAuthor {
    Ai,
    Human(String),
}

/// One entry of the append-only suggestion log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRevision {
    pub suggestion_id: String,
    /// 0 is the raw AI output.
    pub revision: u32,
    pub author: SuggestionAuthor,
    pub content: AiOutput,
    pub created_at: DateTime<Utc>,
}
