//! Final verdicts, responsibility attribution, and fact-checker stats.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_EXPLANATION_LEN, MAX_SOURCES, MAX_SOURCE_LEN};
use crate::errors::{VerityError, VerityResult};

closed_enum! {
    VerdictLabel, "verdict" {
        True => "true",
        False => "false",
        Misleading => "misleading",
        PartiallyTrue => "partially_true",
        Unverifiable => "unverifiable",
    }
}

closed_enum! {
    /// Editorial responsibility for a final verdict.
    Responsibility, "responsibility" {
        /// Untouched AI output approved by a human.
        Ai => "ai",
        /// Any human-touched or human-authored content.
        Org => "org",
    }
}

closed_enum! {
    /// How the final verdict came to be.
    ApprovalStatus, "approval_status" {
        Approved => "approved",
        Edited => "edited",
        Independent => "independent",
    }
}

impl ApprovalStatus {
    pub fn responsibility(&self) -> Responsibility {
        match self {
            Self::Approved => Responsibility::Ai,
            Self::Edited | Self::Independent => Responsibility::Org,
        }
    }
}

/// A final adjudication. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub id: String,
    pub claim_id: String,
    pub fact_checker_id: String,
    pub verdict: VerdictLabel,
    pub explanation: String,
    pub sources: Vec<String>,
    pub ai_suggestion_id: Option<String>,
    pub responsibility: Responsibility,
    pub is_final: bool,
    pub approval_status: ApprovalStatus,
    pub time_spent_secs: u32,
    pub created_at: DateTime<Utc>,
}

/// Input for an independent verdict written without using a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVerdict {
    pub verdict: VerdictLabel,
    pub explanation: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub time_spent_secs: u32,
}

impl NewVerdict {
    pub fn validate(&self) -> VerityResult<()> {
        validate_explanation(&self.explanation)?;
        validate_sources(&self.sources)
    }
}

/// Result of disposing of an AI suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    pub verdict_id: String,
    pub responsibility: Responsibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactCheckerStats {
    pub total_verdicts: u64,
    /// Claims waiting on a human that are unassigned or held by this checker.
    pub pending_review: u64,
    pub avg_time_spent_secs: f64,
    /// Share of suggestion-linked verdicts agreeing with the original AI label.
    /// `None` when the checker has no suggestion-linked verdicts.
    pub accuracy: Option<f64>,
    pub verdict_distribution: BTreeMap<VerdictLabel, u64>,
}

pub fn validate_explanation(explanation: &str) -> VerityResult<()> {
    if explanation.trim().is_empty() {
        return Err(VerityError::validation("explanation", "must not be empty"));
    }
    if explanation.len() > MAX_EXPLANATION_LEN {
        return Err(VerityError::validation(
            "explanation",
            format!("exceeds {MAX_EXPLANATION_LEN} bytes"),
        ));
    }
    Ok(())
}

pub fn validate_sources(sources: &[String]) -> VerityResult<()> {
    if sources.len() > MAX_SOURCES {
        return Err(VerityError::validation(
            "sources",
            format!("at most {MAX_SOURCES} sources allowed, got {}", sources.len()),
        ));
    }
    for source in sources {
        if source.trim().is_empty() {
            return Err(VerityError::validation("sources", "source must not be empty"));
        }
        if source.len() > MAX_SOURCE_LEN {
            return Err(VerityError::validation(
                "sources",
                format!("source exceeds {MAX_SOURCE_LEN} bytes"),
            ));
        }
    }
    Ok(())
}
