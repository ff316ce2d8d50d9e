//! Claims and the claim lifecycle transition table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

closed_enum! {
    /// Lifecycle state of a claim.
    ClaimStatus, "status" {
        Pending => "pending",
        AiProcessing => "ai_processing",
        /// A suggestion is queued for human disposition. Never terminal.
        AiApproved => "ai_approved",
        HumanReview => "human_review",
        HumanApproved => "human_approved",
        Rejected => "rejected",
    }
}

impl ClaimStatus {
    /// `human_approved` and `rejected` accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::HumanApproved | Self::Rejected)
    }

    /// States in which a fact-checker is expected to act.
    pub fn awaits_human(&self) -> bool {
        matches!(self, Self::AiApproved | Self::HumanReview)
    }

    /// The single authoritative transition table.
    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        use ClaimStatus::*;
        match self {
            Pending => matches!(
                next,
                AiProcessing | AiApproved | HumanReview | HumanApproved | Rejected
            ),
            AiProcessing => matches!(next, AiApproved | HumanReview | HumanApproved | Rejected),
            // A late AI response may still land on a claim waiting for review.
            HumanReview => matches!(next, AiApproved | HumanApproved | Rejected),
            AiApproved => matches!(next, HumanApproved | Rejected),
            HumanApproved | Rejected => false,
        }
    }

    /// Non-terminal states, in lifecycle order.
    pub fn open_states() -> Vec<ClaimStatus> {
        Self::ALL.iter().copied().filter(|s| !s.is_terminal()).collect()
    }
}

closed_enum! {
    Category, "category" {
        Politics => "politics",
        Health => "health",
        Science => "science",
        Economy => "economy",
        Technology => "technology",
        Environment => "environment",
        Society => "society",
        Other => "other",
    }
}

closed_enum! {
    /// Review priority. Declaration order is ascending urgency.
    Priority, "priority" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Priority {
    /// Sort rank for the review queue: urgent first.
    pub fn queue_rank(&self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// A user-submitted factual assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// UUID v4 identifier.
    pub id: String,
    pub submitter_id: String,
    pub text: String,
    /// blake3 of the normalized text, used to fold duplicate submissions.
    pub text_fingerprint: String,
    pub category: Category,
    pub media_ref: Option<String>,
    pub status: ClaimStatus,
    pub priority: Priority,
    /// How many times this text has been submitted, including the first.
    pub submission_count: u32,
    pub is_trending: bool,
    pub trending_score: Option<f64>,
    /// Fact-checker currently holding the claim.
    pub assigned_to: Option<String>,
    pub ai_suggestion_id: Option<String>,
    pub final_verdict_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row returned by the review queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub id: String,
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    pub status: ClaimStatus,
    pub submission_count: u32,
    pub assigned_to: Option<String>,
    pub ai_confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Filter for the review queue. Empty `statuses` means every open state.
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub statuses: Vec<ClaimStatus>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub limit: Option<usize>,
}

/// blake3 fingerprint of the lower-cased, whitespace-collapsed text.
pub fn fingerprint(text: &str) -> String {
    let normalized = text
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    blake3::hash(normalized.as_bytes()).to_hex().to_string()
}
