//! Domain models: claims, suggestions, verdicts, points, notifications, principals.

/// Declares a closed, string-backed enum persisted as snake_case text.
///
/// Generates `as_str`, `ALL`, `Display`, and a `FromStr` that rejects unknown
/// values with a validation error naming `$field`.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::VerityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::errors::VerityError::validation(
                        $field,
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

pub mod claim;
pub mod notification;
pub mod points;
pub mod principal;
pub mod suggestion;
pub mod verdict;

pub use claim::{
    fingerprint, Category, Claim, ClaimFilter, ClaimStatus, ClaimSummary, Priority,
};
pub use notification::UnreadVerdict;
pub use points::{
    ActivityType, DailyLoginOutcome, LeaderboardEntry, PointsLedgerEntry, StreakStep,
    UserPointsSummary,
};
pub use principal::{Principal, Role};
pub use suggestion::{AiOutput, AiSuggestion, SuggestionAuthor, SuggestionEdits, SuggestionRevision};
pub use verdict::{
    ApprovalOutcome, ApprovalStatus, FactCheckerStats, NewVerdict, Responsibility, Verdict,
    VerdictLabel,
};
