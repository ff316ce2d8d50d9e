//! # verity-engine
//!
//! The claim verification lifecycle on top of `verity-storage`:
//! the claim state machine, the AI suggestion handoff, the verdict ledger,
//! points and streaks, unread-verdict tracking, trending, and per-checker
//! stats. Every operation is a method on [`VerityEngine`].

pub mod engine;
pub mod lifecycle;
pub mod notifications;
pub mod observability;
pub mod points;
pub mod stats;
pub mod trending;

pub use engine::VerityEngine;
pub use observability::init_tracing;
pub use trending::{compare_trending, decayed_score};
