//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use verity_core::models::{AiOutput, Category, VerdictLabel};
use verity_core::traits::ManualClock;
use verity_core::VerityConfig;
use verity_engine::VerityEngine;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
}

/// In-memory engine on a manual clock at [`start`].
pub fn engine() -> (VerityEngine, Arc<ManualClock>) {
    engine_with(VerityConfig::default())
}

pub fn engine_with(config: VerityConfig) -> (VerityEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let engine = VerityEngine::open_in_memory(config)
        .unwrap()
        .with_clock(clock.clone());
    (engine, clock)
}

pub fn ai_output(verdict: VerdictLabel, confidence: f64) -> AiOutput {
    AiOutput {
        verdict,
        confidence,
        explanation: "Official statistics contradict the claim.".to_string(),
        sources: vec!["https://stats.example.org/report".to_string()],
    }
}

pub fn submit(engine: &VerityEngine, user: &str, text: &str) -> String {
    engine
        .submit_claim(user, Category::Politics, text, None)
        .unwrap()
}

/// Submit a claim and attach an AI suggestion, leaving it in `ai_approved`.
pub fn suggested_claim(engine: &VerityEngine, user: &str, text: &str) -> String {
    let claim_id = submit(engine, user, text);
    engine
        .record_suggestion(&claim_id, ai_output(VerdictLabel::False, 0.92))
        .unwrap();
    claim_id
}
