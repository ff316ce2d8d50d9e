//! Claims and suggestion query tests against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use verity_core::errors::StorageError;
use verity_core::models::{
    fingerprint, AiOutput, AiSuggestion, Category, Claim, ClaimFilter, ClaimStatus, Priority,
    SuggestionAuthor, SuggestionRevision, VerdictLabel,
};
use verity_storage::queries::{claims, suggestions};
use verity_storage::{to_micros, DatabaseManager};

fn make_claim(id: &str, text: &str, priority: Priority, minutes: i64) -> Claim {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
    Claim {
        id: id.to_string(),
        submitter_id: "submitter".to_string(),
        text: text.to_string(),
        text_fingerprint: fingerprint(text),
        category: Category::Health,
        media_ref: None,
        status: ClaimStatus::Pending,
        priority,
        submission_count: 1,
        is_trending: false,
        trending_score: None,
        assigned_to: None,
        ai_suggestion_id: None,
        final_verdict_id: None,
        created_at: at,
        updated_at: at,
    }
}

fn insert(db: &DatabaseManager, claim: &Claim) {
    db.with_writer(|conn| claims::insert_claim(conn, claim)).unwrap();
}

#[test]
fn insert_and_get_roundtrip() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let claim = make_claim("c1", "Vitamin C cures colds", Priority::Medium, 0);
    insert(&db, &claim);

    let loaded = db.with_reader(|c| claims::get_claim(c, "c1")).unwrap().unwrap();
    assert_eq!(loaded.text, claim.text);
    assert_eq!(loaded.status, ClaimStatus::Pending);
    assert_eq!(loaded.category, Category::Health);
    assert_eq!(loaded.created_at, claim.created_at);
    assert!(db.with_reader(|c| claims::get_claim(c, "nope")).unwrap().is_none());
}

#[test]
fn fingerprint_is_unique() {
    let db = DatabaseManager::open_in_memory().unwrap();
    insert(&db, &make_claim("c1", "The moon is made of cheese", Priority::Low, 0));

    let dup = make_claim("c2", "the  MOON is made of cheese", Priority::Low, 1);
    let err = db.with_writer(|c| claims::insert_claim(c, &dup)).unwrap_err();
    assert!(matches!(err, StorageError::ConstraintViolation { .. }), "{err:?}");

    let found = db
        .with_reader(|c| claims::find_by_fingerprint(c, &fingerprint("THE moon is made of cheese")))
        .unwrap()
        .unwrap();
    assert_eq!(found.id, "c1");
}

#[test]
fn record_duplicate_counts_up() {
    let db = DatabaseManager::open_in_memory().unwrap();
    insert(&db, &make_claim("c1", "text", Priority::Medium, 0));
    let count = db
        .with_writer(|c| claims::record_duplicate(c, "c1", Priority::High, 1))
        .unwrap();
    assert_eq!(count, 2);
    let claim = db.with_reader(|c| claims::get_claim(c, "c1")).unwrap().unwrap();
    assert_eq!(claim.priority, Priority::High);
    assert_eq!(claim.submission_count, 2);
}

#[test]
fn transition_is_compare_and_set() {
    let db = DatabaseManager::open_in_memory().unwrap();
    insert(&db, &make_claim("c1", "text", Priority::Medium, 0));

    let moved = db
        .with_writer(|c| {
            claims::transition_status(c, "c1", ClaimStatus::Pending, ClaimStatus::AiProcessing, 1)
        })
        .unwrap();
    assert_eq!(moved, 1);

    let stale = db
        .with_writer(|c| {
            claims::transition_status(c, "c1", ClaimStatus::Pending, ClaimStatus::Rejected, 2)
        })
        .unwrap();
    assert_eq!(stale, 0, "stale `from` must not match");
}

#[test]
fn invalid_status_rejected_by_check() {
    let db = DatabaseManager::open_in_memory().unwrap();
    insert(&db, &make_claim("c1", "text", Priority::Medium, 0));
    let err = db
        .with_writer(|c| {
            c.execute("UPDATE claims SET status = 'archived' WHERE id = 'c1'", [])
                .map_err(verity_storage::to_storage_err)
        })
        .unwrap_err();
    assert!(matches!(err, StorageError::ConstraintViolation { .. }));
}

#[test]
fn pending_queue_orders_by_priority_then_age() {
    let db = DatabaseManager::open_in_memory().unwrap();
    insert(&db, &make_claim("low", "a", Priority::Low, 0));
    insert(&db, &make_claim("med-old", "b", Priority::Medium, 1));
    insert(&db, &make_claim("urgent", "c", Priority::Urgent, 5));
    insert(&db, &make_claim("med-new", "d", Priority::Medium, 9));
    insert(&db, &make_claim("high", "e", Priority::High, 7));

    let ids: Vec<String> = db
        .with_reader(|c| claims::query_pending(c, &ClaimFilter::default(), 50))
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, ["urgent", "high", "med-old", "med-new", "low"]);
}

#[test]
fn pending_queue_filters() {
    let db = DatabaseManager::open_in_memory().unwrap();
    insert(&db, &make_claim("c1", "a", Priority::Low, 0));
    insert(&db, &make_claim("c2", "b", Priority::High, 1));
    db.with_writer(|c| claims::set_assignee(c, "c2", Some("checker"), 2))
        .unwrap();
    db.with_writer(|c| {
        claims::transition_status(c, "c1", ClaimStatus::Pending, ClaimStatus::Rejected, 3)
    })
    .unwrap();

    let open = db
        .with_reader(|c| claims::query_pending(c, &ClaimFilter::default(), 50))
        .unwrap();
    assert_eq!(open.len(), 1, "terminal claims are not in the default queue");

    let filter = ClaimFilter {
        assigned_to: Some("checker".into()),
        priority: Some(Priority::High),
        ..Default::default()
    };
    let mine = db.with_reader(|c| claims::query_pending(c, &filter, 50)).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, "c2");

    let rejected = ClaimFilter {
        statuses: vec![ClaimStatus::Rejected],
        ..Default::default()
    };
    let rows = db.with_reader(|c| claims::query_pending(c, &rejected, 50)).unwrap();
    assert_eq!(rows[0].id, "c1");
}

#[test]
fn awaiting_review_counts_unassigned_and_own_claims() {
    let db = DatabaseManager::open_in_memory().unwrap();
    for (id, status, holder) in [
        ("pending", ClaimStatus::Pending, None),
        ("review", ClaimStatus::HumanReview, None),
        ("mine", ClaimStatus::AiApproved, Some("checker")),
        ("theirs", ClaimStatus::AiApproved, Some("other")),
        ("done", ClaimStatus::Rejected, None),
    ] {
        insert(&db, &make_claim(id, id, Priority::Medium, 0));
        db.with_writer(|c| {
            if status != ClaimStatus::Pending {
                claims::transition_status(c, id, ClaimStatus::Pending, status, 1)?;
            }
            claims::set_assignee(c, id, holder, 2)
        })
        .unwrap();
    }

    let count = |who: &str| {
        db.with_reader(|c| claims::count_awaiting_review(c, who))
            .unwrap()
    };
    assert_eq!(count("checker"), 2);
    assert_eq!(count("other"), 2);
    assert_eq!(count("nobody"), 1);
}

#[test]
fn one_suggestion_per_claim() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let claim = make_claim("c1", "text", Priority::Medium, 0);
    insert(&db, &claim);

    let suggestion = AiSuggestion {
        id: "s1".into(),
        claim_id: "c1".into(),
        verdict: VerdictLabel::False,
        confidence: 0.92,
        explanation: "No evidence".into(),
        sources: vec!["https://example.org/a".into()],
        edited_by_human: false,
        edited_by: None,
        edited_at: None,
        created_at: claim.created_at,
    };
    db.with_writer(|c| suggestions::insert_suggestion(c, &suggestion))
        .unwrap();

    let second = AiSuggestion {
        id: "s2".into(),
        ..suggestion.clone()
    };
    let err = db
        .with_writer(|c| suggestions::insert_suggestion(c, &second))
        .unwrap_err();
    assert!(matches!(err, StorageError::ConstraintViolation { .. }));

    let loaded = db
        .with_reader(|c| suggestions::get_by_claim(c, "c1"))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id, "s1");
    assert_eq!(loaded.sources, suggestion.sources);
}

#[test]
fn edit_applies_once_and_revisions_accumulate() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let claim = make_claim("c1", "text", Priority::Medium, 0);
    insert(&db, &claim);
    let raw = AiOutput {
        verdict: VerdictLabel::Misleading,
        confidence: 0.6,
        explanation: "Partly out of context".into(),
        sources: vec![],
    };
    let suggestion = AiSuggestion {
        id: "s1".into(),
        claim_id: "c1".into(),
        verdict: raw.verdict,
        confidence: raw.confidence,
        explanation: raw.explanation.clone(),
        sources: raw.sources.clone(),
        edited_by_human: false,
        edited_by: None,
        edited_at: None,
        created_at: claim.created_at,
    };
    let now = to_micros(claim.created_at);
    db.with_writer(|c| {
        suggestions::insert_suggestion(c, &suggestion)?;
        suggestions::insert_revision(
            c,
            &SuggestionRevision {
                suggestion_id: "s1".into(),
                revision: 0,
                author: SuggestionAuthor::Ai,
                content: raw.clone(),
                created_at: claim.created_at,
            },
        )
    })
    .unwrap();

    let edited = AiOutput {
        verdict: VerdictLabel::False,
        ..raw.clone()
    };
    assert_eq!(
        db.with_writer(|c| suggestions::apply_edit(c, "s1", &edited, "checker", now + 1))
            .unwrap(),
        1
    );
    assert_eq!(
        db.with_writer(|c| suggestions::apply_edit(c, "s1", &edited, "other", now + 2))
            .unwrap(),
        0,
        "a suggestion is edited at most once"
    );

    let next = db.with_reader(|c| suggestions::next_revision(c, "s1")).unwrap();
    assert_eq!(next, 1);
    db.with_writer(|c| {
        suggestions::insert_revision(
            c,
            &SuggestionRevision {
                suggestion_id: "s1".into(),
                revision: next,
                author: SuggestionAuthor::Human("checker".into()),
                content: edited.clone(),
                created_at: claim.created_at,
            },
        )
    })
    .unwrap();

    let log = db.with_reader(|c| suggestions::list_revisions(c, "s1")).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].content.verdict, VerdictLabel::Misleading);
    assert_eq!(log[1].author, SuggestionAuthor::Human("checker".into()));

    let current = db
        .with_reader(|c| suggestions::get_by_claim(c, "c1"))
        .unwrap()
        .unwrap();
    assert!(current.edited_by_human);
    assert_eq!(current.edited_by.as_deref(), Some("checker"));
    assert_eq!(current.verdict, VerdictLabel::False);
}
