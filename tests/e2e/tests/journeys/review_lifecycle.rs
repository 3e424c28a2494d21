//! Journey: a learner reviews topics over several weeks
//!
//! Exercises the full record -> persist -> prioritize -> digest loop against
//! a real SQLite file.

use cadence_core::prelude::*;
use cadence_core::{RecommendationKind, SchedulerError};
use cadence_e2e_tests::{TestDataFactory, TestDatabaseManager};
use chrono::Duration;

fn review(topic: &str, score: f64, at: chrono::DateTime<Utc>) -> ReviewEvent {
    ReviewEvent::new("learner-1", topic, score, Difficulty::Medium, at)
}

#[test]
fn test_first_review_of_new_topic() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();
    let now = TestDataFactory::now();

    let state = scheduler.record_review(&review("Vectors", 90.0, now)).unwrap();

    assert_eq!(state.interval_days, 1);
    assert_eq!(state.repetitions, 1);
    assert!(state.ease_factor > 2.5);
    assert_eq!(state.next_review, now + Duration::days(1));
    assert_eq!(state.performance_history.len(), 1);
    assert_eq!(state.forgetting_probability, 0.0);
}

#[test]
fn test_intervals_grow_then_reset_on_failure() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();
    let t0 = TestDataFactory::now();

    let first = scheduler.record_review(&review("Matrices", 90.0, t0)).unwrap();
    let second = scheduler
        .record_review(&review("Matrices", 90.0, t0 + Duration::days(1)))
        .unwrap();
    let third = scheduler
        .record_review(&review("Matrices", 90.0, t0 + Duration::days(7)))
        .unwrap();

    assert_eq!(
        (first.interval_days, second.interval_days, third.interval_days),
        (1, 6, 16)
    );
    assert_eq!(third.repetitions, 3);
    assert!(third.ease_factor > second.ease_factor);

    let failed = scheduler
        .record_review(&review("Matrices", 35.0, t0 + Duration::days(30)))
        .unwrap();
    assert_eq!(failed.interval_days, 1);
    assert_eq!(failed.repetitions, 0);
    assert!((failed.ease_factor - (third.ease_factor - 0.2)).abs() < 1e-9);
    assert_eq!(failed.performance_history.len(), 4);
    // 23 days since the previous review against the reset 1-day interval
    assert!(failed.forgetting_probability > 0.0);
}

#[test]
fn test_long_streak_of_perfect_reviews_stays_readable() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();
    let t0 = TestDataFactory::now();

    let mut last = None;
    for day in 0..30 {
        let at = t0 + Duration::days(day);
        last = Some(scheduler.record_review(&review("Vectors", 100.0, at)).unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.repetitions, 30);
    assert_eq!(last.interval_days, 365);
    assert_eq!(last.next_review, t0 + Duration::days(29 + 365));

    // Every read path still works for the learner
    assert_eq!(db.store.get("learner-1", "Vectors").unwrap(), Some(last.clone()));
    assert_eq!(db.store.list_for_learner("learner-1").unwrap(), vec![last]);
    assert!(scheduler.due_reviews("learner-1", t0 + Duration::days(30)).is_ok());
    assert!(scheduler.review_digest("learner-1", t0 + Duration::days(30)).is_ok());
}

#[test]
fn test_state_survives_reopen() {
    let db = TestDatabaseManager::new_temp();
    let now = TestDataFactory::now();
    let seeded = db.seed_reviews("learner-1", &["Cells", "Genetics"], 3, now);
    assert_eq!(seeded.len(), 2);

    let reopened = db.reopen();
    let states = reopened.list_for_learner("learner-1").unwrap();
    assert_eq!(states, seeded);
}

#[test]
fn test_persisted_shape_uses_wire_names() {
    let db = TestDatabaseManager::new_temp();
    let state = db
        .scheduler()
        .record_review(&review("Vectors", 75.0, TestDataFactory::now()))
        .unwrap();

    let json = serde_json::to_value(&state).unwrap();
    for key in [
        "userId",
        "topicName",
        "intervalDays",
        "repetitions",
        "easeFactor",
        "lastReview",
        "nextReview",
        "performanceHistory",
        "forgettingProbability",
        "difficulty",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["difficulty"], "medium");
}

#[test]
fn test_invalid_review_is_rejected_without_writes() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();

    let err = scheduler
        .record_review(&review("Vectors", -5.0, TestDataFactory::now()))
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Review(_)));
    assert_eq!(db.state_count("learner-1"), 0);
}

#[test]
fn test_due_reviews_ranked_over_time() {
    let db = TestDatabaseManager::new_temp();
    let scheduler = db.scheduler();
    let now = TestDataFactory::now();

    // Reviewed long ago and poorly, reviewed recently and well
    scheduler
        .record_review(&review("Stale", 40.0, now - Duration::days(40)))
        .unwrap();
    scheduler
        .record_review(&review("Fresh", 95.0, now - Duration::days(1)))
        .unwrap();
    scheduler
        .record_review(&review("Middling", 70.0, now - Duration::days(8)))
        .unwrap();

    let due = scheduler.due_reviews("learner-1", now).unwrap();
    let names: Vec<&str> = due.iter().map(|d| d.topic_name.as_str()).collect();
    assert_eq!(names.first(), Some(&"Stale"));
    assert_eq!(due[0].urgency, Urgency::Critical);
    assert!(due.windows(2).all(|w| w[0].urgency.rank() <= w[1].urgency.rank()));
    assert!(due[0]
        .recommendations
        .iter()
        .any(|r| r.contains("foundational")));
}

#[test]
fn test_digest_for_struggling_learner() {
    let db = TestDatabaseManager::new_temp();
    db.store
        .upsert_profile("learner-1", &TestDataFactory::short_attention_profile())
        .unwrap();
    let scheduler = db.scheduler();
    let now = TestDataFactory::now();

    for (i, topic) in ["Limits", "Series", "Integrals"].iter().enumerate() {
        scheduler
            .record_review(&review(topic, 30.0 + i as f64 * 5.0, now - Duration::days(20)))
            .unwrap();
    }

    let digest = scheduler.review_digest("learner-1", now).unwrap();
    assert_eq!(digest.total_due, 3);
    assert_eq!(digest.performance.total_reviews, 3);
    assert!(digest.performance.average_score < 60.0);
    assert_eq!(digest.session_plan.duration_minutes, 20);
    assert!(digest
        .recommendations
        .iter()
        .any(|r| r.kind == RecommendationKind::Fundamentals));
    assert!(digest
        .urgent_topics
        .iter()
        .all(|t| t.optimal_difficulty == Difficulty::Easy));
}
