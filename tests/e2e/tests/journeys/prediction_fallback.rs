//! Journey: recall predictions with a flaky remote model

use std::sync::atomic::Ordering;
use std::sync::Arc;

use cadence_core::prelude::*;
use cadence_core::{LocalRecallPredictor, PredictionSource, RecallFeatures, SchedulerError};
use cadence_e2e_tests::mocks::{FixedPredictor, GarbagePredictor, UnreachablePredictor};
use cadence_e2e_tests::{TestDataFactory, TestDatabaseManager};
use chrono::Duration;

fn seeded_db() -> TestDatabaseManager {
    let db = TestDatabaseManager::new_temp();
    db.seed_reviews("learner-1", &["Vectors"], 5, TestDataFactory::now());
    db
}

#[test]
fn test_unreachable_remote_falls_back_to_local() {
    let db = seeded_db();
    let remote = Arc::new(UnreachablePredictor::default());
    let scheduler = db.scheduler().with_predictor(remote.clone());

    let prediction = scheduler
        .predict_recall("learner-1", "Vectors", TestDataFactory::now())
        .unwrap();

    assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    assert_eq!(prediction.source, PredictionSource::Local);

    // Same answer as asking the local model directly
    let state = db.store.get("learner-1", "Vectors").unwrap().unwrap();
    let features = RecallFeatures::from_state(&state, None, TestDataFactory::now());
    assert_eq!(prediction, LocalRecallPredictor::new().predict(&features));
}

#[test]
fn test_invalid_remote_answer_falls_back() {
    let db = seeded_db();
    let scheduler = db.scheduler().with_predictor(Arc::new(GarbagePredictor));

    let prediction = scheduler
        .predict_recall("learner-1", "Vectors", TestDataFactory::now())
        .unwrap();
    assert_eq!(prediction.source, PredictionSource::Local);
    assert!((0.0..=1.0).contains(&prediction.recall_probability));
    assert!(prediction.recommended_interval_days >= 1);
}

#[test]
fn test_healthy_remote_is_used() {
    let db = seeded_db();
    let scheduler = db.scheduler().with_predictor(Arc::new(FixedPredictor {
        recall_probability: 0.33,
        recommended_interval_days: 9,
    }));

    let prediction = scheduler
        .predict_recall("learner-1", "Vectors", TestDataFactory::now())
        .unwrap();
    assert_eq!(prediction.source, PredictionSource::Remote);
    assert_eq!(prediction.recall_probability, 0.33);
    assert_eq!(prediction.recommended_interval_days, 9);
}

#[test]
fn test_local_prediction_decays_with_time() {
    let db = seeded_db();
    let scheduler = db.scheduler();
    let now = TestDataFactory::now();

    let soon = scheduler.predict_recall("learner-1", "Vectors", now).unwrap();
    let later = scheduler
        .predict_recall("learner-1", "Vectors", now + Duration::days(30))
        .unwrap();
    assert!(later.recall_probability < soon.recall_probability);
    assert_eq!(soon.recommended_interval_days, later.recommended_interval_days);
}

#[test]
fn test_unknown_topic_is_an_error() {
    let db = seeded_db();
    let err = db
        .scheduler()
        .predict_recall("learner-1", "Quaternions", TestDataFactory::now())
        .unwrap_err();
    assert!(matches!(err, SchedulerError::UnknownTopic { .. }));
}
