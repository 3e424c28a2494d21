//! Test Data Factory
//!
//! Realistic curricula, profiles and review states, plus mock prediction
//! backends for exercising the remote/local fallback path.

use std::sync::atomic::{AtomicUsize, Ordering};

use cadence_core::{
    Difficulty, LearnerProfile, LearningStyle, PerformanceRecord, PredictionError,
    PredictionSource, RecallFeatures, RecallPrediction, RecallPredictor, StudyTimePreference,
    Subject, Topic, TopicReviewState,
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Factory for creating test data
pub struct TestDataFactory;

impl TestDataFactory {
    /// Fixed reference instant used across scenarios (a Monday)
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    pub fn today() -> NaiveDate {
        Self::now().date_naive()
    }

    // ========================================================================
    // PROFILES
    // ========================================================================

    pub fn visual_morning_profile() -> LearnerProfile {
        LearnerProfile {
            learning_style: LearningStyle::Visual,
            attention_span_minutes: 120,
            difficulty_preference: None,
            study_time_preference: StudyTimePreference::Morning,
            retention_rate: 1.0,
        }
    }

    pub fn short_attention_profile() -> LearnerProfile {
        LearnerProfile {
            learning_style: LearningStyle::Kinesthetic,
            attention_span_minutes: 20,
            difficulty_preference: Some(Difficulty::Easy),
            study_time_preference: StudyTimePreference::Evening,
            retention_rate: 0.8,
        }
    }

    // ========================================================================
    // CURRICULA
    // ========================================================================

    /// Prerequisite-heavy subject listed in reverse dependency order
    pub fn linear_algebra() -> Subject {
        Subject::new(
            "Linear Algebra",
            vec![
                Topic::new("Eigenvalues")
                    .depends_on("Determinants")
                    .with_hours(2.5)
                    .with_difficulty(5),
                Topic::new("Determinants")
                    .depends_on("Matrices")
                    .with_hours(1.5)
                    .with_difficulty(4),
                Topic::new("Matrices").depends_on("Vectors").with_hours(2.0),
                Topic::new("Vectors").with_hours(1.0).with_difficulty(2),
            ],
        )
    }

    pub fn biology() -> Subject {
        Subject::new(
            "Biology",
            vec![
                Topic::new("Cells").with_hours(1.0).with_difficulty(1),
                Topic::new("Genetics").depends_on("Cells").with_hours(2.0),
                Topic::new("Evolution").depends_on("Genetics"),
            ],
        )
    }

    /// Two topics that require each other
    pub fn cyclic_subject() -> Subject {
        Subject::new(
            "Circular",
            vec![
                Topic::new("Chicken").depends_on("Egg").with_hours(1.0),
                Topic::new("Egg").depends_on("Chicken").with_hours(1.0),
            ],
        )
    }

    /// `t0 <- t1 <- ... <- t(n-1)` listed last-first
    pub fn chain_subject(n: usize) -> Subject {
        let topics = (0..n)
            .rev()
            .map(|i| {
                let topic = Topic::new(format!("t{i}")).with_hours(0.25);
                if i > 0 {
                    topic.depends_on(format!("t{}", i - 1))
                } else {
                    topic
                }
            })
            .collect();
        Subject::new("Chain", topics)
    }

    // ========================================================================
    // REVIEW STATES
    // ========================================================================

    /// A state last reviewed `days_ago` days before [`Self::now`]
    pub fn review_state(
        learner_id: &str,
        topic: &str,
        days_ago: i64,
        interval_days: u32,
        ease_factor: f64,
        scores: &[f64],
    ) -> TopicReviewState {
        let last = Self::now() - Duration::days(days_ago);
        TopicReviewState {
            learner_id: learner_id.to_string(),
            topic_name: topic.to_string(),
            interval_days,
            repetitions: scores.iter().filter(|s| **s >= 60.0).count() as u32,
            ease_factor,
            last_review: last,
            next_review: last + Duration::days(i64::from(interval_days)),
            performance_history: scores
                .iter()
                .enumerate()
                .map(|(i, &score)| PerformanceRecord {
                    score,
                    difficulty: Difficulty::Medium,
                    timestamp: last - Duration::days((scores.len() - 1 - i) as i64),
                })
                .collect(),
            forgetting_probability: 0.0,
            difficulty: Difficulty::Medium,
        }
    }
}

// ============================================================================
// MOCK PREDICTORS
// ============================================================================

/// Always fails as if the network were down
#[derive(Debug, Default)]
pub struct UnreachablePredictor {
    pub calls: AtomicUsize,
}

impl RecallPredictor for UnreachablePredictor {
    fn predict_recall(&self, _features: &RecallFeatures) -> Result<RecallPrediction, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PredictionError::UpstreamUnavailable(
            "connection refused".to_string(),
        ))
    }
}

/// Returns a fixed prediction
#[derive(Debug)]
pub struct FixedPredictor {
    pub recall_probability: f64,
    pub recommended_interval_days: u32,
}

impl RecallPredictor for FixedPredictor {
    fn predict_recall(&self, features: &RecallFeatures) -> Result<RecallPrediction, PredictionError> {
        Ok(RecallPrediction {
            recall_probability: self.recall_probability,
            confidence: (0.6 + features.repetitions as f64 * 0.1).min(0.99),
            recommended_interval_days: self.recommended_interval_days,
            source: PredictionSource::Remote,
        })
    }
}

/// Answers with values outside their valid ranges
#[derive(Debug, Default)]
pub struct GarbagePredictor;

impl RecallPredictor for GarbagePredictor {
    fn predict_recall(&self, _features: &RecallFeatures) -> Result<RecallPrediction, PredictionError> {
        Ok(RecallPrediction {
            recall_probability: f64::NAN,
            confidence: 3.0,
            recommended_interval_days: 0,
            source: PredictionSource::Remote,
        })
    }
}
