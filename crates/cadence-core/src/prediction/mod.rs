//! Recall Prediction
//!
//! A [`RecallPredictor`] estimates how likely a learner is to recall a topic
//! right now and how long until the next review. A remote model may sit
//! behind the trait; [`LocalRecallPredictor`] computes the same shape from
//! the local retention model and is the fallback whenever the remote path
//! returns an error.

mod local;

pub use local::{LocalRecallPredictor, TARGET_RETENTION};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, LearnerProfile, LearningStyle, PerformanceRecord, TopicReviewState};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Failure of a prediction backend; always recoverable through the local path
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    /// Backend could not be reached
    #[error("Prediction backend unavailable: {0}")]
    UpstreamUnavailable(String),
    /// Backend answered with something unusable
    #[error("Invalid prediction response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// FEATURES AND PREDICTIONS
// ============================================================================

/// Inputs to a recall prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallFeatures {
    pub days_since_last_review: f64,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub learning_style: Option<LearningStyle>,
    pub retention_rate: Option<f64>,
    pub topic_difficulty: Difficulty,
    pub performance_history: Vec<PerformanceRecord>,
}

impl RecallFeatures {
    /// Snapshot the features of `state` at `now`
    pub fn from_state(
        state: &TopicReviewState,
        profile: Option<&LearnerProfile>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            days_since_last_review: state.days_since_review(now) as f64,
            repetitions: state.repetitions,
            ease_factor: state.ease_factor,
            learning_style: profile.map(|p| p.learning_style),
            retention_rate: profile.map(|p| p.retention_rate),
            topic_difficulty: state.difficulty,
            performance_history: state.performance_history.clone(),
        }
    }

    /// Mean score across the history
    pub fn average_score(&self) -> Option<f64> {
        if self.performance_history.is_empty() {
            return None;
        }
        let total: f64 = self.performance_history.iter().map(|r| r.score).sum();
        Some(total / self.performance_history.len() as f64)
    }
}

/// Which path produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Remote,
    Local,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionSource::Remote => "remote",
            PredictionSource::Local => "local",
        }
    }
}

impl std::fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallPrediction {
    /// Probability of recall right now (0.0 - 1.0)
    pub recall_probability: f64,
    pub confidence: f64,
    pub recommended_interval_days: u32,
    pub source: PredictionSource,
}

impl RecallPrediction {
    /// Reject values outside their documented ranges
    pub fn validate(self) -> Result<Self, PredictionError> {
        if !(0.0..=1.0).contains(&self.recall_probability) {
            return Err(PredictionError::InvalidResponse(format!(
                "recall probability {} outside [0, 1]",
                self.recall_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(PredictionError::InvalidResponse(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }
        if self.recommended_interval_days == 0 {
            return Err(PredictionError::InvalidResponse(
                "recommended interval must be at least one day".to_string(),
            ));
        }
        Ok(self)
    }
}

// ============================================================================
// PREDICTOR TRAIT
// ============================================================================

/// A source of recall predictions
pub trait RecallPredictor: Send + Sync {
    fn predict_recall(&self, features: &RecallFeatures) -> Result<RecallPrediction, PredictionError>;
}
