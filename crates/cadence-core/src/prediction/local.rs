//! Local recall predictor built on the prioritizer's retention model

use crate::scheduling::prioritizer::{adjusted_retention, confidence_for, EASE_RETENTION_DAYS};

use super::{PredictionError, PredictionSource, RecallFeatures, RecallPrediction, RecallPredictor};

/// Retention level at which the next review is recommended
pub const TARGET_RETENTION: f64 = 0.7;

/// Longest interval the local model will recommend
pub const MAX_RECOMMENDED_INTERVAL_DAYS: u32 = 365;

/// Deterministic predictor with no external dependencies
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRecallPredictor;

impl LocalRecallPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Prediction computed entirely from the local model
    pub fn predict(&self, features: &RecallFeatures) -> RecallPrediction {
        let recall_probability = adjusted_retention(
            features.days_since_last_review,
            features.ease_factor,
            features.retention_rate,
            features.learning_style,
            features.average_score(),
        );

        RecallPrediction {
            recall_probability,
            confidence: confidence_for(features.repetitions),
            recommended_interval_days: recommended_interval(features),
            source: PredictionSource::Local,
        }
    }
}

impl RecallPredictor for LocalRecallPredictor {
    fn predict_recall(&self, features: &RecallFeatures) -> Result<RecallPrediction, PredictionError> {
        Ok(self.predict(features))
    }
}

/// Whole days from a review until adjusted retention decays to the target
fn recommended_interval(features: &RecallFeatures) -> u32 {
    let scale = features.retention_rate.unwrap_or(1.0)
        * features.learning_style.map_or(1.0, |s| s.retention_multiplier())
        * features
            .average_score()
            .map_or(1.0, |avg| 0.5 + 0.5 * (avg / 100.0));

    if scale <= TARGET_RETENTION {
        return 1;
    }

    // scale * e^(-d / (ease * 7)) = target
    let days = features.ease_factor * EASE_RETENTION_DAYS * (scale / TARGET_RETENTION).ln();
    if !days.is_finite() {
        return MAX_RECOMMENDED_INTERVAL_DAYS;
    }
    (days.round() as u32).clamp(1, MAX_RECOMMENDED_INTERVAL_DAYS)
}
