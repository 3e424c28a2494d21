//! Spaced-Repetition Scheduling
//!
//! Pure computations over review state:
//! - `retention`: exponential-decay forgetting model
//! - `updater`: SM-2 style state transition for one review
//! - `prioritizer`: profile-aware ranking of due topics
//! - `digest`: dashboard summary built on the prioritized list

pub mod digest;
pub mod prioritizer;
pub mod retention;
pub mod updater;

pub use digest::{
    PerformanceAnalysis, Recommendation, RecommendationKind, RetentionPatterns, RetentionTrend,
    ReviewDigest, SessionPlan,
};
pub use prioritizer::{
    adjusted_retention, assess, confidence_for, prioritize, DueTopic, RetentionAssessment,
    Urgency,
};
pub use retention::{forgetting_probability, retention};
pub use updater::{ReviewError, ReviewUpdater};
