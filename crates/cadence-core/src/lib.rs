//! # Cadence Core
//!
//! Adaptive study-scheduling engine. Decides *when* a learner should revisit
//! a topic and *what* to study on each day before a target date:
//!
//! - **Retention Model**: exponential-decay forgetting probability
//! - **SM-2 Review Updates**: interval, repetition and ease-factor transitions
//! - **Review Prioritization**: profile-aware urgency ranking with recommendations
//! - **Recall Prediction**: pluggable remote predictor with a local fallback
//! - **Study Plans**: prerequisite-first sequencing with capacity-bounded daily placement
//!
//! All scheduling and planning math is pure and takes `now` explicitly. I/O
//! goes through the storage ports in [`storage`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cadence_core::prelude::*;
//!
//! let store = Arc::new(SqliteStore::new(None)?);
//! let scheduler = StudyScheduler::new(store);
//!
//! // Record a review
//! let event = ReviewEvent::new("learner-1", "Vectors", 90.0, Difficulty::Medium, Utc::now());
//! let state = scheduler.record_review(&event)?;
//!
//! // What needs attention?
//! let due = scheduler.due_reviews("learner-1", Utc::now())?;
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): compile SQLite into the crate

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod engine;
pub mod model;
pub mod planning;
pub mod prediction;
pub mod scheduling;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use config::{ConfigError, QualityScale, SchedulerConfig};
pub use engine::{SchedulerError, StudyScheduler};

// Domain model
pub use model::{
    Difficulty, LearnerProfile, LearningStyle, PerformanceRecord, ReviewEvent,
    StudyTimePreference, Subject, Topic, TopicCategory, TopicReviewState,
};

// Review scheduling
pub use scheduling::{
    forgetting_probability, prioritize, DueTopic, PerformanceAnalysis, Recommendation,
    RecommendationKind, RetentionPatterns, RetentionTrend, ReviewDigest, ReviewError,
    ReviewUpdater, SessionPlan, Urgency,
};

// Planning
pub use planning::{
    available_dates, daily_capacity_hours, sequence_topics, DependencyEdge, Milestone,
    PlanBuilder, PlanError, ScheduleDay, ScheduledTopic, StudyPlan, TopicSequence,
};

// Prediction
pub use prediction::{
    LocalRecallPredictor, PredictionError, PredictionSource, RecallFeatures, RecallPrediction,
    RecallPredictor,
};

// Storage layer
pub use storage::{
    InMemoryStore, PlanStore, ProfileSource, Result, ReviewStore, SqliteStore, StorageError,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Difficulty, DueTopic, InMemoryStore, LearnerProfile, LearningStyle, PlanStore,
        ProfileSource, RecallPredictor, ReviewDigest, ReviewEvent, ReviewStore, SchedulerConfig,
        SchedulerError, SqliteStore, StudyPlan, StudyScheduler, StudyTimePreference, Subject,
        Topic, TopicReviewState, Urgency,
    };
    pub use chrono::{NaiveDate, Utc};
}
