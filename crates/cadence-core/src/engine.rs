//! Study Scheduler
//!
//! Ties the pure scheduling and planning components to the storage ports.
//! Each operation reads what it needs, computes, and writes at most once.
//! `now` is always supplied by the caller.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::{ConfigError, SchedulerConfig};
use crate::model::{ReviewEvent, Subject, TopicReviewState};
use crate::planning::{PlanBuilder, PlanError, StudyPlan};
use crate::prediction::{
    LocalRecallPredictor, PredictionSource, RecallFeatures, RecallPrediction, RecallPredictor,
};
use crate::scheduling::{prioritize, DueTopic, ReviewDigest, ReviewError, ReviewUpdater};
use crate::storage::{PlanStore, ProfileSource, ReviewStore, StorageError};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No review state for topic '{topic_name}' of learner '{learner_id}'")]
    UnknownTopic {
        learner_id: String,
        topic_name: String,
    },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

// ============================================================================
// SCHEDULER
// ============================================================================

/// Scheduling engine over injected storage and an optional remote predictor
pub struct StudyScheduler {
    reviews: Arc<dyn ReviewStore>,
    profiles: Arc<dyn ProfileSource>,
    plans: Arc<dyn PlanStore>,
    predictor: Option<Arc<dyn RecallPredictor>>,
    local: LocalRecallPredictor,
    updater: ReviewUpdater,
    planner: PlanBuilder,
}

impl StudyScheduler {
    /// Engine backed by one store implementing every port
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: ReviewStore + ProfileSource + PlanStore + 'static,
    {
        Self::from_parts(store.clone(), store.clone(), store)
    }

    pub fn from_parts(
        reviews: Arc<dyn ReviewStore>,
        profiles: Arc<dyn ProfileSource>,
        plans: Arc<dyn PlanStore>,
    ) -> Self {
        Self {
            reviews,
            profiles,
            plans,
            predictor: None,
            local: LocalRecallPredictor::new(),
            updater: ReviewUpdater::new(),
            planner: PlanBuilder::new(),
        }
    }

    /// Replace the configuration of every component
    ///
    /// Fails without changing anything when `config` does not validate.
    pub fn with_config(mut self, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        self.updater = ReviewUpdater::with_config(config.clone());
        self.planner = PlanBuilder::with_config(config);
        Ok(self)
    }

    /// Consult `predictor` before the local model
    pub fn with_predictor(mut self, predictor: Arc<dyn RecallPredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        self.updater.config()
    }

    /// Apply one review event and persist the resulting state
    ///
    /// The returned state is what the store holds after the write.
    pub fn record_review(&self, event: &ReviewEvent) -> Result<TopicReviewState> {
        let prior = self.reviews.get(&event.learner_id, &event.topic_name)?;
        let next = self.updater.apply(prior.as_ref(), event)?;
        let stored = self.reviews.upsert(&next)?;

        tracing::info!(
            learner = %stored.learner_id,
            topic = %stored.topic_name,
            score = event.score,
            first_review = prior.is_none(),
            interval_days = stored.interval_days,
            repetitions = stored.repetitions,
            ease_factor = stored.ease_factor,
            "Recorded review"
        );
        Ok(stored)
    }

    /// Topics due for review, most urgent first
    pub fn due_reviews(&self, learner_id: &str, now: DateTime<Utc>) -> Result<Vec<DueTopic>> {
        let states = self.reviews.list_for_learner(learner_id)?;
        let profile = self.profiles.get_profile(learner_id)?;
        Ok(prioritize(&states, profile.as_ref(), now))
    }

    /// Dashboard digest of a learner's reviews
    pub fn review_digest(&self, learner_id: &str, now: DateTime<Utc>) -> Result<ReviewDigest> {
        let states = self.reviews.list_for_learner(learner_id)?;
        let profile = self.profiles.get_profile(learner_id)?;
        Ok(ReviewDigest::build(&states, profile.as_ref(), now))
    }

    /// Recall prediction for one topic, remote first with local fallback
    pub fn predict_recall(
        &self,
        learner_id: &str,
        topic_name: &str,
        now: DateTime<Utc>,
    ) -> Result<RecallPrediction> {
        let state = self
            .reviews
            .get(learner_id, topic_name)?
            .ok_or_else(|| SchedulerError::UnknownTopic {
                learner_id: learner_id.to_string(),
                topic_name: topic_name.to_string(),
            })?;
        let profile = self.profiles.get_profile(learner_id)?;
        let features = RecallFeatures::from_state(&state, profile.as_ref(), now);

        if let Some(remote) = &self.predictor {
            match remote.predict_recall(&features).and_then(RecallPrediction::validate) {
                Ok(prediction) => {
                    return Ok(RecallPrediction {
                        source: PredictionSource::Remote,
                        ..prediction
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        learner = learner_id,
                        topic = topic_name,
                        error = %e,
                        "Remote recall prediction failed, using local model"
                    );
                }
            }
        }

        Ok(self.local.predict(&features))
    }

    /// Build a plan over `dates`, saving it as the learner's latest
    pub fn build_plan(
        &self,
        learner_id: &str,
        subjects: &[Subject],
        dates: &[NaiveDate],
        now: DateTime<Utc>,
    ) -> Result<StudyPlan> {
        let profile = self.profiles.get_profile(learner_id)?;
        let plan = self.planner.build(subjects, dates, profile.as_ref(), now)?;
        self.plans.save_plan(learner_id, &plan)?;
        Ok(plan)
    }

    pub fn latest_plan(&self, learner_id: &str) -> Result<Option<StudyPlan>> {
        Ok(self.plans.latest_plan(learner_id)?)
    }
}
