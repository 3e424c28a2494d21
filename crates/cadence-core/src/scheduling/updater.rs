//! Review Updater
//!
//! SuperMemo-2 derived state transition applied after every learner activity.
//!
//! ## Transition
//!
//! - No prior state: start from `{interval 1, repetitions 0, ease 2.5}`
//! - Pass (`score >= 60`): `repetitions += 1`; interval becomes 1, then 6,
//!   then `round(prior_interval * prior_ease)`, capped at `max_interval_days`;
//!   ease moves by the SM-2 delta `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)`,
//!   floored at 1.3
//! - Fail: interval 1, repetitions 0, ease `max(1.3, ease - 0.2)`
//!
//! The forgetting probability stored alongside the state is computed from the
//! days elapsed since the *prior* review and the *new* interval.

use chrono::Duration;

use crate::config::{SchedulerConfig, MIN_EASE_FACTOR};
use crate::model::{PerformanceRecord, ReviewEvent, TopicReviewState};

use super::retention::forgetting_probability;

/// Interval assigned after the second consecutive pass
pub const SECOND_PASS_INTERVAL_DAYS: u32 = 6;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Validation failures for a review submission
///
/// Nothing is mutated when one of these is returned.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReviewError {
    /// Score outside 0 - 100 or not a number
    #[error("Invalid score {0}: expected a value between 0 and 100")]
    InvalidScore(f64),
    /// Prior state violates the scheduling invariants
    #[error("Invalid prior state for {topic_name}: {reason}")]
    InvalidPriorState { topic_name: String, reason: String },
    /// Prior state belongs to a different (learner, topic)
    #[error("Prior state {found} does not match review of {expected}")]
    KeyMismatch { expected: String, found: String },
    /// Next review date falls outside the representable calendar
    #[error("Next review for {topic_name} is {interval_days} days out, beyond the supported date range")]
    ScheduleOutOfRange { topic_name: String, interval_days: u32 },
}

// ============================================================================
// REVIEW UPDATER
// ============================================================================

/// Computes the next scheduling state from a review observation
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdater {
    config: SchedulerConfig,
}

impl ReviewUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Apply a review to the prior state (if any) and return the new state
    pub fn apply(
        &self,
        prior: Option<&TopicReviewState>,
        event: &ReviewEvent,
    ) -> Result<TopicReviewState, ReviewError> {
        if !event.score.is_finite() || !(0.0..=100.0).contains(&event.score) {
            return Err(ReviewError::InvalidScore(event.score));
        }
        if let Some(prior) = prior {
            self.validate_prior(prior, event)?;
        }

        let now = event.reviewed_at;
        let (prior_interval, prior_repetitions, prior_ease, days_since, mut history) = match prior
        {
            Some(p) => (
                p.interval_days,
                p.repetitions,
                p.ease_factor,
                p.days_since_review(now),
                p.performance_history.clone(),
            ),
            None => (1, 0, self.config.initial_ease_factor, 0, Vec::new()),
        };

        let (interval_days, repetitions, ease_factor) = if self.is_pass(event.score) {
            let repetitions = prior_repetitions.saturating_add(1);
            let interval_days = match repetitions {
                1 => 1,
                2 => SECOND_PASS_INTERVAL_DAYS,
                _ => grown_interval(prior_interval, prior_ease),
            };
            let interval_days = interval_days.min(self.config.max_interval_days).max(1);
            (interval_days, repetitions, self.next_ease_factor(prior_ease, event.score))
        } else {
            let ease = (prior_ease - self.config.fail_ease_penalty).max(self.ease_floor());
            (1, 0, ease)
        };

        let next_review = now
            .checked_add_signed(Duration::days(i64::from(interval_days)))
            .ok_or_else(|| ReviewError::ScheduleOutOfRange {
                topic_name: event.topic_name.clone(),
                interval_days,
            })?;

        history.push(PerformanceRecord {
            score: event.score,
            difficulty: event.difficulty,
            timestamp: now,
        });

        Ok(TopicReviewState {
            learner_id: event.learner_id.clone(),
            topic_name: event.topic_name.clone(),
            interval_days,
            repetitions,
            ease_factor,
            last_review: now,
            next_review,
            performance_history: history,
            forgetting_probability: forgetting_probability(days_since as f64, interval_days),
            difficulty: event.difficulty,
        })
    }

    /// Whether a score counts as a successful recall
    #[inline]
    pub fn is_pass(&self, score: f64) -> bool {
        score >= self.config.pass_threshold
    }

    /// SM-2 ease update for a passing review, floored at the minimum ease
    pub fn next_ease_factor(&self, prior_ease: f64, score: f64) -> f64 {
        let q = self.config.quality_scale.quality(score);
        let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
        (prior_ease + delta).max(self.ease_floor())
    }

    /// Configured minimum ease, never below the SM-2 floor of 1.3
    fn ease_floor(&self) -> f64 {
        self.config.min_ease_factor.max(MIN_EASE_FACTOR)
    }

    fn validate_prior(&self, prior: &TopicReviewState, event: &ReviewEvent) -> Result<(), ReviewError> {
        if prior.learner_id != event.learner_id || prior.topic_name != event.topic_name {
            return Err(ReviewError::KeyMismatch {
                expected: format!("{}/{}", event.learner_id, event.topic_name),
                found: format!("{}/{}", prior.learner_id, prior.topic_name),
            });
        }
        if prior.interval_days == 0 {
            return Err(ReviewError::InvalidPriorState {
                topic_name: prior.topic_name.clone(),
                reason: "interval_days must be at least 1".to_string(),
            });
        }
        if !prior.ease_factor.is_finite() {
            return Err(ReviewError::InvalidPriorState {
                topic_name: prior.topic_name.clone(),
                reason: "ease_factor is not a finite number".to_string(),
            });
        }
        Ok(())
    }
}

fn grown_interval(prior_interval: u32, prior_ease: f64) -> u32 {
    // `as` saturates on overflow
    ((f64::from(prior_interval) * prior_ease).round() as u32).max(1)
}
