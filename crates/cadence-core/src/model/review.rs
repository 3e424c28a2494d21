//! Topic Review State - The unit of spaced-repetition scheduling
//!
//! One record exists per (learner, topic). It is created on the first review
//! event for a topic, mutated only by the review updater and never deleted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Perceived difficulty of a review (or of a topic's review track)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Comfortable material
    Easy,
    /// Typical material
    #[default]
    Medium,
    /// Demanding material
    Hard,
}

impl Difficulty {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PERFORMANCE HISTORY
// ============================================================================

/// A single observed review outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    /// Score in percent (0 - 100)
    pub score: f64,
    /// Difficulty the learner reviewed at
    pub difficulty: Difficulty,
    /// When the review happened
    pub timestamp: DateTime<Utc>,
}

/// A performance observation submitted after a learner activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    pub learner_id: String,
    pub topic_name: String,
    /// Score in percent (0 - 100)
    pub score: f64,
    pub difficulty: Difficulty,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewEvent {
    /// Create an event for a review that happened at `reviewed_at`
    pub fn new(
        learner_id: impl Into<String>,
        topic_name: impl Into<String>,
        score: f64,
        difficulty: Difficulty,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            learner_id: learner_id.into(),
            topic_name: topic_name.into(),
            score,
            difficulty,
            reviewed_at,
        }
    }
}

// ============================================================================
// TOPIC REVIEW STATE
// ============================================================================

/// Scheduling state for one topic of one learner
///
/// Invariants maintained by the review updater:
/// - `ease_factor >= 1.3`
/// - `interval_days >= 1`
/// - `next_review == last_review + interval_days`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicReviewState {
    /// Owning learner (persisted as `userId`)
    #[serde(rename = "userId")]
    pub learner_id: String,
    pub topic_name: String,
    /// Days between the last review and the next one
    pub interval_days: u32,
    /// Consecutive passing reviews
    pub repetitions: u32,
    /// SM-2 interval multiplier
    pub ease_factor: f64,
    pub last_review: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    /// Append-only review log, oldest first
    pub performance_history: Vec<PerformanceRecord>,
    /// Forgetting probability recorded at the time of the last review
    pub forgetting_probability: f64,
    pub difficulty: Difficulty,
}

impl TopicReviewState {
    /// Whole days elapsed since the last review (never negative)
    pub fn days_since_review(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_review).num_days().max(0)
    }

    /// Whether the scheduled review time has passed
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Mean score over the whole history
    pub fn average_score(&self) -> Option<f64> {
        mean_score(&self.performance_history)
    }

    /// Mean score over the last `n` reviews
    pub fn recent_average_score(&self, n: usize) -> Option<f64> {
        let start = self.performance_history.len().saturating_sub(n);
        mean_score(&self.performance_history[start..])
    }

    /// Recompute `next_review` from `last_review` and `interval_days`
    ///
    /// `None` when the result falls outside the representable calendar.
    pub fn scheduled_next_review(&self) -> Option<DateTime<Utc>> {
        self.last_review
            .checked_add_signed(Duration::days(i64::from(self.interval_days)))
    }
}

fn mean_score(records: &[PerformanceRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(|r| r.score).sum();
    Some(total / records.len() as f64)
}
