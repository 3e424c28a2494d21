//! Review Prioritizer
//!
//! Ranks a learner's topics by how urgently they need review. Each topic's
//! retention is estimated from a multi-factor model:
//!
//! ```text
//! base      = e^(-days_since_review / (ease_factor * 7))
//! adjusted  = base * retention_rate * style_multiplier * (0.5 + 0.5 * avg_score / 100)
//! forgetting = 1 - clamp(adjusted, 0, 1)
//! ```
//!
//! Topics are included when `forgetting > 0.3` or the review is overdue, and
//! sorted by urgency tier then by descending confidence. The function is pure:
//! `now` is always supplied by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, LearnerProfile, LearningStyle, TopicReviewState};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Days of retention granted per unit of ease factor
pub const EASE_RETENTION_DAYS: f64 = 7.0;

/// Forgetting probability above which a topic is always included
pub const INCLUSION_THRESHOLD: f64 = 0.3;

/// Confidence before any successful repetitions
pub const BASE_CONFIDENCE: f64 = 0.7;

/// Confidence gained per repetition
pub const CONFIDENCE_PER_REPETITION: f64 = 0.05;

/// Confidence ceiling
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Recent-average score below which foundational review is suggested
pub const FOUNDATIONAL_REVIEW_THRESHOLD: f64 = 60.0;

/// Number of most recent reviews considered for foundational review
pub const RECENT_REVIEW_WINDOW: usize = 3;

// ============================================================================
// URGENCY
// ============================================================================

/// Coarse bucket summarizing how overdue a review is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Bucket a forgetting probability
    pub fn from_forgetting_probability(p: f64) -> Self {
        if p > 0.8 {
            Urgency::Critical
        } else if p > 0.6 {
            Urgency::High
        } else if p > 0.4 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    /// Sort rank, most urgent first
    #[inline]
    pub fn rank(&self) -> u8 {
        match self {
            Urgency::Critical => 0,
            Urgency::High => 1,
            Urgency::Medium => 2,
            Urgency::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "CRITICAL",
            Urgency::High => "HIGH",
            Urgency::Medium => "MEDIUM",
            Urgency::Low => "LOW",
        }
    }

    /// Critical or high
    #[inline]
    pub fn is_pressing(&self) -> bool {
        matches!(self, Urgency::Critical | Urgency::High)
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DUE TOPIC
// ============================================================================

/// A topic selected for review, annotated for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueTopic {
    pub topic_name: String,
    pub urgency: Urgency,
    pub forgetting_probability: f64,
    pub retention_probability: f64,
    pub confidence: f64,
    pub days_since_review: i64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub next_review: DateTime<Utc>,
    pub recommendations: Vec<String>,
    pub optimal_difficulty: Difficulty,
}

/// Full retention assessment of one topic, whether or not it is due
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionAssessment {
    pub days_since_review: i64,
    pub retention_probability: f64,
    pub forgetting_probability: f64,
    pub urgency: Urgency,
    pub should_include: bool,
    pub confidence: f64,
}

// ============================================================================
// FUNCTIONS
// ============================================================================

/// Estimated retention after `days_since_review` whole days
///
/// `style` and `retention_rate` come from the learner profile; `average_score`
/// from the topic's performance history.
pub fn adjusted_retention(
    days_since_review: f64,
    ease_factor: f64,
    retention_rate: Option<f64>,
    style: Option<LearningStyle>,
    average_score: Option<f64>,
) -> f64 {
    let mut retention = (-days_since_review / (ease_factor * EASE_RETENTION_DAYS)).exp();
    retention *= retention_rate.unwrap_or(1.0);
    retention *= style.map_or(1.0, |s| s.retention_multiplier());
    if let Some(avg) = average_score {
        retention *= 0.5 + 0.5 * (avg / 100.0);
    }
    retention.clamp(0.0, 1.0)
}

/// Confidence in a topic's assessment, growing with repetitions
#[inline]
pub fn confidence_for(repetitions: u32) -> f64 {
    (BASE_CONFIDENCE + f64::from(repetitions) * CONFIDENCE_PER_REPETITION).min(MAX_CONFIDENCE)
}

/// Assess a single topic against the learner profile at `now`
pub fn assess(
    state: &TopicReviewState,
    profile: Option<&LearnerProfile>,
    now: DateTime<Utc>,
) -> RetentionAssessment {
    let days_since_review = state.days_since_review(now);
    let retention = adjusted_retention(
        days_since_review as f64,
        state.ease_factor,
        profile.map(|p| p.retention_rate),
        profile.map(|p| p.learning_style),
        state.average_score(),
    );
    let forgetting = 1.0 - retention;

    RetentionAssessment {
        days_since_review,
        retention_probability: retention,
        forgetting_probability: forgetting,
        urgency: Urgency::from_forgetting_probability(forgetting),
        should_include: forgetting > INCLUSION_THRESHOLD
            || days_since_review > i64::from(state.interval_days),
        confidence: confidence_for(state.repetitions),
    }
}

/// Rank the topics due for review, most urgent first
pub fn prioritize(
    states: &[TopicReviewState],
    profile: Option<&LearnerProfile>,
    now: DateTime<Utc>,
) -> Vec<DueTopic> {
    let mut due: Vec<DueTopic> = states
        .iter()
        .filter_map(|state| {
            let assessment = assess(state, profile, now);
            if !assessment.should_include {
                return None;
            }
            Some(DueTopic {
                topic_name: state.topic_name.clone(),
                urgency: assessment.urgency,
                forgetting_probability: assessment.forgetting_probability,
                retention_probability: assessment.retention_probability,
                confidence: assessment.confidence,
                days_since_review: assessment.days_since_review,
                interval_days: state.interval_days,
                repetitions: state.repetitions,
                ease_factor: state.ease_factor,
                next_review: state.next_review,
                recommendations: recommendations_for(state, profile, assessment.urgency),
                optimal_difficulty: optimal_difficulty(state, profile),
            })
        })
        .collect();

    // Stable sort keeps input order among equal keys
    due.sort_by(|a, b| {
        a.urgency
            .rank()
            .cmp(&b.urgency.rank())
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });
    due
}

/// Study recommendations attached to a due topic
pub fn recommendations_for(
    state: &TopicReviewState,
    profile: Option<&LearnerProfile>,
    urgency: Urgency,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if urgency == Urgency::Critical {
        recommendations.push(format!(
            "High priority: review {} today before it is forgotten",
            state.topic_name
        ));
    }

    if profile.is_some_and(|p| p.learning_style == LearningStyle::Visual) {
        recommendations.push("Use diagrams and mind maps to reinforce this topic".to_string());
    }

    if state
        .recent_average_score(RECENT_REVIEW_WINDOW)
        .is_some_and(|avg| avg < FOUNDATIONAL_REVIEW_THRESHOLD)
    {
        recommendations
            .push("Revisit the foundational concepts before moving on".to_string());
    }

    recommendations
}

/// Difficulty the next review should be pitched at
pub fn optimal_difficulty(state: &TopicReviewState, profile: Option<&LearnerProfile>) -> Difficulty {
    if let Some(preferred) = profile.and_then(|p| p.difficulty_preference) {
        return preferred;
    }
    match state.average_score() {
        Some(avg) if avg > 80.0 => Difficulty::Hard,
        Some(avg) if avg < 60.0 => Difficulty::Easy,
        _ => state.difficulty,
    }
}
