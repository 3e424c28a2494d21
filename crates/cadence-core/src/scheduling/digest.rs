//! Review Digest
//!
//! Summarizes a learner's due reviews into something a dashboard can show:
//! the most urgent topics, a performance analysis across every recorded
//! review, per-topic retention patterns, a sized study session and a handful
//! of recommendations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{LearnerProfile, PerformanceRecord, TopicReviewState};

use super::prioritizer::{prioritize, DueTopic, Urgency};

/// Number of urgent topics surfaced in a digest
pub const URGENT_TOPIC_LIMIT: usize = 5;

/// Session length used when the learner has no profile
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

const MAX_SESSION_MINUTES: f64 = 120.0;
const MIN_SESSION_MINUTES: f64 = 20.0;
const MINUTES_PER_BREAK: u32 = 45;
const BREAK_LENGTH_MINUTES: u32 = 5;

/// Reported when no topic has been reviewed at least twice
pub const DEFAULT_AVERAGE_RETENTION: f64 = 0.7;
const DEFAULT_RETENTION_CONSISTENCY: f64 = 0.5;
/// Ratio used for a topic whose first score was zero
const ZERO_BASELINE_RETENTION: f64 = 0.5;

// ============================================================================
// PERFORMANCE ANALYSIS
// ============================================================================

/// Aggregate statistics over a learner's review history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAnalysis {
    pub average_score: f64,
    /// Relative change of the later half of reviews over the earlier half
    pub improvement_trend: f64,
    /// `1 - stddev / 100`; 1.0 is perfectly steady
    pub consistency: f64,
    pub total_reviews: usize,
}

impl PerformanceAnalysis {
    /// Analyze records in any order; they are sorted by timestamp first
    pub fn from_records(records: &[PerformanceRecord]) -> Self {
        if records.is_empty() {
            return Self {
                average_score: 0.0,
                improvement_trend: 0.0,
                consistency: 1.0,
                total_reviews: 0,
            };
        }

        let mut ordered: Vec<&PerformanceRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.timestamp);
        let scores: Vec<f64> = ordered.iter().map(|r| r.score).collect();

        let average_score = mean(&scores);

        let improvement_trend = if scores.len() >= 4 {
            let mid = scores.len() / 2;
            let first = mean(&scores[..mid]);
            let second = mean(&scores[mid..]);
            if first > 0.0 {
                (second - first) / first
            } else {
                0.0
            }
        } else {
            0.0
        };

        let consistency = if scores.len() > 1 {
            1.0 - population_std(&scores, average_score) / 100.0
        } else {
            1.0
        };

        Self {
            average_score,
            improvement_trend,
            consistency,
            total_reviews: scores.len(),
        }
    }

    /// Analyze every record across a learner's topics
    pub fn from_states(states: &[TopicReviewState]) -> Self {
        let records: Vec<PerformanceRecord> = states
            .iter()
            .flat_map(|s| s.performance_history.iter().cloned())
            .collect();
        Self::from_records(&records)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

// ============================================================================
// RETENTION PATTERNS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionTrend {
    Improving,
    Stable,
}

/// How well scores hold up between a topic's first and latest review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPatterns {
    /// Mean of latest-over-first score ratios
    pub average_retention: f64,
    /// `1 - stddev` of the ratios
    pub retention_consistency: f64,
    /// Improving when the last topic's ratio beats the first (needs 3 topics)
    pub trend: RetentionTrend,
    /// Topics with at least two reviews
    pub topics_analyzed: usize,
}

impl RetentionPatterns {
    /// Ratios are taken per topic in the order `states` is given
    pub fn from_states(states: &[TopicReviewState]) -> Self {
        let ratios: Vec<f64> = states.iter().filter_map(retention_ratio).collect();
        let (Some(&first), Some(&last)) = (ratios.first(), ratios.last()) else {
            return Self {
                average_retention: DEFAULT_AVERAGE_RETENTION,
                retention_consistency: DEFAULT_RETENTION_CONSISTENCY,
                trend: RetentionTrend::Stable,
                topics_analyzed: 0,
            };
        };

        let average_retention = mean(&ratios);
        let trend = if ratios.len() > 2 && last > first {
            RetentionTrend::Improving
        } else {
            RetentionTrend::Stable
        };

        Self {
            average_retention,
            retention_consistency: 1.0 - population_std(&ratios, average_retention),
            trend,
            topics_analyzed: ratios.len(),
        }
    }
}

fn retention_ratio(state: &TopicReviewState) -> Option<f64> {
    if state.performance_history.len() < 2 {
        return None;
    }
    let first = state.performance_history.iter().min_by_key(|r| r.timestamp)?;
    let latest = state.performance_history.iter().max_by_key(|r| r.timestamp)?;
    if first.score > 0.0 {
        Some(latest.score / first.score)
    } else {
        Some(ZERO_BASELINE_RETENTION)
    }
}

// ============================================================================
// SESSION PLAN
// ============================================================================

/// A single sized study session drawn from the due list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPlan {
    pub duration_minutes: u32,
    pub topic_count: usize,
    pub topics: Vec<String>,
    pub breaks: u32,
    /// Duration plus break time
    pub estimated_minutes: u32,
}

impl SessionPlan {
    /// Size a session for `due` topics (already prioritized)
    pub fn for_due_topics(due: &[DueTopic], profile: Option<&LearnerProfile>) -> Self {
        let base = f64::from(profile.map_or(DEFAULT_SESSION_MINUTES, |p| p.attention_span_minutes));

        let duration = if due.len() > 5 {
            (base * 1.5).min(MAX_SESSION_MINUTES)
        } else if due.len() > 2 {
            base
        } else {
            (base * 0.7).max(MIN_SESSION_MINUTES)
        };
        let duration_minutes = duration as u32;
        let breaks = (duration_minutes / MINUTES_PER_BREAK).max(1);

        let topics: Vec<String> = due
            .iter()
            .filter(|t| t.urgency.is_pressing())
            .take(3)
            .chain(due.iter().filter(|t| t.urgency == Urgency::Medium).take(2))
            .map(|t| t.topic_name.clone())
            .collect();

        Self {
            duration_minutes,
            topic_count: topics.len(),
            topics,
            breaks,
            estimated_minutes: duration_minutes
                .saturating_add(BREAK_LENGTH_MINUTES.saturating_mul(breaks)),
        }
    }
}

// ============================================================================
// RECOMMENDATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationKind {
    UrgentReview,
    Fundamentals,
    Improvement,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::UrgentReview => "URGENT_REVIEW",
            RecommendationKind::Fundamentals => "FUNDAMENTALS",
            RecommendationKind::Improvement => "IMPROVEMENT",
        }
    }
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Urgency,
    pub message: String,
    /// Topics the recommendation refers to, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

fn recommendations(due: &[DueTopic], performance: &PerformanceAnalysis) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let pressing: Vec<String> = due
        .iter()
        .filter(|t| t.urgency.is_pressing())
        .take(3)
        .map(|t| t.topic_name.clone())
        .collect();
    if !pressing.is_empty() {
        out.push(Recommendation {
            kind: RecommendationKind::UrgentReview,
            priority: Urgency::High,
            message: format!("Review these topics soon: {}", pressing.join(", ")),
            topics: pressing,
        });
    }

    if performance.total_reviews > 0 && performance.average_score < 60.0 {
        out.push(Recommendation {
            kind: RecommendationKind::Fundamentals,
            priority: Urgency::Medium,
            message: "Scores are below passing on average; revisit the fundamentals".to_string(),
            topics: Vec::new(),
        });
    }

    if performance.improvement_trend > 0.1 {
        out.push(Recommendation {
            kind: RecommendationKind::Improvement,
            priority: Urgency::Low,
            message: "Recent scores are trending up; consider more challenging material"
                .to_string(),
            topics: Vec::new(),
        });
    }

    out
}

// ============================================================================
// DIGEST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDigest {
    pub urgent_topics: Vec<DueTopic>,
    pub total_due: usize,
    pub recommendations: Vec<Recommendation>,
    pub session_plan: SessionPlan,
    pub performance: PerformanceAnalysis,
    pub retention: RetentionPatterns,
}

impl ReviewDigest {
    /// Build a digest over every review state a learner has
    pub fn build(
        states: &[TopicReviewState],
        profile: Option<&LearnerProfile>,
        now: DateTime<Utc>,
    ) -> Self {
        let due = prioritize(states, profile, now);
        let performance = PerformanceAnalysis::from_states(states);
        let retention = RetentionPatterns::from_states(states);
        let session_plan = SessionPlan::for_due_topics(&due, profile);
        let recommendations = recommendations(&due, &performance);

        Self {
            total_due: due.len(),
            urgent_topics: due.into_iter().take(URGENT_TOPIC_LIMIT).collect(),
            recommendations,
            session_plan,
            performance,
            retention,
        }
    }
}
