//! Plan Builder
//!
//! Lays each subject's sequenced topics onto the available dates:
//!
//! 1. **First pass** - walk the dates in order, greedily filling the current
//!    date while the topic still fits under the daily capacity; a topic that
//!    does not fit closes the date and is retried on the next one.
//! 2. **Overflow pass** - topics left over once dates run out are dealt
//!    round-robin across the same dates with no capacity check.
//!
//! Subjects are placed independently against the same capacity and then
//! merged date by date, so a merged date may exceed the capacity.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::model::{LearnerProfile, Subject, Topic, TopicCategory};

use super::capacity::daily_capacity_hours;
use super::insights::{plan_insights, plan_milestones, Milestone};
use super::sequencer::{sequence_topics, DependencyEdge};

// ============================================================================
// ERRORS
// ============================================================================

/// Precondition failures; nothing is produced when one is returned
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("No available study days in the requested range")]
    NoAvailableDays,
    #[error("No subject has any topics to plan")]
    EmptySubjectList,
    #[error("Invalid topic '{topic}' in subject '{subject}': {reason}")]
    InvalidTopic {
        subject: String,
        topic: String,
        reason: String,
    },
}

// ============================================================================
// PLAN TYPES
// ============================================================================

/// One topic placed on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTopic {
    pub subject: String,
    pub topic_name: String,
    pub estimated_hours: f64,
    pub difficulty: u8,
    pub category: TopicCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub learning_objectives: Vec<String>,
    /// Placed by the overflow pass, ignoring capacity
    pub overflow: bool,
}

/// Everything scheduled on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub topics: Vec<ScheduledTopic>,
    pub total_hours: f64,
    pub max_difficulty: u8,
    /// At least one topic landed here through the overflow pass
    pub overflowed: bool,
}

impl ScheduleDay {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            topics: Vec::new(),
            total_hours: 0.0,
            max_difficulty: 0,
            overflowed: false,
        }
    }

    fn push(&mut self, topic: ScheduledTopic) {
        self.total_hours += topic.estimated_hours;
        self.max_difficulty = self.max_difficulty.max(topic.difficulty);
        self.overflowed |= topic.overflow;
        self.topics.push(topic);
    }

    fn absorb(&mut self, other: ScheduleDay) {
        for topic in other.topics {
            self.push(topic);
        }
    }
}

/// A complete study plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub daily_capacity_hours: f64,
    /// Only dates that received at least one topic
    pub days: BTreeMap<NaiveDate, ScheduleDay>,
    /// Topics placed by the overflow pass
    pub overflow_placements: usize,
    pub ignored_cycle_edges: Vec<DependencyEdge>,
    pub milestones: Vec<Milestone>,
    pub insights: Vec<String>,
}

impl StudyPlan {
    pub fn total_topics(&self) -> usize {
        self.days.values().map(|d| d.topics.len()).sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.days.values().map(|d| d.total_hours).sum()
    }

    /// Date a topic was placed on, if any
    pub fn date_of(&self, topic_name: &str) -> Option<NaiveDate> {
        self.days
            .values()
            .find(|d| d.topics.iter().any(|t| t.topic_name == topic_name))
            .map(|d| d.date)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Placement of a single subject before merging
#[derive(Debug, Default)]
pub struct SubjectPlacement {
    pub days: Vec<ScheduleDay>,
    pub overflow_placements: usize,
    pub ignored_cycle_edges: Vec<DependencyEdge>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanBuilder {
    config: SchedulerConfig,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build a plan across every subject
    pub fn build(
        &self,
        subjects: &[Subject],
        dates: &[NaiveDate],
        profile: Option<&LearnerProfile>,
        now: DateTime<Utc>,
    ) -> Result<StudyPlan, PlanError> {
        if dates.is_empty() {
            return Err(PlanError::NoAvailableDays);
        }
        if subjects.iter().all(|s| s.topics.is_empty()) {
            return Err(PlanError::EmptySubjectList);
        }
        for subject in subjects {
            for topic in &subject.topics {
                validate_topic(subject, topic)?;
            }
        }

        let capacity = daily_capacity_hours(profile, self.config.max_daily_hours);

        let mut days: BTreeMap<NaiveDate, ScheduleDay> = BTreeMap::new();
        let mut overflow_placements = 0;
        let mut ignored_cycle_edges = Vec::new();

        for subject in subjects.iter().filter(|s| !s.topics.is_empty()) {
            let placement = self.place_subject(subject, dates, capacity);
            overflow_placements += placement.overflow_placements;
            ignored_cycle_edges.extend(placement.ignored_cycle_edges);
            for day in placement.days {
                days.entry(day.date)
                    .or_insert_with(|| ScheduleDay::empty(day.date))
                    .absorb(day);
            }
        }

        if overflow_placements > 0 {
            tracing::warn!(
                overflow_placements,
                capacity,
                "Topics placed beyond daily capacity"
            );
        }

        let milestones = plan_milestones(&days);
        let insights = plan_insights(&days, overflow_placements, &ignored_cycle_edges, profile);

        let plan = StudyPlan {
            id: Uuid::new_v4(),
            generated_at: now,
            daily_capacity_hours: capacity,
            days,
            overflow_placements,
            ignored_cycle_edges,
            milestones,
            insights,
        };

        tracing::info!(
            plan_id = %plan.id,
            subjects = subjects.len(),
            days = plan.days.len(),
            topics = plan.total_topics(),
            "Built study plan"
        );

        Ok(plan)
    }

    /// Place one subject's topics; only dates that received topics are returned
    pub fn place_subject(
        &self,
        subject: &Subject,
        dates: &[NaiveDate],
        capacity: f64,
    ) -> SubjectPlacement {
        let sequence = sequence_topics(&subject.topics);
        if dates.is_empty() {
            return SubjectPlacement {
                ignored_cycle_edges: sequence.ignored_cycle_edges,
                ..SubjectPlacement::default()
            };
        }
        if !sequence.dangling_dependencies.is_empty() {
            tracing::debug!(
                subject = %subject.name,
                dangling = sequence.dangling_dependencies.len(),
                "Ignoring prerequisites outside the subject"
            );
        }

        let mut slots: Vec<ScheduleDay> = dates.iter().map(|&d| ScheduleDay::empty(d)).collect();
        let mut remaining = sequence.ordered.iter().peekable();

        // First pass
        let mut day_index = 0;
        while day_index < slots.len() {
            let Some(topic) = remaining.peek() else {
                break;
            };
            let hours = topic.hours_or(self.config.default_topic_hours);
            if slots[day_index].total_hours + hours <= capacity {
                slots[day_index].push(self.scheduled(subject, topic, false));
                remaining.next();
            } else {
                day_index += 1;
            }
        }

        // Overflow pass
        let mut overflow_placements = 0;
        let day_count = slots.len();
        for (i, topic) in remaining.enumerate() {
            slots[i % day_count].push(self.scheduled(subject, topic, true));
            overflow_placements += 1;
        }

        SubjectPlacement {
            days: slots.into_iter().filter(|d| !d.topics.is_empty()).collect(),
            overflow_placements,
            ignored_cycle_edges: sequence.ignored_cycle_edges,
        }
    }

    fn scheduled(&self, subject: &Subject, topic: &Topic, overflow: bool) -> ScheduledTopic {
        ScheduledTopic {
            subject: subject.name.clone(),
            topic_name: topic.name.clone(),
            estimated_hours: topic.hours_or(self.config.default_topic_hours),
            difficulty: topic.difficulty_or(self.config.default_topic_difficulty),
            category: topic.category,
            learning_objectives: topic.learning_objectives.clone(),
            overflow,
        }
    }
}

fn validate_topic(subject: &Subject, topic: &Topic) -> Result<(), PlanError> {
    let invalid = |reason: &str| PlanError::InvalidTopic {
        subject: subject.name.clone(),
        topic: topic.name.clone(),
        reason: reason.to_string(),
    };

    if let Some(hours) = topic.estimated_hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(invalid("estimated hours must be a non-negative number"));
        }
    }
    if let Some(difficulty) = topic.difficulty {
        if !(1..=5).contains(&difficulty) {
            return Err(invalid("difficulty must be between 1 and 5"));
        }
    }
    Ok(())
}
