//! Plan milestones and human-readable insights

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{LearnerProfile, LearningStyle};

use super::builder::ScheduleDay;
use super::sequencer::DependencyEdge;

const MILESTONE_COUNT: usize = 4;

/// Topics at or above this difficulty count as hard
pub const HARD_DIFFICULTY: u8 = 4;

/// Topics at or below this difficulty count as easy
pub const EASY_DIFFICULTY: u8 = 2;

/// A progress checkpoint within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// 1-based
    pub number: u8,
    pub date: NaiveDate,
    /// Share of topics expected to be done by `date`
    pub target_percent: u8,
    /// Topics actually scheduled up to and including `date`
    pub topics_scheduled: usize,
    pub total_topics: usize,
}

/// Four evenly spaced checkpoints over the scheduled dates
pub fn plan_milestones(days: &BTreeMap<NaiveDate, ScheduleDay>) -> Vec<Milestone> {
    let ordered: Vec<&ScheduleDay> = days.values().collect();
    if ordered.is_empty() {
        return Vec::new();
    }

    let spacing = (ordered.len() / MILESTONE_COUNT).max(1);
    let total_topics: usize = ordered.iter().map(|d| d.topics.len()).sum();

    let mut cumulative = Vec::with_capacity(ordered.len());
    let mut running = 0;
    for day in &ordered {
        running += day.topics.len();
        cumulative.push(running);
    }

    (1..=MILESTONE_COUNT)
        .map(|n| {
            let index = (n * spacing).min(ordered.len()) - 1;
            Milestone {
                number: n as u8,
                date: ordered[index].date,
                target_percent: (n * 25) as u8,
                topics_scheduled: cumulative[index],
                total_topics,
            }
        })
        .collect()
}

/// Observations about a finished plan
pub fn plan_insights(
    days: &BTreeMap<NaiveDate, ScheduleDay>,
    overflow_placements: usize,
    ignored_cycle_edges: &[DependencyEdge],
    profile: Option<&LearnerProfile>,
) -> Vec<String> {
    let mut insights = Vec::new();

    let total_hours: f64 = days.values().map(|d| d.total_hours).sum();
    insights.push(format!("Total study time planned: {total_hours:.1} hours"));

    let (hard, easy) = days
        .values()
        .flat_map(|d| d.topics.iter())
        .fold((0usize, 0usize), |(hard, easy), t| {
            (
                hard + usize::from(t.difficulty >= HARD_DIFFICULTY),
                easy + usize::from(t.difficulty <= EASY_DIFFICULTY),
            )
        });
    if hard > easy {
        insights.push(
            "Plan focuses on challenging topics; consider adding more foundational review"
                .to_string(),
        );
    } else if easy > hard {
        insights.push("Plan emphasizes fundamentals, good for building a strong foundation".to_string());
    }

    if overflow_placements > 0 {
        insights.push(format!(
            "{overflow_placements} topic(s) did not fit within daily capacity; consider extending the plan"
        ));
    }

    if !ignored_cycle_edges.is_empty() {
        insights.push(format!(
            "{} circular prerequisite link(s) were ignored",
            ignored_cycle_edges.len()
        ));
    }

    match profile.map(|p| p.learning_style) {
        Some(LearningStyle::Visual) => {
            insights.push("Consider creating diagrams and mind maps for visual learning".to_string())
        }
        Some(LearningStyle::Kinesthetic) => {
            insights.push("Try hands-on practice and interactive exercises".to_string())
        }
        _ => {}
    }

    insights
}
