//! Study Planning
//!
//! Turns a curriculum and a date range into a dated study plan:
//! prerequisite-first sequencing, a per-learner daily capacity, greedy
//! placement with an overflow pass, then milestones and insights.

pub mod builder;
pub mod calendar;
pub mod capacity;
pub mod insights;
pub mod sequencer;

pub use builder::{PlanBuilder, PlanError, ScheduleDay, ScheduledTopic, StudyPlan, SubjectPlacement};
pub use calendar::{available_dates, ALL_WEEKDAYS};
pub use capacity::{daily_capacity_hours, default_daily_capacity_hours, BASE_DAILY_HOURS};
pub use insights::{plan_insights, plan_milestones, Milestone};
pub use sequencer::{sequence_topics, DependencyEdge, TopicSequence};
