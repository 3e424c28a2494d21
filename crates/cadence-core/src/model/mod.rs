//! Domain Model
//!
//! Plain data shared by every scheduling component:
//! - Per-(learner, topic) review state with its append-only performance history
//! - Learner profiles (read-only input owned by an external collaborator)
//! - Curriculum: subjects, topics and their prerequisite edges

mod curriculum;
mod profile;
mod review;

pub use curriculum::{Subject, Topic, TopicCategory, DEFAULT_TOPIC_DIFFICULTY, DEFAULT_TOPIC_HOURS};
pub use profile::{LearnerProfile, LearningStyle, StudyTimePreference};
pub use review::{Difficulty, PerformanceRecord, ReviewEvent, TopicReviewState};
