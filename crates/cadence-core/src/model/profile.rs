//! Learner Profile
//!
//! Read-only input to the prioritizer and the capacity model. Profiles are
//! created and updated by an external collaborator.

use serde::{Deserialize, Serialize};

use super::Difficulty;

/// Preferred modality for absorbing material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    #[default]
    Reading,
}

impl LearningStyle {
    /// Retention multiplier applied by the review prioritizer
    ///
    /// | Style       | Multiplier |
    /// |-------------|------------|
    /// | Visual      | 1.10       |
    /// | Auditory    | 1.00       |
    /// | Kinesthetic | 0.90       |
    /// | Reading     | 1.05       |
    #[inline]
    pub fn retention_multiplier(&self) -> f64 {
        match self {
            LearningStyle::Visual => 1.1,
            LearningStyle::Auditory => 1.0,
            LearningStyle::Kinesthetic => 0.9,
            LearningStyle::Reading => 1.05,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Auditory => "auditory",
            LearningStyle::Kinesthetic => "kinesthetic",
            LearningStyle::Reading => "reading",
        }
    }

    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "visual" => LearningStyle::Visual,
            "auditory" => LearningStyle::Auditory,
            "kinesthetic" => LearningStyle::Kinesthetic,
            _ => LearningStyle::Reading,
        }
    }
}

impl std::fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Time of day the learner prefers to study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudyTimePreference {
    Morning,
    Afternoon,
    Evening,
    Night,
    #[default]
    Flexible,
}

impl StudyTimePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyTimePreference::Morning => "morning",
            StudyTimePreference::Afternoon => "afternoon",
            StudyTimePreference::Evening => "evening",
            StudyTimePreference::Night => "night",
            StudyTimePreference::Flexible => "flexible",
        }
    }

    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "morning" => StudyTimePreference::Morning,
            "afternoon" => StudyTimePreference::Afternoon,
            "evening" => StudyTimePreference::Evening,
            "night" => StudyTimePreference::Night,
            _ => StudyTimePreference::Flexible,
        }
    }
}

/// Per-learner study profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub learning_style: LearningStyle,
    /// Typical focused attention span in minutes
    pub attention_span_minutes: u32,
    /// Explicit difficulty preference; `None` lets performance decide
    pub difficulty_preference: Option<Difficulty>,
    pub study_time_preference: StudyTimePreference,
    /// Self-reported or measured retention rate (0.0 - 1.0)
    pub retention_rate: f64,
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self {
            learning_style: LearningStyle::default(),
            attention_span_minutes: 60,
            difficulty_preference: None,
            study_time_preference: StudyTimePreference::default(),
            retention_rate: 1.0,
        }
    }
}
