//! Curriculum - subjects, topics and prerequisite edges
//!
//! Topics are immutable once handed to the planner for a given planning run.

use serde::{Deserialize, Serialize};

/// Hours assumed for a topic without an estimate
pub const DEFAULT_TOPIC_HOURS: f64 = 2.0;

/// Difficulty assumed for a topic without a rating
pub const DEFAULT_TOPIC_DIFFICULTY: u8 = 3;

/// Curriculum category of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TopicCategory {
    #[default]
    Core,
    Advanced,
    Optional,
}

/// A topic within a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    /// Difficulty rating 1 - 5
    pub difficulty: Option<u8>,
    pub estimated_hours: Option<f64>,
    /// Names of prerequisite topics in the same subject
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub category: TopicCategory,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
}

impl Topic {
    /// Create a topic with no estimates and no prerequisites
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            difficulty: None,
            estimated_hours: None,
            dependencies: Vec::new(),
            category: TopicCategory::default(),
            learning_objectives: Vec::new(),
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn with_category(mut self, category: TopicCategory) -> Self {
        self.category = category;
        self
    }

    /// Estimated hours, falling back to the default when unset
    pub fn hours_or(&self, default: f64) -> f64 {
        self.estimated_hours.unwrap_or(default)
    }

    /// Difficulty, falling back to the default when unset
    pub fn difficulty_or(&self, default: u8) -> u8 {
        self.difficulty.unwrap_or(default)
    }
}

/// A named group of topics planned together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub topics: Vec<Topic>,
}

impl Subject {
    pub fn new(name: impl Into<String>, topics: Vec<Topic>) -> Self {
        Self {
            name: name.into(),
            topics,
        }
    }
}
