//! Storage Module
//!
//! Ports the scheduling engine talks to, plus two adapters:
//! - `SqliteStore`: durable SQLite storage with schema migrations
//! - `InMemoryStore`: mutex-guarded maps for tests and embedding
//!
//! Review-state writes are upserts keyed by (learner, topic). Concurrent
//! writers to the same key resolve last-write-wins.

mod memory;
mod migrations;
mod sqlite;

pub use memory::InMemoryStore;
pub use migrations::{apply_migrations, get_current_version, Migration, MIGRATIONS};
pub use sqlite::SqliteStore;

use crate::model::{LearnerProfile, TopicReviewState};
use crate::planning::StudyPlan;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialized column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
    /// A lock guarding a connection or map was poisoned
    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
    /// Timestamp cannot be stored as a four-digit-year RFC 3339 string
    #[error("Timestamp {field} out of storable range: {value}")]
    TimestampOutOfRange { field: &'static str, value: String },
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// PORTS
// ============================================================================

/// Persistence for per-(learner, topic) review state
pub trait ReviewStore: Send + Sync {
    /// State for one topic, `None` before its first review
    fn get(&self, learner_id: &str, topic_name: &str) -> Result<Option<TopicReviewState>>;

    /// Insert or replace the state keyed by its learner and topic, returning what was stored
    fn upsert(&self, state: &TopicReviewState) -> Result<TopicReviewState>;

    /// Every state owned by a learner, ordered by topic name
    fn list_for_learner(&self, learner_id: &str) -> Result<Vec<TopicReviewState>>;
}

/// Read-only access to learner profiles
pub trait ProfileSource: Send + Sync {
    fn get_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>>;
}

/// Keeps the most recent plan per learner
pub trait PlanStore: Send + Sync {
    /// Save `plan`, replacing any earlier plan for the learner
    fn save_plan(&self, learner_id: &str, plan: &StudyPlan) -> Result<()>;

    fn latest_plan(&self, learner_id: &str) -> Result<Option<StudyPlan>>;
}
