//! Test Database Manager
//!
//! Provides isolated SQLite stores for testing:
//! - Temporary databases that are automatically cleaned up
//! - Pre-seeded review histories
//! - Reopening the same file to check durability

use std::path::PathBuf;
use std::sync::Arc;

use cadence_core::{
    Difficulty, ReviewEvent, ReviewStore, SqliteStore, StudyScheduler, TopicReviewState,
};
use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

/// Manager for test databases
///
/// Each manager owns its own database file, so tests never interfere.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
/// let scheduler = db.scheduler();
/// scheduler.record_review(&event)?;
/// // Database is deleted when `db` goes out of scope
/// ```
pub struct TestDatabaseManager {
    /// The store instance
    pub store: Arc<SqliteStore>,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: Option<TempDir>,
    db_path: PathBuf,
}

impl TestDatabaseManager {
    /// Create a new test database in a temporary directory
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_cadence.db");
        let store = SqliteStore::new(Some(db_path.clone())).expect("Failed to create test store");

        Self {
            store: Arc::new(store),
            _temp_dir: Some(temp_dir),
            db_path,
        }
    }

    /// Create a test database at a specific path; it is NOT deleted on drop
    pub fn new_at_path(path: PathBuf) -> Self {
        let store = SqliteStore::new(Some(path.clone())).expect("Failed to create test store");

        Self {
            store: Arc::new(store),
            _temp_dir: None,
            db_path: path,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Scheduler backed by this database
    pub fn scheduler(&self) -> StudyScheduler {
        StudyScheduler::new(self.store.clone())
    }

    /// Open a second store on the same file
    pub fn reopen(&self) -> SqliteStore {
        SqliteStore::new(Some(self.db_path.clone())).expect("Failed to reopen test store")
    }

    /// Number of review states a learner has
    pub fn state_count(&self, learner_id: &str) -> usize {
        self.store
            .list_for_learner(learner_id)
            .map(|s| s.len())
            .unwrap_or(0)
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Record one passing review per topic, `days_ago` days before `now`
    pub fn seed_reviews(
        &self,
        learner_id: &str,
        topics: &[&str],
        days_ago: i64,
        now: DateTime<Utc>,
    ) -> Vec<TopicReviewState> {
        let scheduler = self.scheduler();
        let reviewed_at = now - Duration::days(days_ago);
        topics
            .iter()
            .map(|topic| {
                scheduler
                    .record_review(&ReviewEvent::new(
                        learner_id,
                        *topic,
                        80.0,
                        Difficulty::Medium,
                        reviewed_at,
                    ))
                    .expect("Failed to seed review")
            })
            .collect()
    }
}
