//! SQLite Storage Implementation
//!
//! Durable adapter for review state, learner profiles and study plans.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::default_data_dir;
use crate::model::{
    Difficulty, LearnerProfile, LearningStyle, PerformanceRecord, StudyTimePreference,
    TopicReviewState,
};
use crate::planning::StudyPlan;

use super::{PlanStore, ProfileSource, Result, ReviewStore, StorageError};

const DATABASE_FILE: &str = "cadence.db";

/// Years RFC 3339 text can carry and `parse_from_rfc3339` reads back
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// SQLite-backed store
///
/// Uses separate reader/writer connections so every method takes `&self`,
/// making the store `Send + Sync` and shareable behind an `Arc`.
pub struct SqliteStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -16000;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) the database at `db_path`, or in the default data directory
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let data_dir = default_data_dir().ok_or_else(|| {
                    StorageError::Init("Could not determine data directory".to_string())
                })?;
                std::fs::create_dir_all(&data_dir)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let perms = std::fs::Permissions::from_mode(0o700);
                    let _ = std::fs::set_permissions(&data_dir, perms);
                }
                data_dir.join(DATABASE_FILE)
            }
        };

        let writer_conn = Connection::open(&path)?;

        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;
        let applied = super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        tracing::info!(path = %path.display(), migrations_applied = applied, "Opened review store");

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Insert or replace a learner profile
    pub fn upsert_profile(&self, learner_id: &str, profile: &LearnerProfile) -> Result<()> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::LockPoisoned("writer"))?;
        writer.execute(
            "INSERT INTO learner_profiles (
                user_id, learning_style, attention_span_minutes, difficulty_preference,
                study_time_preference, retention_rate, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id) DO UPDATE SET
                learning_style = excluded.learning_style,
                attention_span_minutes = excluded.attention_span_minutes,
                difficulty_preference = excluded.difficulty_preference,
                study_time_preference = excluded.study_time_preference,
                retention_rate = excluded.retention_rate,
                updated_at = excluded.updated_at",
            params![
                learner_id,
                profile.learning_style.as_str(),
                profile.attention_span_minutes,
                profile.difficulty_preference.map(|d| d.as_str()),
                profile.study_time_preference.as_str(),
                profile.retention_rate,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Format a timestamp for storage, rejecting values that would not parse back
    fn format_timestamp(value: DateTime<Utc>, field: &'static str) -> Result<String> {
        if !STORABLE_YEARS.contains(&value.year()) {
            return Err(StorageError::TimestampOutOfRange {
                field,
                value: value.to_rfc3339(),
            });
        }
        Ok(value.to_rfc3339())
    }

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Invalid {} timestamp '{}': {}", field_name, value, e),
                    )),
                )
            })
    }

    fn row_to_state(row: &rusqlite::Row) -> rusqlite::Result<TopicReviewState> {
        let history_json: String = row.get("performance_history")?;
        let performance_history: Vec<PerformanceRecord> = serde_json::from_str(&history_json)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;

        let last_review: String = row.get("last_review")?;
        let next_review: String = row.get("next_review")?;
        let difficulty: String = row.get("difficulty")?;

        Ok(TopicReviewState {
            learner_id: row.get("user_id")?,
            topic_name: row.get("topic_name")?,
            interval_days: row.get("interval_days")?,
            repetitions: row.get("repetitions")?,
            ease_factor: row.get("ease_factor")?,
            last_review: Self::parse_timestamp(&last_review, "last_review")?,
            next_review: Self::parse_timestamp(&next_review, "next_review")?,
            performance_history,
            forgetting_probability: row.get("forgetting_probability")?,
            difficulty: Difficulty::parse_name(&difficulty),
        })
    }

    fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<LearnerProfile> {
        let learning_style: String = row.get("learning_style")?;
        let difficulty_preference: Option<String> = row.get("difficulty_preference")?;
        let study_time_preference: String = row.get("study_time_preference")?;

        Ok(LearnerProfile {
            learning_style: LearningStyle::parse_name(&learning_style),
            attention_span_minutes: row.get("attention_span_minutes")?,
            difficulty_preference: difficulty_preference.map(|d| Difficulty::parse_name(&d)),
            study_time_preference: StudyTimePreference::parse_name(&study_time_preference),
            retention_rate: row.get("retention_rate")?,
        })
    }
}

impl ReviewStore for SqliteStore {
    fn get(&self, learner_id: &str, topic_name: &str) -> Result<Option<TopicReviewState>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::LockPoisoned("reader"))?;
        let mut stmt = reader.prepare(
            "SELECT * FROM topic_review_states WHERE user_id = ?1 AND topic_name = ?2",
        )?;
        let state = stmt
            .query_row(params![learner_id, topic_name], Self::row_to_state)
            .optional()?;
        Ok(state)
    }

    fn upsert(&self, state: &TopicReviewState) -> Result<TopicReviewState> {
        let last_review = Self::format_timestamp(state.last_review, "last_review")?;
        let next_review = Self::format_timestamp(state.next_review, "next_review")?;
        let history_json = serde_json::to_string(&state.performance_history)?;
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::LockPoisoned("writer"))?;

        let stored = writer.query_row(
            "INSERT INTO topic_review_states (
                user_id, topic_name, interval_days, repetitions, ease_factor,
                last_review, next_review, performance_history, forgetting_probability,
                difficulty, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(user_id, topic_name) DO UPDATE SET
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                ease_factor = excluded.ease_factor,
                last_review = excluded.last_review,
                next_review = excluded.next_review,
                performance_history = excluded.performance_history,
                forgetting_probability = excluded.forgetting_probability,
                difficulty = excluded.difficulty,
                updated_at = excluded.updated_at
             RETURNING *",
            params![
                state.learner_id,
                state.topic_name,
                state.interval_days,
                state.repetitions,
                state.ease_factor,
                last_review,
                next_review,
                history_json,
                state.forgetting_probability,
                state.difficulty.as_str(),
                Utc::now().to_rfc3339(),
            ],
            Self::row_to_state,
        )?;

        tracing::debug!(
            learner = %stored.learner_id,
            topic = %stored.topic_name,
            interval_days = stored.interval_days,
            "Upserted review state"
        );
        Ok(stored)
    }

    fn list_for_learner(&self, learner_id: &str) -> Result<Vec<TopicReviewState>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::LockPoisoned("reader"))?;
        let mut stmt = reader.prepare(
            "SELECT * FROM topic_review_states WHERE user_id = ?1 ORDER BY topic_name",
        )?;
        let rows = stmt.query_map(params![learner_id], Self::row_to_state)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

impl ProfileSource for SqliteStore {
    fn get_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::LockPoisoned("reader"))?;
        let profile = reader
            .query_row(
                "SELECT * FROM learner_profiles WHERE user_id = ?1",
                params![learner_id],
                Self::row_to_profile,
            )
            .optional()?;
        Ok(profile)
    }
}

impl PlanStore for SqliteStore {
    fn save_plan(&self, learner_id: &str, plan: &StudyPlan) -> Result<()> {
        let generated_at = Self::format_timestamp(plan.generated_at, "generated_at")?;
        let plan_json = serde_json::to_string(plan)?;
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::LockPoisoned("writer"))?;
        writer.execute(
            "INSERT INTO study_plans (user_id, plan_id, generated_at, plan_json)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                plan_id = excluded.plan_id,
                generated_at = excluded.generated_at,
                plan_json = excluded.plan_json",
            params![
                learner_id,
                plan.id.to_string(),
                generated_at,
                plan_json,
            ],
        )?;
        Ok(())
    }

    fn latest_plan(&self, learner_id: &str) -> Result<Option<StudyPlan>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::LockPoisoned("reader"))?;
        let plan_json: Option<String> = reader
            .query_row(
                "SELECT plan_json FROM study_plans WHERE user_id = ?1",
                params![learner_id],
                |row| row.get(0),
            )
            .optional()?;
        drop(reader);

        match plan_json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
