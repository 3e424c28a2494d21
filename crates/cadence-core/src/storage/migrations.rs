//! Database Migrations
//!
//! Schema migration definitions for the SQLite store.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Topic review state keyed by learner and topic",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Learner profiles and latest study plans",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Review state
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS topic_review_states (
    user_id TEXT NOT NULL,
    topic_name TEXT NOT NULL,

    -- SM-2 state
    interval_days INTEGER NOT NULL DEFAULT 1,
    repetitions INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5,

    -- Scheduling (RFC 3339)
    last_review TEXT NOT NULL,
    next_review TEXT NOT NULL,

    -- Append-only JSON array of {score, difficulty, timestamp}
    performance_history TEXT NOT NULL DEFAULT '[]',
    forgetting_probability REAL NOT NULL DEFAULT 0.0,
    difficulty TEXT NOT NULL DEFAULT 'medium',

    updated_at TEXT NOT NULL,

    UNIQUE (user_id, topic_name)
);

CREATE INDEX IF NOT EXISTS idx_review_states_next_review
    ON topic_review_states(user_id, next_review);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Profiles and plans
const MIGRATION_V2_UP: &str = r#"
CREATE TABLE IF NOT EXISTS learner_profiles (
    user_id TEXT PRIMARY KEY,
    learning_style TEXT NOT NULL DEFAULT 'reading',
    attention_span_minutes INTEGER NOT NULL DEFAULT 60,
    difficulty_preference TEXT,
    study_time_preference TEXT NOT NULL DEFAULT 'flexible',
    retention_rate REAL NOT NULL DEFAULT 1.0,
    updated_at TEXT NOT NULL
);

-- One row per learner; saving a plan replaces the previous one
CREATE TABLE IF NOT EXISTS study_plans (
    user_id TEXT PRIMARY KEY,
    plan_id TEXT NOT NULL,
    generated_at TEXT NOT NULL,
    plan_json TEXT NOT NULL
);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations, returning how many ran
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );
            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
