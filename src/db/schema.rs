//! Database schema definitions
//!
//! Uniqueness of (user, lesson) completions and (user, category) badges is
//! enforced here, at the storage layer, via unique indexes. Concurrent
//! duplicate inserts - including from separate processes sharing the
//! database file - resolve to exactly one success; the rest fail with a
//! constraint violation that the ledger modules translate into the typed
//! `Duplicate*` errors.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::info;

use super::diesel_schema::schema_version;
use crate::error::ProgressError;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &mut SqliteConnection) -> Result<(), ProgressError> {
    // Check current schema version
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating new progress schema v{}", SCHEMA_VERSION);
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating progress schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        info!("Progress schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get current schema version (0 if not initialized)
fn get_schema_version(conn: &mut SqliteConnection) -> Result<i32, ProgressError> {
    // Create schema_version table if it doesn't exist
    diesel::sql_query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(conn)
        .map_err(|e| {
            ProgressError::Internal(format!("Failed to create schema_version table: {}", e))
        })?;

    let version: Option<i32> = schema_version::table
        .select(schema_version::version)
        .first(conn)
        .optional()
        .map_err(|e| ProgressError::Internal(format!("Failed to read schema_version: {}", e)))?;

    Ok(version.unwrap_or(0))
}

/// Set schema version
fn set_schema_version(conn: &mut SqliteConnection, version: i32) -> Result<(), ProgressError> {
    diesel::delete(schema_version::table)
        .execute(conn)
        .map_err(|e| ProgressError::Internal(format!("Failed to clear schema_version: {}", e)))?;
    diesel::insert_into(schema_version::table)
        .values(schema_version::version.eq(version))
        .execute(conn)
        .map_err(|e| ProgressError::Internal(format!("Failed to set schema_version: {}", e)))?;
    Ok(())
}

/// Create all tables
fn create_tables(conn: &mut SqliteConnection) -> Result<(), ProgressError> {
    conn.batch_execute(LEDGER_SCHEMA)
        .map_err(|e| ProgressError::Internal(format!("Failed to create ledger tables: {}", e)))?;
    Ok(())
}

/// Migrate schema from older version
fn migrate_schema(conn: &mut SqliteConnection, from_version: i32) -> Result<(), ProgressError> {
    // Add migration steps here as schema evolves
    match from_version {
        // Example: 1 -> 2 migration would go here
        _ => {}
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

/// Progress ledger schema
const LEDGER_SCHEMA: &str = r#"
-- Lesson completions, one row per (user, lesson)
CREATE TABLE IF NOT EXISTS completions (
    id TEXT PRIMARY KEY NOT NULL,
    user_id BIGINT NOT NULL,
    lesson_id TEXT NOT NULL,
    completed_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- At most one completion per (user, lesson)
CREATE UNIQUE INDEX IF NOT EXISTS idx_completions_user_lesson
    ON completions(user_id, lesson_id);

CREATE INDEX IF NOT EXISTS idx_completions_user
    ON completions(user_id);

-- Category badge unlocks, one row per (user, category)
CREATE TABLE IF NOT EXISTS badges (
    id TEXT PRIMARY KEY NOT NULL,
    user_id BIGINT NOT NULL,
    category TEXT NOT NULL,
    badge_name TEXT NOT NULL,
    badge_icon TEXT NOT NULL,
    unlocked_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- At most one badge per (user, category)
CREATE UNIQUE INDEX IF NOT EXISTS idx_badges_user_category
    ON badges(user_id, category);

CREATE INDEX IF NOT EXISTS idx_badges_user
    ON badges(user_id);
"#;
