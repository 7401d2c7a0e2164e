//! Progress ledger - lesson completion records
//!
//! Append-only: a completion is inserted at most once per (user, lesson)
//! and never mutated. The unique index on (user_id, lesson_id) is the
//! only duplicate guard; a constraint violation surfaces as
//! `ProgressError::DuplicateCompletion` so callers can report "already
//! completed" instead of a generic failure.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use super::diesel_schema::completions;
use super::models::{current_timestamp, Completion, NewCompletion};
use crate::error::ProgressError;

// ============================================================================
// Write Operations
// ============================================================================

/// Record a lesson completion for a user
pub fn record_completion(
    conn: &mut SqliteConnection,
    user_id: i64,
    lesson_id: &str,
) -> Result<Completion, ProgressError> {
    let id = Uuid::new_v4().to_string();
    let completed_at = current_timestamp();

    let new_completion = NewCompletion {
        id: &id,
        user_id,
        lesson_id,
        completed_at: &completed_at,
    };

    diesel::insert_into(completions::table)
        .values(&new_completion)
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ProgressError::DuplicateCompletion {
                    user_id,
                    lesson_id: lesson_id.to_string(),
                }
            }
            other => ProgressError::Internal(format!("Insert failed: {}", other)),
        })?;

    get_completion(conn, user_id, lesson_id)?
        .ok_or_else(|| ProgressError::Internal("Failed to retrieve recorded completion".into()))
}

// ============================================================================
// Read Operations
// ============================================================================

/// Get the completion for a specific (user, lesson) pair
pub fn get_completion(
    conn: &mut SqliteConnection,
    user_id: i64,
    lesson_id: &str,
) -> Result<Option<Completion>, ProgressError> {
    completions::table
        .filter(completions::user_id.eq(user_id))
        .filter(completions::lesson_id.eq(lesson_id))
        .first(conn)
        .optional()
        .map_err(|e| ProgressError::Internal(format!("Query failed: {}", e)))
}

/// List all completions for a user.
///
/// Returns an empty vec (not an error) for a user with no completions.
pub fn list_completions(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<Completion>, ProgressError> {
    completions::table
        .filter(completions::user_id.eq(user_id))
        .order(completions::completed_at.asc())
        .load(conn)
        .map_err(|e| ProgressError::Internal(format!("Query failed: {}", e)))
}

/// Lesson ids a user has completed, for unlock evaluation
pub fn completed_lesson_ids(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<String>, ProgressError> {
    completions::table
        .filter(completions::user_id.eq(user_id))
        .select(completions::lesson_id)
        .load(conn)
        .map_err(|e| ProgressError::Internal(format!("Query failed: {}", e)))
}

// ============================================================================
// Stats
// ============================================================================

/// Total completion count across all users
pub fn completion_count(conn: &mut SqliteConnection) -> Result<i64, ProgressError> {
    completions::table
        .count()
        .get_result(conn)
        .map_err(|e| ProgressError::Internal(format!("Count query failed: {}", e)))
}
