//! Badge ledger - category badge unlock records
//!
//! Append-only: a badge is granted at most once per (user, category) and
//! never mutated. Callers are expected to check `has_badge` first, but
//! the unique index on (user_id, category) enforces uniqueness
//! independently - concurrent grant attempts for the same pair resolve to
//! one success and `ProgressError::DuplicateBadge` for the rest.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use super::diesel_schema::badges;
use super::models::{current_timestamp, Badge, NewBadge};
use crate::error::ProgressError;

// ============================================================================
// Write Operations
// ============================================================================

/// Grant a category badge to a user
pub fn grant_badge(
    conn: &mut SqliteConnection,
    user_id: i64,
    category: &str,
    badge_name: &str,
    badge_icon: &str,
) -> Result<Badge, ProgressError> {
    let id = Uuid::new_v4().to_string();
    let unlocked_at = current_timestamp();

    let new_badge = NewBadge {
        id: &id,
        user_id,
        category,
        badge_name,
        badge_icon,
        unlocked_at: &unlocked_at,
    };

    diesel::insert_into(badges::table)
        .values(&new_badge)
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ProgressError::DuplicateBadge {
                    user_id,
                    category: category.to_string(),
                }
            }
            other => ProgressError::Internal(format!("Insert failed: {}", other)),
        })?;

    get_badge(conn, user_id, category)?
        .ok_or_else(|| ProgressError::Internal("Failed to retrieve granted badge".into()))
}

// ============================================================================
// Read Operations
// ============================================================================

/// Whether a user already holds the badge for a category
pub fn has_badge(
    conn: &mut SqliteConnection,
    user_id: i64,
    category: &str,
) -> Result<bool, ProgressError> {
    get_badge(conn, user_id, category).map(|b| b.is_some())
}

/// Get the badge for a specific (user, category) pair
pub fn get_badge(
    conn: &mut SqliteConnection,
    user_id: i64,
    category: &str,
) -> Result<Option<Badge>, ProgressError> {
    badges::table
        .filter(badges::user_id.eq(user_id))
        .filter(badges::category.eq(category))
        .first(conn)
        .optional()
        .map_err(|e| ProgressError::Internal(format!("Query failed: {}", e)))
}

/// List all badges for a user
pub fn list_badges(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<Badge>, ProgressError> {
    badges::table
        .filter(badges::user_id.eq(user_id))
        .order(badges::unlocked_at.asc())
        .load(conn)
        .map_err(|e| ProgressError::Internal(format!("Query failed: {}", e)))
}

// ============================================================================
// Stats
// ============================================================================

/// Total badge count across all users
pub fn badge_count(conn: &mut SqliteConnection) -> Result<i64, ProgressError> {
    badges::table
        .count()
        .get_result(conn)
        .map_err(|e| ProgressError::Internal(format!("Count query failed: {}", e)))
}
