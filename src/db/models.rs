//! Diesel model definitions for the progress ledgers
//!
//! - Queryable structs: for SELECT queries (reading data)
//! - Insertable structs: for INSERT queries (writing data)
//!
//! Rows in both ledgers are append-only: they are never mutated or
//! deleted in normal operation.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::diesel_schema::*;

// ============================================================================
// Timestamp Helpers (SQLite stores timestamps as TEXT)
// ============================================================================

/// Get current UTC timestamp as ISO 8601 string for SQLite TEXT columns
pub fn current_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// ============================================================================
// Completion Models
// ============================================================================

/// A recorded lesson completion
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = completions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Completion {
    pub id: String,
    pub user_id: i64,
    pub lesson_id: String,
    pub completed_at: String,
}

/// New completion for INSERT
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = completions)]
pub struct NewCompletion<'a> {
    pub id: &'a str,
    pub user_id: i64,
    pub lesson_id: &'a str,
    pub completed_at: &'a str,
}

// ============================================================================
// Badge Models
// ============================================================================

/// An unlocked category badge
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = badges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Badge {
    pub id: String,
    pub user_id: i64,
    pub category: String,
    pub badge_name: String,
    pub badge_icon: String,
    pub unlocked_at: String,
}

/// New badge for INSERT
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = badges)]
pub struct NewBadge<'a> {
    pub id: &'a str,
    pub user_id: i64,
    pub category: &'a str,
    pub badge_name: &'a str,
    pub badge_icon: &'a str,
    pub unlocked_at: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = current_timestamp();
        // 2026-08-06T12:34:56Z
        assert_eq!(ts.len(), 20);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
    }

    #[test]
    fn test_badge_wire_shape() {
        // The external route handler serializes these rows straight into
        // its HTTP response; keep the field names stable.
        let badge = Badge {
            id: "b-1".into(),
            user_id: 7,
            category: "ocean-literacy".into(),
            badge_name: "Ocean Scholar".into(),
            badge_icon: "🌊".into(),
            unlocked_at: "2026-08-06T00:00:00Z".into(),
        };
        let json = serde_json::to_value(&badge).unwrap();
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["category"], "ocean-literacy");
        assert_eq!(json["badge_name"], "Ocean Scholar");
        assert_eq!(json["badge_icon"], "🌊");
    }
}
