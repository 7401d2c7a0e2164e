//! Unlock evaluator - decides whether a completion unlocks a badge
//!
//! Per user and category the state machine is `Locked -> Unlocked`: the
//! transition fires exactly once, on the completion that covers the
//! category's full lesson set, and never reverses. Every evaluation
//! re-reads the ledgers; nothing is cached across calls.

use std::collections::HashSet;

use diesel::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::LessonCatalog;
use crate::db::models::Badge;
use crate::db::{badges, completions};
use crate::error::ProgressError;

/// Evaluate whether `completed_lesson_id` unlocks a badge for the user.
///
/// Returns the freshly granted badge, or `None` when no unlock happens:
/// the lesson is not in the catalog, the badge is already held, the
/// category has no lessons, or the category is not yet fully completed.
/// Losing a concurrent grant race also resolves to `None` - the badge
/// exists either way.
pub fn evaluate(
    conn: &mut SqliteConnection,
    catalog: &LessonCatalog,
    user_id: i64,
    completed_lesson_id: &str,
) -> Result<Option<Badge>, ProgressError> {
    // Unknown lessons are a deliberate no-op: content may ship lesson ids
    // ahead of their catalog entry, and those must not fail the flow.
    let record = match catalog.get(completed_lesson_id) {
        Some(record) => record,
        None => {
            debug!(
                lesson_id = %completed_lesson_id,
                "Completed lesson not in catalog, skipping unlock evaluation"
            );
            return Ok(None);
        }
    };
    let category = record.category.as_str();

    if badges::has_badge(conn, user_id, category)? {
        return Ok(None);
    }

    // A category with zero lessons can never be unlocked; vacuous truth
    // is deliberately excluded.
    let category_lessons = catalog.category_lessons(category);
    if category_lessons.is_empty() {
        return Ok(None);
    }

    // The ledger guarantees at most one completion per lesson; no
    // deduplication happens here.
    let completed: HashSet<String> = completions::completed_lesson_ids(conn, user_id)?
        .into_iter()
        .collect();

    if !category_lessons.iter().all(|l| completed.contains(l)) {
        return Ok(None);
    }

    match badges::grant_badge(
        conn,
        user_id,
        category,
        &record.badge_name,
        &record.badge_icon,
    ) {
        Ok(badge) => {
            info!(
                user_id,
                category,
                badge_name = %badge.badge_name,
                "Category badge unlocked"
            );
            Ok(Some(badge))
        }
        // Lost a grant race to a concurrent completion; the badge exists,
        // which is all the caller needs.
        Err(ProgressError::DuplicateBadge { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

// ============================================================================
// Progress Summaries
// ============================================================================

/// Per-category completion summary for a user
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    pub user_id: i64,
    pub category: String,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub unlocked: bool,
}

/// Calculate one category's progress for a user.
///
/// An unknown category yields zero totals and `unlocked: false`.
pub fn category_progress(
    conn: &mut SqliteConnection,
    catalog: &LessonCatalog,
    user_id: i64,
    category: &str,
) -> Result<CategoryProgress, ProgressError> {
    let lessons = catalog.category_lessons(category);
    let completed: HashSet<String> = completions::completed_lesson_ids(conn, user_id)?
        .into_iter()
        .collect();

    Ok(CategoryProgress {
        user_id,
        category: category.to_string(),
        total_lessons: lessons.len(),
        completed_lessons: lessons.iter().filter(|l| completed.contains(*l)).count(),
        unlocked: badges::has_badge(conn, user_id, category)?,
    })
}

/// Progress across every catalog category, in authoring order
pub fn progress_overview(
    conn: &mut SqliteConnection,
    catalog: &LessonCatalog,
    user_id: i64,
) -> Result<Vec<CategoryProgress>, ProgressError> {
    let completed: HashSet<String> = completions::completed_lesson_ids(conn, user_id)?
        .into_iter()
        .collect();
    let unlocked: HashSet<String> = badges::list_badges(conn, user_id)?
        .into_iter()
        .map(|b| b.category)
        .collect();

    Ok(catalog
        .categories()
        .map(|category| {
            let lessons = catalog.category_lessons(category);
            CategoryProgress {
                user_id,
                category: category.to_string(),
                total_lessons: lessons.len(),
                completed_lessons: lessons.iter().filter(|l| completed.contains(*l)).count(),
                unlocked: unlocked.contains(category),
            }
        })
        .collect())
}
