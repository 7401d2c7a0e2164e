//! Progress service - business logic for completions and badge unlocks
//!
//! Wraps the ledger repositories with validation, unlock evaluation,
//! and event emission. This is the surface the platform's request
//! handlers call into; they authenticate `user_id` before calling.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::LessonCatalog;
use crate::db::models::{Badge, Completion};
use crate::db::{badges, completions, DbStats, ProgressDb};
use crate::error::ProgressError;
use crate::unlock::{self, CategoryProgress};

use super::events::{EventBus, ProgressEvent};

/// Result of a "mark lesson complete" request: the recorded completion
/// plus the badge it unlocked, if any
#[derive(Debug, Clone, Serialize)]
pub struct LessonCompletionOutcome {
    pub completion: Completion,
    pub unlocked: Option<Badge>,
}

/// A user's full progress state: completions and badges together
#[derive(Debug, Clone, Serialize)]
pub struct ProgressProfile {
    pub user_id: i64,
    pub completions: Vec<Completion>,
    pub badges: Vec<Badge>,
}

/// Progress service for business logic
pub struct ProgressService {
    db: Arc<ProgressDb>,
    catalog: Arc<LessonCatalog>,
    events: Arc<EventBus>,
}

impl ProgressService {
    /// Create a new progress service
    pub fn new(db: Arc<ProgressDb>, catalog: Arc<LessonCatalog>, events: Arc<EventBus>) -> Self {
        Self {
            db,
            catalog,
            events,
        }
    }

    /// The catalog this service evaluates against
    pub fn catalog(&self) -> &LessonCatalog {
        &self.catalog
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Mark a lesson complete and evaluate badge unlocks.
    ///
    /// Fails with `DuplicateCompletion` when the user already completed
    /// the lesson; callers report that as "already completed", not a
    /// failure. Lessons that are not in the catalog are recorded but
    /// never unlock anything.
    pub fn complete_lesson(
        &self,
        user_id: i64,
        lesson_id: &str,
    ) -> Result<LessonCompletionOutcome, ProgressError> {
        if lesson_id.trim().is_empty() {
            return Err(ProgressError::InvalidInput(
                "lesson id must not be blank".into(),
            ));
        }

        let mut conn = self.db.conn()?;

        let completion = completions::record_completion(&mut conn, user_id, lesson_id)?;
        self.events.emit(ProgressEvent::LessonCompleted {
            user_id,
            lesson_id: lesson_id.to_string(),
        });

        let unlocked = unlock::evaluate(&mut conn, &self.catalog, user_id, lesson_id)?;
        if let Some(badge) = &unlocked {
            self.events.emit(ProgressEvent::BadgeUnlocked {
                user_id,
                category: badge.category.clone(),
                badge_name: badge.badge_name.clone(),
            });
        }

        Ok(LessonCompletionOutcome {
            completion,
            unlocked,
        })
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// All completions for a user
    pub fn completions(&self, user_id: i64) -> Result<Vec<Completion>, ProgressError> {
        let mut conn = self.db.conn()?;
        completions::list_completions(&mut conn, user_id)
    }

    /// All badges for a user
    pub fn badges(&self, user_id: i64) -> Result<Vec<Badge>, ProgressError> {
        let mut conn = self.db.conn()?;
        badges::list_badges(&mut conn, user_id)
    }

    /// A user's completions and badges in one call
    pub fn profile(&self, user_id: i64) -> Result<ProgressProfile, ProgressError> {
        let mut conn = self.db.conn()?;
        Ok(ProgressProfile {
            user_id,
            completions: completions::list_completions(&mut conn, user_id)?,
            badges: badges::list_badges(&mut conn, user_id)?,
        })
    }

    /// One category's completion summary for a user
    pub fn category_progress(
        &self,
        user_id: i64,
        category: &str,
    ) -> Result<CategoryProgress, ProgressError> {
        let mut conn = self.db.conn()?;
        unlock::category_progress(&mut conn, &self.catalog, user_id, category)
    }

    /// Per-category summaries across the whole catalog
    pub fn progress_overview(&self, user_id: i64) -> Result<Vec<CategoryProgress>, ProgressError> {
        let mut conn = self.db.conn()?;
        unlock::progress_overview(&mut conn, &self.catalog, user_id)
    }

    /// Database statistics
    pub fn stats(&self) -> Result<DbStats, ProgressError> {
        self.db.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_service() -> ProgressService {
        let db = Arc::new(ProgressDb::open_in_memory().unwrap());
        let catalog = Arc::new(
            LessonCatalog::from_toml_str(
                r#"
                [[categories]]
                id = "ocean-literacy"
                badge_name = "Ocean Scholar"
                badge_icon = "🌊"
                lessons = ["ocean-literacy-principle-1", "ocean-literacy-principle-2"]

                [[categories]]
                id = "dive-safety"
                badge_name = "Safety Diver"
                badge_icon = "🤿"
                lessons = ["dive-safety-buddy-system"]
                "#,
            )
            .unwrap(),
        );
        ProgressService::new(db, catalog, Arc::new(EventBus::new()))
    }

    #[test]
    fn test_complete_lesson_flow() {
        let service = setup_service();

        let first = service.complete_lesson(1, "ocean-literacy-principle-1").unwrap();
        assert_eq!(first.completion.lesson_id, "ocean-literacy-principle-1");
        assert!(first.unlocked.is_none());

        let second = service.complete_lesson(1, "ocean-literacy-principle-2").unwrap();
        let badge = second.unlocked.expect("category complete, badge expected");
        assert_eq!(badge.category, "ocean-literacy");
        assert_eq!(badge.badge_name, "Ocean Scholar");
    }

    #[test]
    fn test_duplicate_completion_surfaces() {
        let service = setup_service();

        service.complete_lesson(1, "dive-safety-buddy-system").unwrap();
        let err = service
            .complete_lesson(1, "dive-safety-buddy-system")
            .unwrap_err();
        assert!(err.is_duplicate(), "got {:?}", err);

        // Still exactly one completion and one badge
        let profile = service.profile(1).unwrap();
        assert_eq!(profile.completions.len(), 1);
        assert_eq!(profile.badges.len(), 1);
    }

    #[test]
    fn test_blank_lesson_id_rejected() {
        let service = setup_service();
        let err = service.complete_lesson(1, "  ").unwrap_err();
        assert!(matches!(err, ProgressError::InvalidInput(_)), "got {:?}", err);
    }

    #[test]
    fn test_uncataloged_lesson_recorded_without_unlock() {
        let service = setup_service();

        let outcome = service.complete_lesson(1, "experimental-lesson").unwrap();
        assert!(outcome.unlocked.is_none());
        assert_eq!(service.completions(1).unwrap().len(), 1);
        assert!(service.badges(1).unwrap().is_empty());
    }

    #[test]
    fn test_events_emitted() {
        let service = setup_service();
        let mut receiver = service.events.subscribe();

        service.complete_lesson(1, "dive-safety-buddy-system").unwrap();

        match receiver.try_recv().unwrap() {
            ProgressEvent::LessonCompleted { user_id, lesson_id } => {
                assert_eq!(user_id, 1);
                assert_eq!(lesson_id, "dive-safety-buddy-system");
            }
            other => panic!("Expected LessonCompleted, got {:?}", other),
        }
        match receiver.try_recv().unwrap() {
            ProgressEvent::BadgeUnlocked {
                user_id, category, ..
            } => {
                assert_eq!(user_id, 1);
                assert_eq!(category, "dive-safety");
            }
            other => panic!("Expected BadgeUnlocked, got {:?}", other),
        }
    }

    #[test]
    fn test_profile_and_overview() {
        let service = setup_service();

        service.complete_lesson(1, "ocean-literacy-principle-1").unwrap();
        service.complete_lesson(1, "dive-safety-buddy-system").unwrap();

        let profile = service.profile(1).unwrap();
        assert_eq!(profile.user_id, 1);
        assert_eq!(profile.completions.len(), 2);
        assert_eq!(profile.badges.len(), 1);

        let overview = service.progress_overview(1).unwrap();
        assert_eq!(overview.len(), 2);
        assert_eq!(overview[0].category, "ocean-literacy");
        assert_eq!(overview[0].completed_lessons, 1);
        assert!(!overview[0].unlocked);
        assert!(overview[1].unlocked);

        let stats = service.stats().unwrap();
        assert_eq!(stats.completion_count, 2);
        assert_eq!(stats.badge_count, 1);
        assert_eq!(stats.tracked_users, 1);
    }
}
