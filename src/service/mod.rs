//! Service layer for pelagia-progress
//!
//! Services encapsulate business logic between the platform's request
//! handlers and the ledger repositories. The service wraps database
//! operations with:
//! - Input validation
//! - Unlock evaluation after each completion
//! - Event emission for audit/notifications
//!
//! ## Architecture
//!
//! ```text
//! Request Handlers (out of scope, thin)
//!     ↓
//! Service Layer (business logic)
//!     ↓
//! Repository Layer (db/*.rs)
//!     ↓
//! SQLite Database
//! ```

pub mod events;
pub mod progress_service;

// Re-exports
pub use events::{spawn_logging_listener, EventBus, EventListener, LoggingEventListener, ProgressEvent};
pub use progress_service::{LessonCompletionOutcome, ProgressProfile, ProgressService};

use std::sync::Arc;

use crate::catalog::LessonCatalog;
use crate::config::Config;
use crate::db::ProgressDb;
use crate::error::ProgressError;

/// Build a [`ProgressService`] from configuration: open the database,
/// load the catalog, and wire up a fresh event bus.
pub fn from_config(config: &Config) -> Result<ProgressService, ProgressError> {
    let db = Arc::new(ProgressDb::open_with_pool_size(
        &config.storage_dir,
        config.max_pool_size,
    )?);
    let catalog = Arc::new(config.catalog()?);
    let events = Arc::new(EventBus::new());
    Ok(ProgressService::new(db, catalog, events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_dir: dir.path().to_path_buf(),
            catalog_path: None,
            max_pool_size: 2,
        };

        let service = from_config(&config).unwrap();
        assert!(service.catalog().contains_lesson("ocean-literacy-principle-1"));

        let outcome = service.complete_lesson(1, "ocean-literacy-principle-1").unwrap();
        assert!(outcome.unlocked.is_none());
        assert!(dir.path().join("progress.db").exists());
    }
}
