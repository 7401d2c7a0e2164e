//! Pelagia Progress - lesson progress and badge ledger for the Pelagia
//! ocean-education platform
//!
//! The wider platform (dive sites, species catalog, social posts, the
//! lesson viewer UI, HTTP routing and session auth) lives elsewhere and
//! calls into this crate through [`ProgressService`]. This crate owns
//! exactly one concern: durable lesson completions and the category
//! badges they unlock.
//!
//! ## Architecture
//!
//! - **Lesson Catalog**: immutable lesson → category → badge mapping,
//!   loaded from TOML at startup (a default catalog is bundled)
//! - **Progress Ledger**: append-only completions, unique per
//!   (user, lesson)
//! - **Badge Ledger**: append-only badge unlocks, unique per
//!   (user, category)
//! - **Unlock Evaluator**: re-reads both on every completion and grants
//!   a badge when a category's lesson set is fully covered
//!
//! Duplicate protection is a storage-level unique index, not an
//! in-process lock - concurrent requests for the same pair resolve to
//! one success and a typed `Duplicate*` error for the rest, even across
//! processes sharing the database file.
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.local/share/pelagia-progress/
//! ├── progress.db            # SQLite: completions, badges, schema_version
//! └── config.toml            # Configuration
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use pelagia_progress::{service, Config};
//!
//! # fn main() -> Result<(), pelagia_progress::ProgressError> {
//! let service = service::from_config(&Config::default())?;
//! let outcome = service.complete_lesson(42, "ocean-literacy-principle-7")?;
//! if let Some(badge) = outcome.unlocked {
//!     println!("unlocked {} {}", badge.badge_icon, badge.badge_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod service;
pub mod unlock;

// Re-exports
pub use catalog::{CategoryBadge, LessonCatalog, LessonRecord};
pub use config::Config;
pub use db::{Badge, Completion, DbStats, ProgressDb};
pub use error::ProgressError;
pub use service::{
    EventBus, LessonCompletionOutcome, ProgressEvent, ProgressProfile, ProgressService,
};
pub use unlock::CategoryProgress;
