//! Error types for pelagia-progress

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Lesson already completed: user {user_id}, lesson {lesson_id}")]
    DuplicateCompletion { user_id: i64, lesson_id: String },

    #[error("Badge already unlocked: user {user_id}, category {category}")]
    DuplicateBadge { user_id: i64, category: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProgressError {
    /// Whether this is one of the expected "already recorded" conditions.
    ///
    /// Callers report these as a normal outcome ("already completed",
    /// "already unlocked") rather than a failure.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateCompletion { .. } | Self::DuplicateBadge { .. }
        )
    }
}
