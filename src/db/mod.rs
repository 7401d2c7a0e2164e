//! SQLite database module for the progress ledgers
//!
//! ## Architecture
//!
//! - Diesel over SQLite, pooled with r2d2
//! - `completions` - lesson completion ledger, unique per (user, lesson)
//! - `badges` - category badge ledger, unique per (user, category)
//!
//! Uniqueness lives in the schema (unique indexes), not in application
//! locks - requests may be handled by independent processes sharing the
//! database file, and the constraint is what serializes them.

pub mod badges;
pub mod completions;
pub mod diesel_schema;
pub mod models;
pub mod schema;

use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use tracing::{debug, info};

use crate::error::ProgressError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Default connection pool size
const DEFAULT_POOL_SIZE: u32 = 8;

/// Pooled SQLite database holding the progress ledgers
pub struct ProgressDb {
    pool: DbPool,
}

impl ProgressDb {
    /// Open or create the progress database under `storage_dir`
    pub fn open(storage_dir: &Path) -> Result<Self, ProgressError> {
        Self::open_with_pool_size(storage_dir, DEFAULT_POOL_SIZE)
    }

    /// Open with an explicit pool size
    pub fn open_with_pool_size(
        storage_dir: &Path,
        max_pool_size: u32,
    ) -> Result<Self, ProgressError> {
        std::fs::create_dir_all(storage_dir)?;
        let db_path = storage_dir.join("progress.db");
        info!("Opening progress database at {:?}", db_path);

        let manager = ConnectionManager::<SqliteConnection>::new(db_path.to_string_lossy());
        let pool = Pool::builder()
            .max_size(max_pool_size.max(1))
            .build(manager)
            .map_err(|e| ProgressError::Connection(format!("Failed to build pool: {}", e)))?;

        let db = Self { pool };
        db.init(true)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    ///
    /// Every SQLite `:memory:` connection is its own database, so the
    /// pool is pinned to a single connection.
    pub fn open_in_memory() -> Result<Self, ProgressError> {
        debug!("Opening in-memory progress database");

        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| ProgressError::Connection(format!("Failed to build pool: {}", e)))?;

        let db = Self { pool };
        db.init(false)?;
        Ok(db)
    }

    fn init(&self, wal: bool) -> Result<(), ProgressError> {
        let mut conn = self.conn()?;

        if wal {
            // WAL for concurrent readers alongside a writer
            conn.batch_execute("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
                .map_err(|e| ProgressError::Internal(format!("Failed to set PRAGMA: {}", e)))?;
        }

        schema::init_schema(&mut conn)
    }

    /// Check out a pooled connection
    pub fn conn(&self) -> Result<DbConn, ProgressError> {
        self.pool
            .get()
            .map_err(|e| ProgressError::Connection(format!("Failed to get connection: {}", e)))
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats, ProgressError> {
        let mut conn = self.conn()?;

        let completion_count = completions::completion_count(&mut conn)?;
        let badge_count = badges::badge_count(&mut conn)?;

        let tracked_users: Vec<i64> = diesel_schema::completions::table
            .select(diesel_schema::completions::user_id)
            .distinct()
            .load(&mut conn)
            .map_err(|e| ProgressError::Internal(format!("Query failed: {}", e)))?;

        Ok(DbStats {
            completion_count: completion_count as u64,
            badge_count: badge_count as u64,
            tracked_users: tracked_users.len() as u64,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub completion_count: u64,
    pub badge_count: u64,
    pub tracked_users: u64,
}

// Re-exports
pub use models::{Badge, Completion};
