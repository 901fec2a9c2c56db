//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_creditors(db: &DbState, config: &ConfigState) -> Result<CreditorList, ApiError> {
//!     let books = db.inner().books().load_all().await;
//!     Ok(CreditorList::new(&books, config))
//! }
//! ```

use khata_db::{Database, DbConfig, DbResult};

/// Wrapper around `Database` handed to every command.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens a fresh in-memory database. Used by command tests.
    pub async fn in_memory() -> DbResult<Self> {
        Ok(DbState::new(Database::new(DbConfig::in_memory()).await?))
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
