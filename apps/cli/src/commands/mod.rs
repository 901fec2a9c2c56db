//! # Commands Module
//!
//! One async function per `khata` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared persist helper)
//! ├── sale.rs      ◄─── add / edit / delete / delete-all / list sales
//! ├── creditor.rs  ◄─── list creditors, lookup by phone, record payment
//! ├── payment.rs   ◄─── payment log
//! ├── expense.rs   ◄─── add / delete / list expenses
//! ├── report.rs    ◄─── summary and breakdowns (password)
//! ├── data.rs      ◄─── clear / export / import (password for clear, import)
//! └── config.rs    ◄─── show effective configuration
//! ```
//!
//! ## How a Mutating Command Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  db.books().load_all()          four collections → Books               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  khata_core operation           validate, mutate Books, or Err         │
//! │         │                         (Err: nothing saved, ApiError)        │
//! │         ▼                                                               │
//! │  persist(db, &books)            save_all in one transaction            │
//! │         │                         (Err: logged, durable = false)        │
//! │         ▼                                                               │
//! │  Saved { data, durable }        printed as JSON                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod creditor;
pub mod data;
pub mod expense;
pub mod payment;
pub mod report;
pub mod sale;

use serde::Serialize;
use tracing::error;

use khata_core::Books;

use crate::state::DbState;

/// Result of a mutating command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Saved<T> {
    pub data: T,
    /// False when the change was applied but could not be written.
    pub durable: bool,
}

/// Writes the books back. A failed write is logged, not returned.
pub(crate) async fn persist(db: &DbState, books: &Books) -> bool {
    match db.inner().books().save_all(books).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Failed to save books; change is not durable");
            false
        }
    }
}

pub(crate) async fn saved<T>(db: &DbState, books: &Books, data: T) -> Saved<T> {
    let durable = persist(db, books).await;
    Saved { data, durable }
}
