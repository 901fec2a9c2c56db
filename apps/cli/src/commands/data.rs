//! # Data Commands
//!
//! Whole-store operations: clearing, JSON snapshot export and import.
//!
//! ## Snapshot Format
//! ```json
//! {
//!   "sales": [ ... ],
//!   "expenses": [ ... ],
//!   "creditors": [ ... ],
//!   "payments": [ ... ]
//! }
//! ```
//! Missing collections import as empty.

use serde::Serialize;
use tracing::{debug, info, warn};

use khata_core::Books;

use super::{saved, Saved};
use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, DbState};

/// Collection sizes after a clear or import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCounts {
    pub sales: usize,
    pub expenses: usize,
    pub creditors: usize,
    pub payments: usize,
}

impl DataCounts {
    fn of(books: &Books) -> Self {
        DataCounts {
            sales: books.sales.len(),
            expenses: books.expenses.len(),
            creditors: books.creditors.len(),
            payments: books.payments.len(),
        }
    }
}

/// Removes every collection, or everything except creditors.
pub async fn clear_data(
    db: &DbState,
    config: &ConfigState,
    password: &str,
    keep_creditors: bool,
) -> Result<DataCounts, ApiError> {
    config.verify_password(password)?;
    debug!(keep_creditors, "clear_data command");

    let store = db.inner().books();
    if keep_creditors {
        store.clear_all_except_creditors().await?;
    } else {
        store.clear_all().await?;
    }

    let remaining = DataCounts::of(&store.load_all().await);
    warn!(keep_creditors, creditors = remaining.creditors, "Stored data cleared");
    Ok(remaining)
}

/// The four collections as they are stored.
pub async fn export_data(db: &DbState) -> Result<Books, ApiError> {
    debug!("export_data command");
    Ok(db.inner().books().load_all().await)
}

/// Replaces all four collections with a snapshot.
pub async fn import_data(
    db: &DbState,
    config: &ConfigState,
    password: &str,
    snapshot: &str,
) -> Result<Saved<DataCounts>, ApiError> {
    config.verify_password(password)?;
    debug!(bytes = snapshot.len(), "import_data command");

    let books: Books = serde_json::from_str(snapshot).map_err(|e| {
        ApiError::new(
            ErrorCode::ValidationError,
            format!("Snapshot is not valid: {}", e),
        )
    })?;
    books
        .check_limits()
        .map_err(|e| ApiError::validation(format!("Snapshot is not valid: {}", e)))?;

    let counts = DataCounts::of(&books);
    info!(
        sales = counts.sales,
        expenses = counts.expenses,
        creditors = counts.creditors,
        payments = counts.payments,
        "Importing snapshot"
    );
    Ok(saved(db, &books, counts).await)
}
