//! # Book Store
//!
//! Typed load/save of the four business collections.
//!
//! ## Storage Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BookStore                                        │
//! │                                                                         │
//! │  load::<T>(collection)                                                 │
//! │    ├── key absent         → []                                         │
//! │    ├── value unparseable  → [] + warn!                                 │
//! │    ├── storage error      → [] + error!                                │
//! │    └── ok                 → Vec<T>                                     │
//! │                                                                         │
//! │  save::<T>(collection, items) → DbResult<()>                           │
//! │    whole-collection overwrite; callers log and carry on on Err         │
//! │                                                                         │
//! │  load_all / save_all    all four collections (save in one transaction) │
//! │  clear_all              removes all four                               │
//! │  clear_all_except_creditors  removes sales, expenses, payments         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Saving a collection that was loaded and not modified writes the same
//! text back: serialization is compact JSON with fields in declaration
//! order, and unset optional fields are omitted.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use khata_core::{Books, CreditorLedger};

use crate::error::{DbError, DbResult};
use crate::repository::collection::CollectionRepository;

// =============================================================================
// Collection
// =============================================================================

/// The four stored collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Sales,
    Expenses,
    Creditors,
    Payments,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Sales,
        Collection::Expenses,
        Collection::Creditors,
        Collection::Payments,
    ];

    /// Storage key.
    pub const fn key(&self) -> &'static str {
        match self {
            Collection::Sales => "sales",
            Collection::Expenses => "expenses",
            Collection::Creditors => "creditors",
            Collection::Payments => "payments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Book Store
// =============================================================================

/// Typed access to the stored collections.
#[derive(Debug, Clone)]
pub struct BookStore {
    repo: CollectionRepository,
}

impl BookStore {
    pub fn new(repo: CollectionRepository) -> Self {
        BookStore { repo }
    }

    /// Loads one collection. Never fails; problems are logged and yield an
    /// empty list.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let raw = match self.repo.get(collection.key()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(collection = %collection, "Collection not stored yet");
                return Vec::new();
            }
            Err(e) => {
                error!(collection = %collection, error = %e, "Failed to read collection");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    collection = %collection,
                    error = %e,
                    "Stored collection is unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Overwrites one collection.
    pub async fn save<T: Serialize>(&self, collection: Collection, items: &[T]) -> DbResult<()> {
        let raw = encode(collection, items)?;
        self.repo.put(collection.key(), &raw).await
    }

    /// Reads the stored text of one collection as-is.
    pub async fn load_raw(&self, collection: Collection) -> DbResult<Option<String>> {
        self.repo.get(collection.key()).await
    }

    /// Loads all four collections.
    pub async fn load_all(&self) -> Books {
        Books {
            sales: self.load(Collection::Sales).await,
            expenses: self.load(Collection::Expenses).await,
            creditors: CreditorLedger::from_creditors(self.load(Collection::Creditors).await),
            payments: self.load(Collection::Payments).await,
        }
    }

    /// Saves all four collections in one transaction.
    pub async fn save_all(&self, books: &Books) -> DbResult<()> {
        let entries = [
            (Collection::Sales.key(), encode(Collection::Sales, &books.sales)?),
            (Collection::Expenses.key(), encode(Collection::Expenses, &books.expenses)?),
            (
                Collection::Creditors.key(),
                encode(Collection::Creditors, books.creditors.creditors())?,
            ),
            (Collection::Payments.key(), encode(Collection::Payments, &books.payments)?),
        ];

        self.repo.put_many(&entries).await?;
        debug!(
            sales = books.sales.len(),
            expenses = books.expenses.len(),
            creditors = books.creditors.len(),
            payments = books.payments.len(),
            "Books saved"
        );
        Ok(())
    }

    /// Removes all four collections.
    pub async fn clear_all(&self) -> DbResult<()> {
        let keys = Collection::ALL.map(|c| c.key());
        let removed = self.repo.remove_many(&keys).await?;
        info!(removed, "Cleared all collections");
        Ok(())
    }

    /// Removes sales, expenses and payments; creditors stay.
    pub async fn clear_all_except_creditors(&self) -> DbResult<()> {
        let keys = [
            Collection::Sales.key(),
            Collection::Expenses.key(),
            Collection::Payments.key(),
        ];
        let removed = self.repo.remove_many(&keys).await?;
        info!(removed, "Cleared collections, creditors kept");
        Ok(())
    }
}

fn encode<T: Serialize>(collection: Collection, items: &[T]) -> DbResult<String> {
    serde_json::to_string(items).map_err(|e| DbError::serialization(collection.key(), e))
}

// =============================================================================
// Unit Tests
// =============================================================================
