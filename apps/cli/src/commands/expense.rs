//! # Expense Commands

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use khata_core::{add_expense as record_expense, delete_expense as remove_expense};
use khata_core::{Expense, ExpenseForm};

use super::{saved, Saved};
use crate::error::ApiError;
use crate::state::DbState;

/// An expense with its list index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRow {
    pub index: usize,
    pub expense: Expense,
}

pub async fn add_expense(db: &DbState, form: ExpenseForm) -> Result<Saved<ExpenseRow>, ApiError> {
    debug!(description = %form.description, "add_expense command");

    let mut books = db.inner().books().load_all().await;
    let expense = record_expense(&mut books, &form, Utc::now())?;
    let index = books.expenses.len() - 1;

    info!(index, amount = %expense.amount, category = %expense.category, "Expense recorded");
    Ok(saved(db, &books, ExpenseRow { index, expense }).await)
}

/// Removes an expense outright. Later indexes shift down by one.
pub async fn delete_expense(db: &DbState, index: usize) -> Result<Saved<ExpenseRow>, ApiError> {
    debug!(index, "delete_expense command");

    let mut books = db.inner().books().load_all().await;
    let expense = remove_expense(&mut books, index)?;

    info!(index, "Expense deleted");
    Ok(saved(db, &books, ExpenseRow { index, expense }).await)
}

pub async fn list_expenses(
    db: &DbState,
    category: Option<&str>,
) -> Result<Vec<ExpenseRow>, ApiError> {
    let books = db.inner().books().load_all().await;
    let category = category.map(|c| c.trim().to_lowercase());

    Ok(books
        .expenses
        .into_iter()
        .enumerate()
        .filter(|(_, e)| category.as_deref().map_or(true, |c| e.category == c))
        .map(|(index, expense)| ExpenseRow { index, expense })
        .collect())
}
