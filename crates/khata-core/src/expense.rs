//! # Expense Manager
//!
//! Expenses are written once and only ever removed whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::books::Books;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Expense;
use crate::validation::{validate_amount, validate_required};

/// Category used when the form leaves it blank.
pub const DEFAULT_CATEGORY: &str = "general";

/// Raw expense input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub category: String,
}

impl ExpenseForm {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        ExpenseForm {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
        }
    }

    /// Validates the form and builds the expense.
    pub fn build(&self, timestamp: DateTime<Utc>) -> Result<Expense, ValidationError> {
        let mut errors = Vec::new();

        let description = validate_required("description", &self.description)
            .map_err(|e| errors.push(e))
            .ok();
        let amount = validate_amount("amount", &self.amount)
            .map_err(|e| errors.push(e))
            .ok();

        ValidationError::collect(errors)?;

        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            other => other.to_lowercase(),
        };

        Ok(Expense {
            description: description.unwrap_or_default(),
            amount: amount.unwrap_or_default(),
            category,
            timestamp,
        })
    }
}

/// Records a new expense.
pub fn add_expense(books: &mut Books, form: &ExpenseForm, now: DateTime<Utc>) -> CoreResult<Expense> {
    let expense = form.build(now)?;
    books.expenses.push(expense.clone());
    Ok(expense)
}

/// Removes the expense at `index` for good.
pub fn delete_expense(books: &mut Books, index: usize) -> CoreResult<Expense> {
    if index >= books.expenses.len() {
        return Err(CoreError::ExpenseNotFound(format!("index {}", index)));
    }
    Ok(books.expenses.remove(index))
}
