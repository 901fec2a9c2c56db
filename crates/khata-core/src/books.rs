//! # Books
//!
//! The four collections held together as one explicit state value.
//!
//! Every mutating operation in this crate takes `&mut Books`; the app loads
//! a `Books` from storage, runs one operation and saves it back.
//!
//! ## Active View
//! ```text
//! stored sales:   [ s0 ][ s1 (deleted) ][ s2 ][ s3 (deleted) ][ s4 ]
//! active index:     0                     1                     2
//! ```
//! Sale indexes taken from the operator always address the active view;
//! `sale_position` maps them to the stored position.

use serde::{Deserialize, Serialize};

use crate::creditor::CreditorLedger;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Expense, Payment, Sale};
use crate::validation::check_amount;
use crate::MAX_QUANTITY;

/// Sales, expenses, creditors and payments.
///
/// Also the shape of a JSON snapshot export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Books {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub creditors: CreditorLedger,
    pub payments: Vec<Payment>,
}

impl Books {
    /// Creates empty books.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sales that have not been soft-deleted, with their stored positions.
    pub fn active_sales(&self) -> impl Iterator<Item = (usize, &Sale)> {
        self.sales.iter().enumerate().filter(|(_, s)| s.is_active())
    }

    /// Number of sales in the active view.
    pub fn active_sale_count(&self) -> usize {
        self.sales.iter().filter(|s| s.is_active()).count()
    }

    /// Stored position of the sale at `active_index` in the active view.
    pub fn sale_position(&self, active_index: usize) -> Option<usize> {
        self.active_sales().nth(active_index).map(|(pos, _)| pos)
    }

    /// Sale at `active_index` in the active view.
    pub fn active_sale(&self, active_index: usize) -> Option<&Sale> {
        self.active_sales().nth(active_index).map(|(_, sale)| sale)
    }

    /// Checks every stored amount and quantity against the same limits the
    /// forms enforce. Used on snapshots that did not come through the forms.
    pub fn check_limits(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        let mut amount = |field: &str, value: Money| {
            if value.cents() < 0 {
                errors.push(ValidationError::MustBePositive {
                    field: field.to_string(),
                });
            } else if let Err(e) = check_amount(field, value) {
                errors.push(e);
            }
        };

        for sale in &self.sales {
            amount("sales.amount", sale.amount);
        }
        for expense in &self.expenses {
            amount("expenses.amount", expense.amount);
        }
        for payment in &self.payments {
            amount("payments.amount", payment.amount);
        }
        for purchase in self.creditors.iter().flat_map(|c| &c.purchases) {
            amount("purchases.amount", purchase.amount);
        }

        let mut quantities = self
            .sales
            .iter()
            .map(|s| s.quantity)
            .chain(self.creditors.iter().flat_map(|c| c.purchases.iter().map(|p| p.quantity)));
        if quantities.any(|q| !(1..=MAX_QUANTITY).contains(&q)) {
            errors.push(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_QUANTITY,
            });
        }

        errors.dedup();
        ValidationError::collect(errors)
    }
}
