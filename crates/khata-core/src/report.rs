//! # Reporting
//!
//! Read-only totals derived from the four collections.
//!
//! ## Formulas
//! ```text
//! totalCashSales       = Σ amount of non-credit sales
//! totalCreditSales     = Σ amount of credit sales
//! netAmount            = totalCashSales + totalPayments − totalExpenses
//! collectionRate       = totalPayments / totalCreditSales   (100% if no credit)
//! outstandingCredit    = Σ creditor amountOwed
//! ```
//!
//! Soft-deleted sales never count. Every function here optionally takes a
//! [`DateRange`] so the same code serves daily and monthly reports.
//! Outstanding credit is a current balance and ignores the range.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::books::Books;
use crate::money::Money;
use crate::types::{ProductType, Rate, Sale};

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange { from, to }
    }

    /// A single day.
    pub fn day(day: NaiveDate) -> Self {
        DateRange { from: day, to: day }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        self.from <= day && day <= self.to
    }
}

fn in_range(range: Option<&DateRange>, timestamp: &DateTime<Utc>) -> bool {
    range.map_or(true, |r| r.contains(timestamp))
}

fn reported_sales<'a>(
    books: &'a Books,
    range: Option<&'a DateRange>,
) -> impl Iterator<Item = &'a Sale> + 'a {
    books
        .sales
        .iter()
        .filter(move |s| s.is_active() && in_range(range, &s.timestamp))
}

// =============================================================================
// Aggregates
// =============================================================================

/// Running totals for one group of sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemAggregate {
    pub quantity: i64,
    pub amount: Money,
    pub count: usize,
}

impl ItemAggregate {
    fn add(&mut self, sale: &Sale) {
        self.quantity += sale.quantity;
        self.amount += sale.amount;
        self.count += 1;
    }
}

/// Sales grouped by item name, optionally for one product type.
pub fn aggregate_by_item(
    books: &Books,
    product_type: Option<ProductType>,
    range: Option<&DateRange>,
) -> BTreeMap<String, ItemAggregate> {
    let mut items: BTreeMap<String, ItemAggregate> = BTreeMap::new();
    for sale in reported_sales(books, range)
        .filter(|s| product_type.map_or(true, |t| s.product_type == t))
    {
        items.entry(sale.item_name.clone()).or_default().add(sale);
    }
    items
}

/// Sales grouped by product type.
pub fn aggregate_by_type(
    books: &Books,
    range: Option<&DateRange>,
) -> BTreeMap<ProductType, ItemAggregate> {
    let mut types: BTreeMap<ProductType, ItemAggregate> = BTreeMap::new();
    for sale in reported_sales(books, range) {
        types.entry(sale.product_type).or_default().add(sale);
    }
    types
}

/// Expense totals by category.
pub fn expenses_by_category(books: &Books, range: Option<&DateRange>) -> BTreeMap<String, Money> {
    let mut categories: BTreeMap<String, Money> = BTreeMap::new();
    for expense in books
        .expenses
        .iter()
        .filter(|e| in_range(range, &e.timestamp))
    {
        *categories.entry(expense.category.clone()).or_default() += expense.amount;
    }
    categories
}

/// Payments as a share of credit sales.
///
/// 100% when there were no credit sales.
pub fn collection_rate(total_payments: Money, total_credit_sales: Money) -> Rate {
    Rate::from_ratio(total_payments, total_credit_sales).unwrap_or(Rate::FULL)
}

// =============================================================================
// Summary
// =============================================================================

/// Headline totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_cash_sales: Money,
    pub cash_sale_count: usize,
    pub total_credit_sales: Money,
    pub credit_sale_count: usize,
    pub total_payments: Money,
    pub payment_count: usize,
    pub total_expenses: Money,
    pub expense_count: usize,
    pub net_amount: Money,
    pub outstanding_credit: Money,
    pub collection_rate: Rate,
}

/// Computes the headline totals.
pub fn summarize(books: &Books, range: Option<&DateRange>) -> Summary {
    let mut summary = Summary::default();

    for sale in reported_sales(books, range) {
        if sale.is_credit {
            summary.total_credit_sales += sale.amount;
            summary.credit_sale_count += 1;
        } else {
            summary.total_cash_sales += sale.amount;
            summary.cash_sale_count += 1;
        }
    }

    for payment in books
        .payments
        .iter()
        .filter(|p| in_range(range, &p.timestamp))
    {
        summary.total_payments += payment.amount;
        summary.payment_count += 1;
    }

    for expense in books
        .expenses
        .iter()
        .filter(|e| in_range(range, &e.timestamp))
    {
        summary.total_expenses += expense.amount;
        summary.expense_count += 1;
    }

    summary.net_amount = summary.total_cash_sales + summary.total_payments - summary.total_expenses;
    summary.outstanding_credit = books.creditors.total_owed();
    summary.collection_rate = collection_rate(summary.total_payments, summary.total_credit_sales);

    summary
}

/// Everything a report screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub range: Option<DateRange>,
    pub summary: Summary,
    pub by_type: BTreeMap<ProductType, ItemAggregate>,
    pub by_item: BTreeMap<String, ItemAggregate>,
    pub expenses_by_category: BTreeMap<String, Money>,
}

impl Report {
    pub fn build(books: &Books, range: Option<DateRange>) -> Self {
        let r = range.as_ref();
        Report {
            range,
            summary: summarize(books, r),
            by_type: aggregate_by_type(books, r),
            by_item: aggregate_by_item(books, None, r),
            expenses_by_category: expenses_by_category(books, r),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::{add_expense, ExpenseForm};
    use crate::payment::record_payment;
    use crate::sales::{create_sale, soft_delete_sale, SaleForm};
    use crate::types::PaymentMethod;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, d, 13, 0, 0).unwrap()
    }

    fn sample_books() -> Books {
        let mut books = Books::new();
        let cash = |t, item: &str, qty: &str, amount: &str| {
            SaleForm::cash(t, item, qty, amount, PaymentMethod::Cash)
        };

        create_sale(&mut books, &cash(ProductType::Coil, "Mesh 0.4", "2", "900"), day(1)).unwrap();
        create_sale(&mut books, &cash(ProductType::Coil, "Mesh 0.4", "1", "450"), day(1)).unwrap();
        create_sale(&mut books, &cash(ProductType::Coil, "Mesh 0.8", "1", "400"), day(2)).unwrap();
        create_sale(&mut books, &cash(ProductType::Refill, "Tokyo", "1", "1500"), day(2)).unwrap();
        create_sale(
            &mut books,
            &SaleForm::credit(ProductType::Device, "Xros 3", "1", "6000", "Ali", "0300"),
            day(2),
        )
        .unwrap();
        // Deleted sale: never counted.
        create_sale(&mut books, &cash(ProductType::Puff, "Elf", "1", "999"), day(2)).unwrap();
        soft_delete_sale(&mut books, 5, day(3)).unwrap();

        add_expense(&mut books, &ExpenseForm::new("Rent", "1000", "rent"), day(1)).unwrap();
        add_expense(&mut books, &ExpenseForm::new("Tea", "250", ""), day(3)).unwrap();

        record_payment(&mut books, 0, "1500", day(3)).unwrap();
        books
    }

    #[test]
    fn test_summary_totals() {
        let summary = summarize(&sample_books(), None);

        assert_eq!(summary.total_cash_sales, Money::from_major(3250));
        assert_eq!(summary.cash_sale_count, 4);
        assert_eq!(summary.total_credit_sales, Money::from_major(6000));
        assert_eq!(summary.total_payments, Money::from_major(1500));
        assert_eq!(summary.total_expenses, Money::from_major(1250));
        assert_eq!(summary.net_amount, Money::from_major(3500));
        assert_eq!(summary.outstanding_credit, Money::from_major(4500));
        assert_eq!(summary.collection_rate, Rate::from_bps(2500));
    }

    #[test]
    fn test_collection_rate_without_credit_is_full() {
        assert_eq!(collection_rate(Money::zero(), Money::zero()), Rate::FULL);
        assert_eq!(summarize(&Books::new(), None).collection_rate, Rate::FULL);
    }

    #[test]
    fn test_coil_aggregates_by_item() {
        let coils = aggregate_by_item(&sample_books(), Some(ProductType::Coil), None);

        assert_eq!(coils.len(), 2);
        assert_eq!(
            coils["Mesh 0.4"],
            ItemAggregate {
                quantity: 3,
                amount: Money::from_major(1350),
                count: 2,
            }
        );
        assert_eq!(coils["Mesh 0.8"].count, 1);
    }

    #[test]
    fn test_aggregate_by_type_skips_deleted() {
        let types = aggregate_by_type(&sample_books(), None);
        assert!(!types.contains_key(&ProductType::Puff));
        assert_eq!(types[&ProductType::Device].amount, Money::from_major(6000));
    }

    #[test]
    fn test_date_range_filters_everything() {
        let books = sample_books();
        let range = DateRange::day(day(1).date_naive());
        let summary = summarize(&books, Some(&range));

        assert_eq!(summary.total_cash_sales, Money::from_major(1350));
        assert_eq!(summary.total_credit_sales, Money::zero());
        assert_eq!(summary.total_expenses, Money::from_major(1000));
        assert_eq!(summary.total_payments, Money::zero());
        assert_eq!(summary.net_amount, Money::from_major(350));
    }

    #[test]
    fn test_expenses_by_category() {
        let categories = expenses_by_category(&sample_books(), None);
        assert_eq!(categories["rent"], Money::from_major(1000));
        assert_eq!(categories["general"], Money::from_major(250));
    }

    #[test]
    fn test_report_serializes_type_keys() {
        let report = Report::build(&sample_books(), None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["byType"]["coil"]["count"], 3);
        assert_eq!(json["summary"]["netAmount"], 350000);
    }
}
