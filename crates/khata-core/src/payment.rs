//! # Payment Recorder
//!
//! Takes money from a creditor and settles what it can.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_payment(books, creditor_index, "500", now)                     │
//! │       │                                                                 │
//! │       ├── parse "500"          → InvalidPaymentAmount on bad text       │
//! │       │                                                                 │
//! │       ├── ledger.apply_payment → LimitExceeded / CreditorNotFound      │
//! │       │      (balance −= amount, creditor removed at zero)              │
//! │       │                                                                 │
//! │       ├── payments.push(payment)                                        │
//! │       │                                                                 │
//! │       └── mark_settled_sales   → isPaid, credit_paid, timestamp = now   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check runs before the first mutation, so a rejected payment leaves
//! creditors, payments and sales untouched.
//!
//! ## Sale Settlement Heuristic
//! A payment marks as paid every open credit sale for the creditor's phone
//! whose amount is at most the payment amount. Each sale is compared with
//! the whole payment on its own; nothing is allocated cumulatively. A
//! partial payment smaller than every sale marks nothing, and a payment of
//! 500 marks both a 300 and a 400 sale. Existing records depend on this
//! behavior, so it is kept rather than replaced by FIFO allocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::books::Books;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Payment, PaymentMethod, Sale};

/// Outcome of a recorded payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment: Payment,
    /// Balance still owed after the payment.
    pub remaining: Money,
    /// The creditor was paid off and removed.
    pub settled: bool,
    /// Number of credit sales marked paid.
    pub sales_marked: usize,
}

/// Parses a payment amount typed by the operator.
///
/// ## Errors
/// `InvalidPaymentAmount` for blank, non-numeric, NaN/inf, or non-positive
/// input.
pub fn parse_payment_amount(raw: &str) -> CoreResult<Money> {
    let amount = Money::parse("amount", raw).map_err(|e| CoreError::InvalidPaymentAmount {
        reason: e.to_string(),
    })?;

    if !amount.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(amount)
}

/// Records a payment from the creditor at `creditor_index`.
///
/// Balance update, payment log append and sale settlement happen together
/// or not at all.
pub fn record_payment(
    books: &mut Books,
    creditor_index: usize,
    raw_amount: &str,
    now: DateTime<Utc>,
) -> CoreResult<PaymentReceipt> {
    let amount = parse_payment_amount(raw_amount)?;
    let payment = books.creditors.apply_payment(creditor_index, amount, now)?;

    let remaining = books
        .creditors
        .find_by_phone(&payment.creditor_phone)
        .map(|c| c.amount_owed)
        .unwrap_or_default();
    let settled = remaining.is_zero();

    let sales_marked = mark_settled_sales(&mut books.sales, &payment.creditor_phone, amount, now);
    books.payments.push(payment.clone());

    Ok(PaymentReceipt {
        payment,
        remaining,
        settled,
        sales_marked,
    })
}

/// Marks open credit sales for `phone` that `amount` covers on its own.
///
/// Deleted sales are skipped. Returns the number of sales marked.
pub fn mark_settled_sales(
    sales: &mut [Sale],
    phone: &str,
    amount: Money,
    now: DateTime<Utc>,
) -> usize {
    let mut marked = 0;
    for sale in sales
        .iter_mut()
        .filter(|s| s.is_active() && s.is_open_credit_for(phone) && amount >= s.amount)
    {
        sale.is_paid = true;
        sale.payment_method = PaymentMethod::CreditPaid;
        sale.timestamp = now;
        marked += 1;
    }
    marked
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::{create_sale, soft_delete_sale, SaleForm};
    use crate::types::ProductType;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, day, 15, 0, 0).unwrap()
    }

    fn credit(phone: &str, amount: &str) -> SaleForm {
        SaleForm::credit(ProductType::Coil, "Mesh 0.6", "1", amount, "Ali", phone)
    }

    #[test]
    fn test_exact_payment_settles_creditor_and_sale() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("0300", "500"), at(1)).unwrap();

        let receipt = record_payment(&mut books, 0, "500", at(2)).unwrap();

        assert!(receipt.settled);
        assert_eq!(receipt.sales_marked, 1);
        assert!(books.creditors.is_empty());
        assert!(books.creditors.find_by_phone("0300").is_none());

        assert_eq!(books.payments.len(), 1);
        assert_eq!(books.payments[0].creditor_phone, "0300");
        assert_eq!(books.payments[0].amount, Money::from_major(500));

        let sale = &books.sales[0];
        assert!(sale.is_paid);
        assert_eq!(sale.payment_method, PaymentMethod::CreditPaid);
        assert_eq!(sale.timestamp, at(2));
    }

    #[test]
    fn test_partial_payment_leaves_sale_open() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("0311", "300"), at(1)).unwrap();

        let receipt = record_payment(&mut books, 0, "200", at(2)).unwrap();

        assert!(!receipt.settled);
        assert_eq!(receipt.remaining, Money::from_major(100));
        assert_eq!(receipt.sales_marked, 0);
        assert_eq!(
            books.creditors.find_by_phone("0311").unwrap().amount_owed,
            Money::from_major(100)
        );
        assert!(!books.sales[0].is_paid);
        assert_eq!(books.sales[0].timestamp, at(1));
    }

    #[test]
    fn test_over_limit_payment_changes_nothing() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("0300", "500"), at(1)).unwrap();
        let before = books.clone();

        let err = record_payment(&mut books, 0, "500.01", at(2)).unwrap_err();
        assert!(matches!(err, CoreError::LimitExceeded { .. }));
        assert_eq!(books, before);
    }

    #[test]
    fn test_bad_amounts_are_rejected() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("0300", "500"), at(1)).unwrap();
        let before = books.clone();

        for raw in ["", "abc", "NaN", "0", "-50"] {
            assert!(
                matches!(
                    record_payment(&mut books, 0, raw, at(2)),
                    Err(CoreError::InvalidPaymentAmount { .. })
                ),
                "{raw:?} should be rejected"
            );
        }
        assert_eq!(books, before);
    }

    #[test]
    fn test_one_payment_can_mark_several_sales() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("0300", "300"), at(1)).unwrap();
        create_sale(&mut books, &credit("0300", "400"), at(1)).unwrap();
        create_sale(&mut books, &credit("0300", "600"), at(1)).unwrap();

        let receipt = record_payment(&mut books, 0, "500", at(2)).unwrap();

        assert_eq!(receipt.sales_marked, 2);
        assert_eq!(receipt.remaining, Money::from_major(800));
        let paid: Vec<bool> = books.sales.iter().map(|s| s.is_paid).collect();
        assert_eq!(paid, vec![true, true, false]);
    }

    #[test]
    fn test_other_customers_and_deleted_sales_are_not_marked() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("0300", "100"), at(1)).unwrap();
        create_sale(&mut books, &credit("0399", "100"), at(1)).unwrap();
        create_sale(&mut books, &credit("0300", "100"), at(1)).unwrap();
        soft_delete_sale(&mut books, 2, at(1)).unwrap();

        record_payment(&mut books, 0, "150", at(2)).unwrap();

        assert!(books.sales[0].is_paid);
        assert!(!books.sales[1].is_paid);
        assert!(!books.sales[2].is_paid);
    }

    #[test]
    fn test_original_sale_amount_is_balance_before_payment() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("0300", "250"), at(1)).unwrap();
        create_sale(&mut books, &credit("0300", "250"), at(1)).unwrap();

        record_payment(&mut books, 0, "100", at(2)).unwrap();
        assert_eq!(
            books.payments[0].original_sale_amount,
            Some(Money::from_major(500))
        );
    }
}
