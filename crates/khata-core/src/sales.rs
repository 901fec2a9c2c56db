//! # Sale Record Manager
//!
//! Creates, edits and soft-deletes sales, keeping the creditor ledger in
//! step with credit sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌──────────┐   create_sale    ┌──────────┐  soft_delete_sale  ┌──────────┐
//! │   form   │ ───────────────► │  active  │ ─────────────────► │ deleted  │
//! └──────────┘                  └────┬─────┘                    └──────────┘
//!                                    │ ▲                         (kept for
//!                          edit_sale │ │ timestamp preserved      audit)
//!                                    └─┘
//! ```
//!
//! Validation runs before anything is touched, so a rejected form leaves
//! the books exactly as they were.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::books::Books;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{PaymentMethod, ProductType, Sale};
use crate::validation::{
    validate_amount, validate_item_name, validate_phone, validate_quantity, validate_required,
};

// =============================================================================
// Sale Form
// =============================================================================

/// Raw sale input as typed by the operator.
///
/// Quantity and amount stay as text until validation so that "abc" and
/// "" produce field errors instead of parse failures upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleForm {
    pub product_type: ProductType,
    pub item_name: String,
    pub quantity: String,
    pub amount: String,
    pub payment_method: PaymentMethod,
    pub is_credit: bool,
    pub customer_name: String,
    pub customer_phone: String,
}

impl SaleForm {
    /// A cash (or card/online) sale form.
    pub fn cash(
        product_type: ProductType,
        item_name: impl Into<String>,
        quantity: impl Into<String>,
        amount: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Self {
        SaleForm {
            product_type,
            item_name: item_name.into(),
            quantity: quantity.into(),
            amount: amount.into(),
            payment_method,
            is_credit: false,
            customer_name: String::new(),
            customer_phone: String::new(),
        }
    }

    /// A credit sale form for the given customer.
    pub fn credit(
        product_type: ProductType,
        item_name: impl Into<String>,
        quantity: impl Into<String>,
        amount: impl Into<String>,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
    ) -> Self {
        SaleForm {
            product_type,
            item_name: item_name.into(),
            quantity: quantity.into(),
            amount: amount.into(),
            payment_method: PaymentMethod::Credit,
            is_credit: true,
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
        }
    }

    /// Validates every field and builds the sale.
    ///
    /// ## Rules
    /// - itemName is not blank
    /// - quantity is a positive whole number
    /// - amount is a positive amount
    /// - credit sales: customerName and customerPhone are not blank
    /// - non-credit sales: paymentMethod is not `credit`/`credit_paid`
    ///
    /// Every failing field is reported in one error.
    pub fn build(&self, timestamp: DateTime<Utc>) -> Result<Sale, ValidationError> {
        let mut errors = Vec::new();

        let item_name = validate_item_name(&self.item_name).map_err(|e| errors.push(e)).ok();
        let quantity = validate_quantity(&self.quantity).map_err(|e| errors.push(e)).ok();
        let amount = validate_amount("amount", &self.amount).map_err(|e| errors.push(e)).ok();

        let (customer_name, customer_phone) = if self.is_credit {
            let name = validate_required("customerName", &self.customer_name)
                .map_err(|e| errors.push(e))
                .ok();
            let phone = validate_phone(&self.customer_phone)
                .map_err(|e| errors.push(e))
                .ok();
            (name, phone)
        } else {
            if self.payment_method.is_credit() {
                errors.push(ValidationError::InvalidFormat {
                    field: "paymentMethod".to_string(),
                    reason: "credit needs customer details".to_string(),
                });
            }
            (None, None)
        };

        ValidationError::collect(errors)?;

        // Every field is Some once collect() has passed.
        Ok(Sale {
            product_type: self.product_type,
            item_name: item_name.unwrap_or_default(),
            quantity: quantity.unwrap_or_default(),
            amount: amount.unwrap_or_default(),
            payment_method: if self.is_credit {
                PaymentMethod::Credit
            } else {
                self.payment_method
            },
            timestamp,
            is_credit: self.is_credit,
            customer_name: customer_name.unwrap_or_default(),
            customer_phone: customer_phone.unwrap_or_default(),
            is_paid: !self.is_credit,
            deleted: false,
            deleted_at: None,
        })
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Records a new sale.
///
/// ## Flow
/// ```text
/// form ──► build (validate) ──► push to sales ──► credit? ──► record_credit_sale
/// ```
pub fn create_sale(books: &mut Books, form: &SaleForm, now: DateTime<Utc>) -> CoreResult<Sale> {
    let sale = form.build(now)?;

    if sale.is_credit {
        books.creditors.record_credit_sale(
            &sale.customer_name,
            &sale.customer_phone,
            &sale.item_name,
            sale.quantity,
            sale.amount,
            sale.timestamp,
        );
    }
    books.sales.push(sale.clone());

    Ok(sale)
}

/// Replaces the sale at `index` in the active view.
///
/// The original timestamp is kept. `is_paid` is recomputed from the form,
/// so editing a settled credit sale reopens it.
///
/// ## Errors
/// - `SaleNotFound` if `index` is outside the active view
/// - `Validation` if the form is invalid
pub fn edit_sale(books: &mut Books, index: usize, form: &SaleForm) -> CoreResult<Sale> {
    let position = books
        .sale_position(index)
        .ok_or_else(|| CoreError::SaleNotFound(format!("index {}", index)))?;

    let original = books.sales[position].clone();
    let updated = form.build(original.timestamp)?;

    books.creditors.transfer_credit_sale(&original, &updated);
    books.sales[position] = updated.clone();

    Ok(updated)
}

/// Soft-deletes the sale at `index` in the active view.
///
/// The creditor ledger is not touched: a deleted credit sale stays billed.
pub fn soft_delete_sale(books: &mut Books, index: usize, now: DateTime<Utc>) -> CoreResult<Sale> {
    let position = books
        .sale_position(index)
        .ok_or_else(|| CoreError::SaleNotFound(format!("index {}", index)))?;

    let sale = &mut books.sales[position];
    sale.deleted = true;
    sale.deleted_at = Some(now);

    Ok(sale.clone())
}

/// Soft-deletes every active sale. Returns how many were deleted.
pub fn delete_all_sales(books: &mut Books, now: DateTime<Utc>) -> usize {
    let mut count = 0;
    for sale in books.sales.iter_mut().filter(|s| s.is_active()) {
        sale.deleted = true;
        sale.deleted_at = Some(now);
        count += 1;
    }
    count
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, hour, 0, 0).unwrap()
    }

    fn credit(name: &str, phone: &str, amount: &str) -> SaleForm {
        SaleForm::credit(ProductType::Device, "Xros 3", "1", amount, name, phone)
    }

    fn cash(amount: &str) -> SaleForm {
        SaleForm::cash(ProductType::Refill, "Tokyo 30ml", "2", amount, PaymentMethod::Cash)
    }

    #[test]
    fn test_create_cash_sale() {
        let mut books = Books::new();
        let sale = create_sale(&mut books, &cash("700"), at(9)).unwrap();

        assert!(sale.is_paid);
        assert!(!sale.is_credit);
        assert_eq!(sale.customer_phone, "");
        assert_eq!(books.sales.len(), 1);
        assert!(books.creditors.is_empty());
    }

    #[test]
    fn test_credit_sale_opens_creditor() {
        let mut books = Books::new();
        let sale = create_sale(&mut books, &credit("Ali", "0300", "500"), at(9)).unwrap();

        assert!(!sale.is_paid);
        assert_eq!(sale.payment_method, PaymentMethod::Credit);

        let creditor = books.creditors.find_by_phone("0300").unwrap();
        assert_eq!(creditor.amount_owed, Money::from_major(500));
        assert_eq!(creditor.purchases.len(), 1);
    }

    #[test]
    fn test_repeat_credit_sales_sum_per_phone() {
        let mut books = Books::new();
        let amounts = ["100", "250.50", "49.50"];
        for amount in amounts {
            create_sale(&mut books, &credit("Sara", "0345", amount), at(9)).unwrap();
        }

        let creditor = books.creditors.find_by_phone("0345").unwrap();
        assert_eq!(creditor.amount_owed, Money::from_major(400));
        assert_eq!(creditor.purchases.len(), amounts.len());
    }

    #[test]
    fn test_invalid_form_reports_every_field() {
        let mut books = Books::new();
        let form = SaleForm::credit(ProductType::Coil, " ", "0", "abc", "", "");

        let err = create_sale(&mut books, &form, at(9)).unwrap_err();
        let CoreError::Validation(err) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            err.fields(),
            vec!["itemName", "quantity", "amount", "customerName", "customerPhone"]
        );
        assert!(books.sales.is_empty());
        assert!(books.creditors.is_empty());
    }

    #[test]
    fn test_oversized_credit_sale_rejected_before_ledger() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("Ali", "0300", "10000000"), at(9)).unwrap();

        let err = create_sale(&mut books, &credit("Ali", "0300", "90000000000000000"), at(10))
            .unwrap_err();
        let CoreError::Validation(err) = err else {
            panic!("expected validation error");
        };
        assert_eq!(err.fields(), vec!["amount"]);

        let form = SaleForm::credit(ProductType::Coil, "Mesh 0.4", "100000", "10", "Ali", "0300");
        assert!(create_sale(&mut books, &form, at(11)).is_err());

        assert_eq!(books.sales.len(), 1);
        let ali = books.creditors.find_by_phone("0300").unwrap();
        assert_eq!(ali.amount_owed, crate::MAX_AMOUNT);
    }

    #[test]
    fn test_cash_sale_cannot_claim_credit_method() {
        let form = SaleForm::cash(ProductType::Puff, "Elf", "1", "300", PaymentMethod::Credit);
        let err = form.build(at(9)).unwrap_err();
        assert_eq!(err.fields(), vec!["paymentMethod"]);
    }

    #[test]
    fn test_edit_cash_to_credit_opens_creditor() {
        let mut books = Books::new();
        create_sale(&mut books, &cash("800"), at(9)).unwrap();

        let updated = edit_sale(&mut books, 0, &credit("Bilal", "0321", "800")).unwrap();

        assert_eq!(updated.timestamp, at(9));
        assert!(updated.is_credit);
        let creditor = books.creditors.find_by_phone("0321").unwrap();
        assert_eq!(creditor.amount_owed, Money::from_major(800));
        assert_eq!(books.sales[0], updated);
    }

    #[test]
    fn test_edit_credit_to_cash_clears_creditor() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("Ali", "0300", "500"), at(9)).unwrap();

        edit_sale(&mut books, 0, &cash("500")).unwrap();
        assert!(books.creditors.is_empty());
        assert!(books.sales[0].is_paid);
    }

    #[test]
    fn test_edit_rejects_invalid_form_without_changes() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("Ali", "0300", "500"), at(9)).unwrap();
        let before = books.clone();

        assert!(edit_sale(&mut books, 0, &credit("Ali", "0300", "-5")).is_err());
        assert!(matches!(
            edit_sale(&mut books, 3, &cash("100")),
            Err(CoreError::SaleNotFound(_))
        ));
        assert_eq!(books, before);
    }

    #[test]
    fn test_soft_delete_keeps_creditor_balance() {
        let mut books = Books::new();
        create_sale(&mut books, &credit("Ali", "0300", "500"), at(9)).unwrap();

        let deleted = soft_delete_sale(&mut books, 0, at(11)).unwrap();

        assert!(deleted.deleted);
        assert_eq!(deleted.deleted_at, Some(at(11)));
        assert_eq!(books.sales.len(), 1);
        assert_eq!(books.active_sale_count(), 0);
        assert_eq!(
            books.creditors.find_by_phone("0300").unwrap().amount_owed,
            Money::from_major(500)
        );
    }

    #[test]
    fn test_indexes_follow_active_view() {
        let mut books = Books::new();
        create_sale(&mut books, &cash("100"), at(9)).unwrap();
        create_sale(&mut books, &cash("200"), at(10)).unwrap();
        soft_delete_sale(&mut books, 0, at(11)).unwrap();

        let edited = edit_sale(&mut books, 0, &cash("250")).unwrap();
        assert_eq!(edited.timestamp, at(10));
        assert_eq!(books.sales[1].amount, Money::from_major(250));
        assert_eq!(books.sales[0].amount, Money::from_major(100));
    }

    #[test]
    fn test_delete_all_sales() {
        let mut books = Books::new();
        create_sale(&mut books, &cash("100"), at(9)).unwrap();
        create_sale(&mut books, &credit("Ali", "0300", "500"), at(9)).unwrap();
        soft_delete_sale(&mut books, 0, at(10)).unwrap();

        assert_eq!(delete_all_sales(&mut books, at(12)), 1);
        assert_eq!(books.active_sale_count(), 0);
        assert_eq!(books.sales.len(), 2);
        assert_eq!(books.sales[0].deleted_at, Some(at(10)));
        assert_eq!(books.sales[1].deleted_at, Some(at(12)));
        assert_eq!(books.creditors.len(), 1);
    }
}
