//! # Creditor Ledger
//!
//! Who owes what. Every credit sale event flows through here.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Creditor Ledger Events                             │
//! │                                                                         │
//! │  create credit sale ──► record_credit_sale                             │
//! │                           find by phone → +amount, push Purchase        │
//! │                           not found     → new Creditor                  │
//! │                                                                         │
//! │  edit sale ───────────► transfer_credit_sale                           │
//! │                           credit → credit (same phone)  adjust balance  │
//! │                           credit → credit (new phone)   reverse+record  │
//! │                           credit → cash                 reverse         │
//! │                           cash   → credit               record          │
//! │                           cash   → cash                 nothing         │
//! │                                                                         │
//! │  payment ─────────────► apply_payment                                  │
//! │                           reject ≤ 0 or > owed, subtract,               │
//! │                           remove creditor at exactly zero               │
//! │                                                                         │
//! │  soft delete ─────────► (not routed here; balance stays billed)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Limitations
//! - A same-phone credit edit moves the balance but leaves the purchase
//!   list as it was, so the two can drift apart over repeated edits.
//! - A repeat credit sale under a different name keeps the first name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Creditor, Payment, Purchase, Sale};

// =============================================================================
// Creditor Ledger
// =============================================================================

/// The creditors collection, in stored order.
///
/// Positions are what the operator picks from, so they are exposed as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditorLedger(Vec<Creditor>);

impl CreditorLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a loaded creditors collection.
    pub fn from_creditors(creditors: Vec<Creditor>) -> Self {
        CreditorLedger(creditors)
    }

    /// The creditors, in stored order.
    #[inline]
    pub fn creditors(&self) -> &[Creditor] {
        &self.0
    }

    /// Unwraps into the collection for storage.
    pub fn into_creditors(self) -> Vec<Creditor> {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Creditor> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Creditor> {
        self.0.iter()
    }

    /// Position of the creditor with this phone.
    pub fn position_by_phone(&self, phone: &str) -> Option<usize> {
        self.0.iter().position(|c| c.phone == phone)
    }

    /// Looks up a creditor by phone.
    pub fn find_by_phone(&self, phone: &str) -> Option<&Creditor> {
        self.0.iter().find(|c| c.phone == phone)
    }

    /// Sum of every creditor's balance.
    pub fn total_owed(&self) -> Money {
        self.0.iter().map(|c| c.amount_owed).sum()
    }

    // =========================================================================
    // Sale Events
    // =========================================================================

    /// Adds a credit sale to the customer's account, opening one if needed.
    ///
    /// Always succeeds.
    pub fn record_credit_sale(
        &mut self,
        name: &str,
        phone: &str,
        item_name: &str,
        quantity: i64,
        amount: Money,
        date: DateTime<Utc>,
    ) {
        let purchase = Purchase {
            item_name: item_name.to_string(),
            quantity,
            amount,
            date,
        };

        match self.0.iter_mut().find(|c| c.phone == phone) {
            Some(creditor) => {
                creditor.amount_owed += amount;
                creditor.purchases.push(purchase);
            }
            None => self.0.push(Creditor {
                name: name.to_string(),
                phone: phone.to_string(),
                amount_owed: amount,
                purchases: vec![purchase],
            }),
        }
    }

    /// Takes a credit sale back off the customer's account.
    ///
    /// Subtracts the sale amount and drops one matching purchase. The
    /// creditor is removed once nothing is owed and no purchases remain.
    /// Does nothing when no creditor has the sale's phone.
    pub fn reverse_credit_sale(&mut self, original: &Sale) {
        let Some(index) = self.position_by_phone(&original.customer_phone) else {
            return;
        };

        let creditor = &mut self.0[index];
        creditor.amount_owed -= original.amount;

        if let Some(pos) = creditor
            .purchases
            .iter()
            .position(|p| p.matches(&original.item_name, original.quantity, original.amount))
        {
            creditor.purchases.remove(pos);
        }

        if !creditor.amount_owed.is_positive() && creditor.purchases.is_empty() {
            self.0.remove(index);
        }
    }

    /// Reconciles the ledger when a sale is edited from `original` to
    /// `updated`.
    pub fn transfer_credit_sale(&mut self, original: &Sale, updated: &Sale) {
        match (original.is_credit, updated.is_credit) {
            (true, true) if original.customer_phone == updated.customer_phone => {
                if let Some(creditor) = self
                    .0
                    .iter_mut()
                    .find(|c| c.phone == original.customer_phone)
                {
                    creditor.amount_owed = creditor.amount_owed - original.amount + updated.amount;
                }
            }
            (true, true) => {
                self.reverse_credit_sale(original);
                self.record_updated(updated);
            }
            (true, false) => self.reverse_credit_sale(original),
            (false, true) => self.record_updated(updated),
            (false, false) => {}
        }
    }

    fn record_updated(&mut self, updated: &Sale) {
        self.record_credit_sale(
            &updated.customer_name,
            &updated.customer_phone,
            &updated.item_name,
            updated.quantity,
            updated.amount,
            updated.timestamp,
        );
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Applies a payment to the creditor at `index`.
    ///
    /// ## Errors
    /// - `CreditorNotFound` if there is no creditor at `index`
    /// - `InvalidPaymentAmount` if `amount` is not positive
    /// - `LimitExceeded` if `amount` is more than the creditor owes
    ///
    /// Nothing changes on error.
    ///
    /// ## Returns
    /// The payment record to append to the payments log. The creditor is
    /// removed when the balance reaches exactly zero.
    pub fn apply_payment(
        &mut self,
        index: usize,
        amount: Money,
        now: DateTime<Utc>,
    ) -> CoreResult<Payment> {
        let creditor = self
            .0
            .get_mut(index)
            .ok_or_else(|| CoreError::CreditorNotFound(format!("index {}", index)))?;

        if !amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "must be greater than zero".to_string(),
            });
        }

        let owed = creditor.amount_owed;
        if amount > owed {
            return Err(CoreError::LimitExceeded {
                owed,
                requested: amount,
            });
        }

        creditor.amount_owed -= amount;

        let payment = Payment {
            creditor_name: creditor.name.clone(),
            creditor_phone: creditor.phone.clone(),
            amount,
            timestamp: now,
            original_sale_amount: Some(owed),
        };

        if creditor.amount_owed.is_zero() {
            self.0.remove(index);
        }

        Ok(payment)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, ProductType};
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    fn credit_sale(phone: &str, item: &str, qty: i64, rupees: i64) -> Sale {
        Sale {
            product_type: ProductType::Coil,
            item_name: item.to_string(),
            quantity: qty,
            amount: Money::from_major(rupees),
            payment_method: PaymentMethod::Credit,
            timestamp: at(1),
            is_credit: true,
            customer_name: "Ali".to_string(),
            customer_phone: phone.to_string(),
            is_paid: false,
            deleted: false,
            deleted_at: None,
        }
    }

    fn cash_sale(item: &str, rupees: i64) -> Sale {
        Sale {
            payment_method: PaymentMethod::Cash,
            is_credit: false,
            customer_name: String::new(),
            customer_phone: String::new(),
            is_paid: true,
            ..credit_sale("", item, 1, rupees)
        }
    }

    fn record(ledger: &mut CreditorLedger, sale: &Sale) {
        ledger.record_credit_sale(
            &sale.customer_name,
            &sale.customer_phone,
            &sale.item_name,
            sale.quantity,
            sale.amount,
            sale.timestamp,
        );
    }

    #[test]
    fn test_repeat_sales_accumulate_on_one_creditor() {
        let mut ledger = CreditorLedger::new();
        for rupees in [500, 250, 125] {
            record(&mut ledger, &credit_sale("0300", "Mesh 0.4", 1, rupees));
        }

        assert_eq!(ledger.len(), 1);
        let creditor = ledger.find_by_phone("0300").unwrap();
        assert_eq!(creditor.amount_owed, Money::from_major(875));
        assert_eq!(creditor.purchases.len(), 3);
    }

    #[test]
    fn test_repeat_sale_keeps_first_name() {
        let mut ledger = CreditorLedger::new();
        ledger.record_credit_sale("Ali", "0300", "Pod", 1, Money::from_major(100), at(1));
        ledger.record_credit_sale("Ali Raza", "0300", "Pod", 1, Money::from_major(100), at(2));
        assert_eq!(ledger.get(0).unwrap().name, "Ali");
    }

    #[test]
    fn test_reverse_removes_settled_creditor() {
        let mut ledger = CreditorLedger::new();
        let sale = credit_sale("0300", "Mesh 0.4", 2, 900);
        record(&mut ledger, &sale);

        ledger.reverse_credit_sale(&sale);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_reverse_keeps_creditor_with_other_purchases() {
        let mut ledger = CreditorLedger::new();
        let first = credit_sale("0300", "Mesh 0.4", 2, 900);
        let second = credit_sale("0300", "Pod", 1, 300);
        record(&mut ledger, &first);
        record(&mut ledger, &second);

        ledger.reverse_credit_sale(&first);

        let creditor = ledger.find_by_phone("0300").unwrap();
        assert_eq!(creditor.amount_owed, Money::from_major(300));
        assert_eq!(creditor.purchases.len(), 1);
        assert_eq!(creditor.purchases[0].item_name, "Pod");
    }

    #[test]
    fn test_reverse_unknown_phone_is_noop() {
        let mut ledger = CreditorLedger::new();
        record(&mut ledger, &credit_sale("0300", "Pod", 1, 300));
        let before = ledger.clone();

        ledger.reverse_credit_sale(&credit_sale("0399", "Pod", 1, 300));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_transfer_same_phone_adjusts_balance_only() {
        let mut ledger = CreditorLedger::new();
        let original = credit_sale("0300", "Pod", 1, 300);
        record(&mut ledger, &original);

        let updated = credit_sale("0300", "Pod", 1, 450);
        ledger.transfer_credit_sale(&original, &updated);

        let creditor = ledger.find_by_phone("0300").unwrap();
        assert_eq!(creditor.amount_owed, Money::from_major(450));
        // Purchase history still shows the original amount.
        assert_eq!(creditor.purchases[0].amount, Money::from_major(300));
    }

    #[test]
    fn test_transfer_to_new_phone_moves_the_debt() {
        let mut ledger = CreditorLedger::new();
        let original = credit_sale("0300", "Pod", 1, 300);
        record(&mut ledger, &original);

        let updated = credit_sale("0311", "Pod", 1, 300);
        ledger.transfer_credit_sale(&original, &updated);

        assert!(ledger.find_by_phone("0300").is_none());
        assert_eq!(
            ledger.find_by_phone("0311").unwrap().amount_owed,
            Money::from_major(300)
        );
    }

    #[test]
    fn test_transfer_credit_to_cash_and_back() {
        let mut ledger = CreditorLedger::new();
        let credit = credit_sale("0300", "Pod", 1, 300);
        let cash = cash_sale("Pod", 300);
        record(&mut ledger, &credit);

        ledger.transfer_credit_sale(&credit, &cash);
        assert!(ledger.is_empty());

        ledger.transfer_credit_sale(&cash, &credit);
        assert_eq!(ledger.find_by_phone("0300").unwrap().purchases.len(), 1);

        let before = ledger.clone();
        ledger.transfer_credit_sale(&cash, &cash_sale("Pod", 999));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_apply_payment_partial_and_full() {
        let mut ledger = CreditorLedger::new();
        record(&mut ledger, &credit_sale("0311", "Pod", 1, 300));

        let payment = ledger.apply_payment(0, Money::from_major(200), at(3)).unwrap();
        assert_eq!(payment.creditor_phone, "0311");
        assert_eq!(payment.original_sale_amount, Some(Money::from_major(300)));
        assert_eq!(ledger.get(0).unwrap().amount_owed, Money::from_major(100));

        ledger.apply_payment(0, Money::from_major(100), at(4)).unwrap();
        assert!(ledger.find_by_phone("0311").is_none());
    }

    #[test]
    fn test_apply_payment_rejections_change_nothing() {
        let mut ledger = CreditorLedger::new();
        record(&mut ledger, &credit_sale("0300", "Pod", 1, 500));
        let before = ledger.clone();

        assert!(matches!(
            ledger.apply_payment(0, Money::from_major(600), at(2)),
            Err(CoreError::LimitExceeded { .. })
        ));
        assert!(matches!(
            ledger.apply_payment(0, Money::zero(), at(2)),
            Err(CoreError::InvalidPaymentAmount { .. })
        ));
        assert!(matches!(
            ledger.apply_payment(5, Money::from_major(1), at(2)),
            Err(CoreError::CreditorNotFound(_))
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut ledger = CreditorLedger::new();
        record(&mut ledger, &credit_sale("0300", "Pod", 1, 500));
        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["amountOwed"], 50000);
    }
}
