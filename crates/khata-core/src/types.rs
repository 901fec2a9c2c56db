//! # Domain Types
//!
//! The records kept in the four stored collections.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    Creditor     │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  type           │   │  name           │   │  creditorName   │       │
//! │  │  itemName       │   │  phone (key)    │   │  creditorPhone  │       │
//! │  │  amount         │   │  amountOwed     │   │  amount         │       │
//! │  │  isCredit       │   │  purchases ──┐  │   │  originalSale-  │       │
//! │  │  customerPhone ─┼──►│              │  │◄──┼─ Amount         │       │
//! │  │  deleted        │   └──────────────┼──┘   └─────────────────┘       │
//! │  └─────────────────┘                  ▼                                 │
//! │                              ┌─────────────────┐   ┌────────────────┐  │
//! │                              │    Purchase     │   │    Expense     │  │
//! │                              │  itemName, qty  │   │  description   │  │
//! │                              │  amount, date   │   │  category      │  │
//! │                              └─────────────────┘   └────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Weak References
//! Sales and payments are tied to a creditor only by phone number. Nothing
//! enforces that a creditor exists for a credit sale's phone; the ledger
//! operations keep the two in step.
//!
//! ## Stored Shape
//! Every record serializes with camelCase keys. Optional fields that are
//! unset are omitted, so a loaded collection serializes back to the same
//! text it was read from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A ratio represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 8550 bps = 85.50% of credit sales collected
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// 100%.
    pub const FULL: Rate = Rate(10_000);

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Ratio of two amounts, rounded half-up to the nearest basis point.
    ///
    /// Returns `None` when the denominator is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::types::Rate;
    /// use khata_core::Money;
    ///
    /// let rate = Rate::from_ratio(Money::from_major(200), Money::from_major(300));
    /// assert_eq!(rate.map(|r| r.bps()), Some(6667));
    /// ```
    pub fn from_ratio(numerator: Money, denominator: Money) -> Option<Self> {
        if !denominator.is_positive() {
            return None;
        }
        let n = i128::from(numerator.cents().max(0));
        let d = i128::from(denominator.cents());
        let bps = (n * 10_000 + d / 2) / d;
        Some(Rate(u32::try_from(bps).unwrap_or(u32::MAX)))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Product Type
// =============================================================================

/// The product line a sale belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Refill,
    Coil,
    Device,
    Puff,
    FlavourBottle,
}

impl ProductType {
    /// Every product type, in display order.
    pub const ALL: [ProductType; 5] = [
        ProductType::Refill,
        ProductType::Coil,
        ProductType::Device,
        ProductType::Puff,
        ProductType::FlavourBottle,
    ];

    /// Stored name of the product type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductType::Refill => "refill",
            ProductType::Coil => "coil",
            ProductType::Device => "device",
            ProductType::Puff => "puff",
            ProductType::FlavourBottle => "flavourbottle",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProductType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "type".to_string(),
                reason: format!("unknown product type '{}'", s.trim()),
            })
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// `Credit` is forced for every credit sale. `CreditPaid` is written when a
/// later creditor payment settles the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Bank transfer or mobile wallet.
    Online,
    /// Sold on credit; the customer owes the amount.
    Credit,
    /// Credit sale later settled by a creditor payment.
    CreditPaid,
}

impl PaymentMethod {
    /// Stored name of the method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
            PaymentMethod::Credit => "credit",
            PaymentMethod::CreditPaid => "credit_paid",
        }
    }

    /// Methods that only a credit sale may carry.
    #[inline]
    pub const fn is_credit(&self) -> bool {
        matches!(self, PaymentMethod::Credit | PaymentMethod::CreditPaid)
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "online" => Ok(PaymentMethod::Online),
            "credit" => Ok(PaymentMethod::Credit),
            "credit_paid" => Ok(PaymentMethod::CreditPaid),
            other => Err(ValidationError::InvalidFormat {
                field: "paymentMethod".to_string(),
                reason: format!("unknown payment method '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One recorded sale.
///
/// ## Invariant
/// A cash sale (`is_credit == false`) has empty customer fields and
/// `is_paid == true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub item_name: String,
    pub quantity: i64,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    /// When the sale was made; also the time a payment settled it.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub is_credit: bool,
    pub customer_name: String,
    pub customer_phone: String,
    pub is_paid: bool,
    /// Soft-delete flag. Deleted sales stay stored for audit.
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Whether the sale is still in the active view.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Unpaid credit owed by `phone`.
    pub fn is_open_credit_for(&self, phone: &str) -> bool {
        self.is_credit && !self.is_paid && self.customer_phone == phone
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

// =============================================================================
// Expense
// =============================================================================

/// A business expense. Never edited; only deleted outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub description: String,
    pub amount: Money,
    pub category: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Creditor
// =============================================================================

/// A line in a creditor's purchase history, one per credit sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub item_name: String,
    pub quantity: i64,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Purchase {
    /// Same item, quantity and amount.
    pub fn matches(&self, item_name: &str, quantity: i64, amount: Money) -> bool {
        self.item_name == item_name && self.quantity == quantity && self.amount.approx_eq(amount)
    }
}

/// A customer who owes money, identified by phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Creditor {
    pub name: String,
    pub phone: String,
    pub amount_owed: Money,
    pub purchases: Vec<Purchase>,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment received from a creditor. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub creditor_name: String,
    pub creditor_phone: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    /// Balance the creditor owed just before this payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_sale_amount: Option<Money>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cash_sale() -> Sale {
        Sale {
            product_type: ProductType::FlavourBottle,
            item_name: "Mango Ice".to_string(),
            quantity: 1,
            amount: Money::from_major(1200),
            payment_method: PaymentMethod::Cash,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
            is_credit: false,
            customer_name: String::new(),
            customer_phone: String::new(),
            is_paid: true,
            deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn test_rate_from_ratio() {
        let rate = Rate::from_ratio(Money::from_major(1), Money::from_major(3)).unwrap();
        assert_eq!(rate.bps(), 3333);
        assert_eq!(rate.to_string(), "33.33%");

        assert_eq!(Rate::from_ratio(Money::from_major(5), Money::zero()), None);
        assert_eq!(Rate::FULL.to_string(), "100.00%");
    }

    #[test]
    fn test_product_type_names() {
        assert_eq!("FlavourBottle".parse::<ProductType>(), Ok(ProductType::FlavourBottle));
        assert_eq!("coil".parse::<ProductType>(), Ok(ProductType::Coil));
        assert!("mod".parse::<ProductType>().is_err());
        assert_eq!(
            serde_json::to_string(&ProductType::FlavourBottle).unwrap(),
            "\"flavourbottle\""
        );
    }

    #[test]
    fn test_payment_method_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditPaid).unwrap(),
            "\"credit_paid\""
        );
        assert_eq!("Online".parse::<PaymentMethod>(), Ok(PaymentMethod::Online));
        assert!(PaymentMethod::Credit.is_credit());
        assert!(!PaymentMethod::Card.is_credit());
    }

    #[test]
    fn test_sale_stored_shape() {
        let json = serde_json::to_value(cash_sale()).unwrap();
        assert_eq!(json["type"], "flavourbottle");
        assert_eq!(json["itemName"], "Mango Ice");
        assert_eq!(json["amount"], 120000);
        assert_eq!(json["isPaid"], true);
        assert!(json.get("deleted").is_none());
        assert!(json.get("deletedAt").is_none());
    }

    #[test]
    fn test_sale_without_deleted_flag_loads_as_active() {
        let text = r#"{"type":"coil","itemName":"Mesh 0.4","quantity":2,"amount":90000,
            "paymentMethod":"card","timestamp":"2024-03-01T10:30:00Z","isCredit":false,
            "customerName":"","customerPhone":"","isPaid":true}"#;
        let sale: Sale = serde_json::from_str(text).unwrap();
        assert!(sale.is_active());
        assert_eq!(sale.payment_method, PaymentMethod::Card);
    }

    #[test]
    fn test_purchase_matching() {
        let purchase = Purchase {
            item_name: "Mesh 0.4".to_string(),
            quantity: 2,
            amount: Money::from_major(900),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        };
        assert!(purchase.matches("Mesh 0.4", 2, Money::from_major(900)));
        assert!(!purchase.matches("Mesh 0.4", 1, Money::from_major(900)));
        assert!(!purchase.matches("Mesh 0.8", 2, Money::from_major(900)));
    }
}
