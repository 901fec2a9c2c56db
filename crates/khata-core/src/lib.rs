//! # khata-core: Pure Bookkeeping Logic for Khata POS
//!
//! This crate is the **heart** of Khata POS. It holds the credit ledger,
//! sale, payment, expense and reporting rules as pure functions over an
//! explicit [`Books`] value.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Khata POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    khata CLI (apps/cli)                         │   │
//! │  │    sale add ──► creditor pay ──► expense add ──► report         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ load Books / save Books                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ khata-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  sales    │  │ creditor  │  │  payment  │  │  report   │  │   │
//! │  │   │ SaleForm  │  │  Ledger   │  │ Recorder  │  │  Summary  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    khata-db (Storage Layer)                     │   │
//! │  │           four JSON collections in a SQLite key-value table     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Stored records (Sale, Expense, Creditor, Payment, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`books`] - The four collections as one state value
//! - [`creditor`] - Creditor ledger: credit sale and payment events
//! - [`sales`] - Create, edit and soft-delete sales
//! - [`payment`] - Record creditor payments and settle sales
//! - [`expense`] - Add and delete expenses
//! - [`report`] - Totals, per-item aggregates, collection rate
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: operations take `&mut Books`, never globals
//! 2. **No I/O**: the caller passes `now` in and persists the result
//! 3. **Integer Money**: all amounts are in paisa (i64)
//! 4. **All or Nothing**: a rejected operation leaves `Books` unchanged
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use khata_core::{create_sale, record_payment, Books, ProductType, SaleForm};
//!
//! let mut books = Books::new();
//! let form = SaleForm::credit(ProductType::Coil, "Mesh 0.4", "1", "500", "Ali", "0300");
//! create_sale(&mut books, &form, Utc::now()).unwrap();
//!
//! let receipt = record_payment(&mut books, 0, "500", Utc::now()).unwrap();
//! assert!(receipt.settled);
//! assert!(books.creditors.is_empty());
//! assert!(books.sales[0].is_paid);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod books;
pub mod creditor;
pub mod error;
pub mod expense;
pub mod money;
pub mod payment;
pub mod report;
pub mod sales;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use khata_core::Money` instead of
// `use khata_core::money::Money`

pub use books::Books;
pub use creditor::CreditorLedger;
pub use error::{CoreError, CoreResult, ValidationError};
pub use expense::{add_expense, delete_expense, ExpenseForm};
pub use money::Money;
pub use payment::{record_payment, PaymentReceipt};
pub use report::{DateRange, ItemAggregate, Report, Summary};
pub use sales::{create_sale, delete_all_sales, edit_sale, soft_delete_sale, SaleForm};
pub use types::*;

// =============================================================================
// Business Constants
// =============================================================================

/// Largest quantity accepted on a single sale.
///
/// ## Business Reason
/// Catches a mistyped quantity (an extra zero or two) before it lands in
/// the per-item report.
pub const MAX_QUANTITY: i64 = 9_999;

/// Largest amount accepted on a single sale, expense or import record:
/// Rs 1 crore.
///
/// Running balances and report totals are sums of these, so they stay far
/// below `i64::MAX` paisa.
pub const MAX_AMOUNT: Money = Money::from_major(10_000_000);
