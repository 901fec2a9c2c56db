//! # Validation Module
//!
//! Field validators for the sale and expense forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Enum values (product type, payment method)                        │
//! │  └── Everything else arrives as raw text                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Blank checks on names and phones                                  │
//! │  └── Number parsing for quantity and amount                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Form (SaleForm / ExpenseForm)                                │
//! │  └── Collects every failing field into one ValidationError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::validation::{validate_amount, validate_quantity};
//!
//! assert_eq!(validate_quantity("3").unwrap(), 3);
//! assert!(validate_amount("amount", "0").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is not blank.
///
/// ## Returns
/// The trimmed value.
///
/// ## Example
/// ```rust
/// use khata_core::validation::validate_required;
///
/// assert_eq!(validate_required("customerName", "  Ali ").unwrap(), "Ali");
/// assert!(validate_required("customerName", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(value.to_string())
}

/// Validates an item name.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    validate_required("itemName", name)
}

/// Validates a customer phone number.
///
/// Phone numbers are the creditor identity key, so only surrounding
/// whitespace is removed; "0300 1234567" and "03001234567" are different
/// customers.
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    validate_required("customerPhone", phone)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity typed by the operator.
///
/// ## Rules
/// - Must be a whole number
/// - Must be positive (> 0)
/// - Must not exceed MAX_QUANTITY (9999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sale form: quantity field                                              │
/// │                                                                         │
/// │  Operator types: "2"                                                   │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity("2") ← THIS FUNCTION                                │
/// │       │                                                                 │
/// │       ├── blank?        → "quantity is required"                       │
/// │       ├── "2.5" / "x"?  → "quantity has invalid format"                │
/// │       ├── qty <= 0?     → "quantity must be positive"                  │
/// │       ├── qty > 9999?   → "quantity must be between 1 and 9999"        │
/// │       │                                                                 │
/// │       └── OK → 2                                                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::required("quantity"));
    }

    let qty: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(qty)
}

/// Validates a money amount typed by the operator.
///
/// ## Rules
/// - Must parse with [`Money::parse`]
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_AMOUNT`]
///
/// ## Example
/// ```rust
/// use khata_core::validation::validate_amount;
///
/// assert_eq!(validate_amount("amount", "450.50").unwrap().cents(), 45050);
/// assert!(validate_amount("amount", "-1").is_err());
/// assert!(validate_amount("amount", "NaN").is_err());
/// ```
pub fn validate_amount(field: &str, raw: &str) -> ValidationResult<Money> {
    let amount = Money::parse(field, raw)?;

    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    check_amount(field, amount)
}

/// Rejects an amount above [`MAX_AMOUNT`].
pub fn check_amount(field: &str, amount: Money) -> ValidationResult<Money> {
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT,
        });
    }

    Ok(amount)
}

// =============================================================================
// Unit Tests
// =============================================================================
