//! # Error Types
//!
//! Domain-specific error types for khata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  khata-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  khata-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures (logged, best-effort)         │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → stderr                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed operation never leaves partial state behind: every check runs
//! before the first mutation.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No creditor at the given position (or with the given phone).
    #[error("Creditor not found: {0}")]
    CreditorNotFound(String),

    /// No active sale at the given position.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// No expense at the given position.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    /// Payment amount is not a positive number.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Payment amount is larger than what the creditor owes.
    ///
    /// ## User Workflow
    /// ```text
    /// Creditor "Ali" owes Rs 500.00
    ///      │
    ///      ▼
    /// Record payment: 600
    ///      │
    ///      ▼
    /// LimitExceeded { owed: 500.00, requested: 600.00 }
    ///      │
    ///      ▼
    /// Nothing is applied; the operator re-enters the amount
    /// ```
    #[error("Payment of {requested} exceeds amount owed ({owed})")]
    LimitExceeded { owed: Money, requested: Money },

    /// Wrong admin password for a privileged view.
    #[error("Incorrect password")]
    Unauthorized,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// Used for early validation before any collection is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount is larger than a single entry may be.
    #[error("{field} cannot exceed {max}")]
    AmountTooLarge { field: String, max: Money },

    /// Invalid format (e.g., "12abc" as an amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// More than one field failed; reported together so the form can
    /// highlight all of them at once.
    #[error("{}", join_messages(.0))]
    Several(Vec<ValidationError>),
}

impl ValidationError {
    /// Creates a Required error for the named field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Names of the fields this error refers to.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::AmountTooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. } => vec![field.as_str()],
            ValidationError::Several(errors) => {
                errors.iter().flat_map(ValidationError::fields).collect()
            }
        }
    }

    /// Collapses a list of field errors into a single result.
    pub fn collect(mut errors: Vec<ValidationError>) -> Result<(), ValidationError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Several(errors)),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
