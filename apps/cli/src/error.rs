//! # API Error Type
//!
//! Unified error type for `khata` commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Khata POS                              │
//! │                                                                         │
//! │  khata creditor pay --index 0 --amount 900                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError::QueryFailed("...") ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Domain Error? ─── CoreError::LimitExceeded ────► ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ── JSON on stdout, exit 0                               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Failure ── JSON on stderr, exit 1:                                     │
//! │    { "code": "LIMIT_EXCEEDED",                                          │
//! │      "message": "Payment of Rs 900.00 exceeds amount owed (Rs 800.00)" }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed save is NOT an `ApiError`: the command still succeeds and
//! reports `durable: false` (see [`crate::commands::persist`]).

use serde::Serialize;

use khata_core::CoreError;
use khata_db::DbError;

/// Error returned from `khata` commands.
///
/// ## Serialization
/// This is what a script reads on stderr when a command fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "customerPhone is required"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Sale, expense or creditor index does not exist
    NotFound,

    /// Input validation failed; nothing was changed
    ValidationError,

    /// Payment larger than the creditor's balance
    LimitExceeded,

    /// Wrong admin password for a privileged command
    Unauthorized,

    /// Database could not be opened or read
    DatabaseError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization {
                collection,
                message,
            } => {
                tracing::error!(collection = %collection, "Serialization failed: {}", message);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Could not encode {}", collection),
                )
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::CreditorNotFound(id) => ApiError::not_found("Creditor", &id),
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", &id),
            CoreError::ExpenseNotFound(id) => ApiError::not_found("Expense", &id),
            CoreError::InvalidPaymentAmount { .. } => ApiError::validation(message),
            CoreError::LimitExceeded { .. } => ApiError::new(ErrorCode::LimitExceeded, message),
            CoreError::Unauthorized => ApiError::new(ErrorCode::Unauthorized, message),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::{Money, ValidationError};

    #[test]
    fn test_core_error_codes() {
        let err = ApiError::from(CoreError::LimitExceeded {
            owed: Money::from_major(800),
            requested: Money::from_major(900),
        });
        assert_eq!(err.code, ErrorCode::LimitExceeded);
        assert_eq!(err.message, "Payment of Rs 900.00 exceeds amount owed (Rs 800.00)");

        let err = ApiError::from(CoreError::from(ValidationError::required("customerPhone")));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("customerPhone is required"));

        let err = ApiError::from(CoreError::SaleNotFound("index 4".into()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Sale not found: index 4");

        assert_eq!(ApiError::from(CoreError::Unauthorized).code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_db_error_hides_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: collections".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_string(&ApiError::validation("amount must be positive")).unwrap();
        assert_eq!(json, r#"{"code":"VALIDATION_ERROR","message":"amount must be positive"}"#);
    }
}
