//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kasir-api errors (in app)                                             │
//! │  └── ApiError         - What the HTTP client sees                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. Every variant names the
/// precondition or record that failed so callers can report it verbatim.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was requested for a cashier with no cart lines.
    ///
    /// ## When This Occurs
    /// - Cashier pressed "pay" twice; the second attempt sees the cart
    ///   already cleared by the first
    /// - Cart was emptied from another session
    #[error("Cart is empty for cashier {cashier_id}")]
    EmptyCart { cashier_id: i64 },

    /// A checkout field could not be parsed as a finite number.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Product cannot be found (by id or barcode).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart line does not exist or belongs to another cashier.
    #[error("Cart line not found: {0}")]
    CartLineNotFound(i64),

    /// No transaction carries the requested invoice.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Checkout would drive a product's stock below zero.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart: Kopi × 12
    ///      │
    ///      ▼
    /// Stock check: available = 10
    ///      │
    ///      ▼
    /// InsufficientStock { title: "Kopi", available: 10, requested: 12 }
    ///      │
    ///      ▼
    /// Whole checkout rejected, cart untouched
    /// ```
    #[error("Insufficient stock for {title}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        title: String,
        available: i64,
        requested: i64,
    },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic or storage work runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// An amount derived from the input does not fit in the money range.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Invalid format (e.g., malformed email, malformed date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            title: "Kopi Susu".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Kopi Susu: available 3, requested 5"
        );

        let err = CoreError::EmptyCart { cashier_id: 1 };
        assert_eq!(err.to_string(), "Cart is empty for cashier 1");

        let err = CoreError::invalid_input("cash", "not a number");
        assert_eq!(err.to_string(), "Invalid cash: not a number");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        assert_eq!(err.to_string(), "barcode is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
