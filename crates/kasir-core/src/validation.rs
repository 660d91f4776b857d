//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation (lengths, formats, ranges)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (barcode, email, invoice)                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::{validate_barcode, validate_quantity};
//!
//! assert!(validate_barcode("8991001").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest password accepted for a cashier account.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a free-text field is present and not longer than `max`.
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product barcode.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - No whitespace (scanners never emit it)
///
/// ```rust
/// use kasir_core::validation::validate_barcode;
///
/// assert!(validate_barcode("8991001").is_ok());
/// assert!(validate_barcode("").is_err());
/// assert!(validate_barcode("89 91").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    validate_required("barcode", barcode, 50)?;

    if barcode.trim().chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only the shape is checked: one `@`, a non-empty local part and a dotted
/// domain. Deliverability is not our concern.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email, 254)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a new password.
///
/// ## Rules
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │  length ≥ 6                                   │
/// │  at least one uppercase letter      A-Z       │
/// │  at least one lowercase letter      a-z       │
/// │  at least one digit                 0-9       │
/// │  at least one symbol                !@#…      │
/// └──────────────────────────────────────────────┘
/// ```
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    let missing = if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("an uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("a lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("a digit")
    } else if !password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        Some("a symbol")
    } else {
        None
    };

    match missing {
        Some(what) => Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("must contain {what}"),
        }),
        None => Ok(()),
    }
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query string; empty means "match everything".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Cashier scans item, qty: 5                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "qty must be positive"                    │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "qty must be between 1 and 999"          │
/// │       │                                                                 │
/// │       └── OK → Proceed with add_to_cart                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalog price: `0..=MAX_PRICE`. Zero is allowed (free items).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() || price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE.cents() / 100,
        });
    }

    Ok(())
}

/// Validates a stock level entered through the catalog: `0..=MAX_STOCK`.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` query parameter.
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
