//! # Validation Module
//!
//! Input validation utilities for Procura.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Store entry point (Rust)                                     │
//! │  ├── THIS MODULE: field validation, fail fast                          │
//! │  └── Runs BEFORE any record store call is issued                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (vendor name, PO number)                       │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  A failed validation leaves no partial side effects.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use procura_core::validation::{validate_quantity, validate_name};
//!
//! validate_quantity(5).unwrap();
//! validate_name("name", "Acme Supplies").unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_PO_QUANTITY;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a human-facing name field (product name, vendor name, ...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an entity reference (durable id or display id).
///
/// The store accepts either key at every boundary; the only thing checked
/// here is that the caller passed something at all.
pub fn validate_reference(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Normalizes a vendor name for uniqueness comparison.
///
/// Vendor names are unique trimmed and case-insensitively: "Acme" and
/// " ACME " collide. The normalized form is what the unique index sees.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested PO quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_PO_QUANTITY`]
///
/// ## Example
/// ```rust
/// use procura_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-1).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_PO_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_PO_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock figure (current stock, reorder level).
///
/// Zero is allowed; negative is not.
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
