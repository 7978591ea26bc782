//! # Error Types
//!
//! Domain-specific error types for kardex-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kardex-core errors (this file)                                        │
//! │  ├── CoreError        - Domain errors (not-found, duplicate, ...)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Server API errors (in apps/server)                                    │
//! │  └── ApiError         - What the frontend sees (status + JSON body)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, field name, ...)
//! 3. Errors are enum variants, never String
//! 4. Validation and duplicate errors are raised BEFORE any mutation,
//!    so a failed operation never leaves partial state behind

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors for inventory operations.
///
/// Every failed operation is isolated to its invocation; none of these
/// errors is fatal to the process.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Update/delete/restock on an id the store has never seen
    /// - The product was deleted earlier
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product with the same id already exists.
    ///
    /// ## When This Occurs
    /// - Create with an id that is already taken
    ///
    /// Detected synchronously before any mutation - the store is left
    /// unchanged.
    #[error("Product with this ID already exists: {0}")]
    DuplicateProduct(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true if this error indicates a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::ProductNotFound(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before domain logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    ///
    /// The message format matches the REST contract:
    /// `{"error": "Missing field: <name>"}`.
    #[error("Missing field: {field}")]
    Required { field: String },

    /// Value must be a positive integer.
    #[error("{field} must be a positive integer")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., characters not allowed in a SKU).
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
        let err = CoreError::ProductNotFound("p9".to_string());
        assert_eq!(err.to_string(), "Product not found: p9");

        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "Missing field: sku");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be a positive integer");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(!core_err.is_not_found());
    }
}
