//! # Error Types
//!
//! Domain-specific error types for theme-cart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  theme-cart-core errors (this file)                                    │
//! │  ├── ValidationError  - Malformed input, caught before any request     │
//! │  └── CoreError        - Lookup failures against a fetched CartState    │
//! │                                                                         │
//! │  theme-cart errors (separate crate)                                    │
//! │  └── CartError        - What callers see (adds transport + config)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError → caller                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant is detected purely from the shape of the caller's input,
/// so none of them can occur after a request has been sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A line item key is not `<variant_id>:<hash>`.
    #[error("Provided key value '{value}' is not a string with the format xxx:xxx")]
    InvalidLineItemKey { value: String },

    /// A value that must be a non-negative integer is not.
    #[error("{field} must be a number, got {value}")]
    NotANumber { field: String, value: String },

    /// Change options carry neither a quantity nor properties.
    #[error("An object which specifies a quantity or properties value is required")]
    MissingChange,
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while interpreting a fetched cart state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No line item in the cart carries the given key.
    #[error("Unable to match line item with provided key: {key}")]
    LineItemNotFound { key: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
