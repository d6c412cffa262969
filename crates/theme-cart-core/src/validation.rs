//! # Validation Module
//!
//! Input validation for cart operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Types                                                        │
//! │  ├── LineItemKey / VariantId can only be built by validation           │
//! │  └── ChangeLineItemOptions carries typed quantity/properties           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Key shape: exactly two non-empty colon-delimited segments         │
//! │  ├── Variant id: a JSON number holding a non-negative integer          │
//! │  └── Change options: quantity or properties present                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storefront                                                   │
//! │  └── Quantities, inventory, prices (authoritative, never checked here) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this module touches the network, so every failure here happens
//! before a request is built.

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{ChangeLineItemOptions, LineItemKey, VariantId};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Line Item Keys
// =============================================================================

/// Validates a composite line item key.
///
/// ## Rules
/// - Exactly one `:` separator
/// - Both segments non-empty
///
/// ## Example
/// ```rust
/// use theme_cart_core::validation::validate_line_item_key;
///
/// assert!(validate_line_item_key("39897499729985:9b8cd6f0").is_ok());
/// assert!(validate_line_item_key("123456").is_err());
/// assert!(validate_line_item_key("1:2:3").is_err());
/// assert!(validate_line_item_key(":abc").is_err());
/// ```
pub fn validate_line_item_key(key: &str) -> ValidationResult<LineItemKey> {
    let invalid = || ValidationError::InvalidLineItemKey {
        value: key.to_string(),
    };

    let separator = key.find(':').ok_or_else(invalid)?;
    let (variant, hash) = (&key[..separator], &key[separator + 1..]);

    if variant.is_empty() || hash.is_empty() || hash.contains(':') {
        return Err(invalid());
    }

    Ok(LineItemKey::from_parts(key.to_string(), separator))
}

// =============================================================================
// Variant Ids
// =============================================================================

/// Validates a variant id supplied as an arbitrary JSON value.
///
/// Strings are rejected even when they look numeric; the add endpoint is
/// always sent a number.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use theme_cart_core::validation::validate_variant_id;
///
/// assert_eq!(validate_variant_id(&json!(123456)).unwrap().get(), 123456);
/// assert!(validate_variant_id(&json!("123456")).is_err());
/// assert!(validate_variant_id(&json!(null)).is_err());
/// ```
pub fn validate_variant_id(value: &Value) -> ValidationResult<VariantId> {
    value
        .as_u64()
        .map(VariantId::new)
        .ok_or_else(|| ValidationError::NotANumber {
            field: "variant_id".to_string(),
            value: value.to_string(),
        })
}

// =============================================================================
// Change Options
// =============================================================================

/// Validates that change options specify a quantity or properties.
///
/// ## Example
/// ```rust
/// use theme_cart_core::validation::validate_change_options;
/// use theme_cart_core::ChangeLineItemOptions;
///
/// assert!(validate_change_options(&ChangeLineItemOptions::quantity(2)).is_ok());
/// assert!(validate_change_options(&ChangeLineItemOptions::new()).is_err());
/// ```
pub fn validate_change_options(options: &ChangeLineItemOptions) -> ValidationResult<()> {
    if !options.has_change() {
        return Err(ValidationError::MissingChange);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
