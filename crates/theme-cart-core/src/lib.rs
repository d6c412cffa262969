//! # theme-cart-core: Pure Cart Types for the Storefront Cart Client
//!
//! This crate holds everything about the storefront cart that can be
//! expressed without touching the network: the JSON shapes the cart endpoints
//! exchange, composite line-item keys, input validation and the line-item
//! lookup used to turn a key into a line number.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Theme Cart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/cart-cli (theme-cart binary)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              theme-cart (CartClient + HttpTransport)            │   │
//! │  │     GET /cart.js, POST /cart/add.js, POST /cart/change.js ...  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ theme-cart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────────┐  ┌──────────────────────┐   │   │
//! │  │   │   types   │  │  validation   │  │        error         │   │   │
//! │  │   │ CartState │  │ LineItemKey   │  │  ValidationError     │   │   │
//! │  │   │ LineItem  │  │ VariantId     │  │  CoreError           │   │   │
//! │  │   └───────────┘  └───────────────┘  └──────────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart state, line items, shipping rates, request options
//! - [`validation`] - Composite key, variant id and options validation
//! - [`error`] - Validation and lookup errors
//!
//! ## Example Usage
//!
//! ```rust
//! use theme_cart_core::{CartState, LineItemKey};
//!
//! let state: CartState = serde_json::from_str(
//!     r#"{"items":[{"key":"1:abc","quantity":1}],"attributes":{},"note":null}"#,
//! ).unwrap();
//!
//! let key: LineItemKey = "1:abc".parse().unwrap();
//! assert_eq!(state.line_item_index(&key), Some(0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;
pub use validation::ValidationResult;

// =============================================================================
// Storefront Endpoints
// =============================================================================
// Paths are relative to the storefront origin. The remote service owns them;
// they are not configurable.

/// `GET` - full cart state.
pub const CART_PATH: &str = "/cart.js";

/// `POST` - add a variant to the cart.
pub const CART_ADD_PATH: &str = "/cart/add.js";

/// `POST` - change quantity/properties of the line at a given line number.
pub const CART_CHANGE_PATH: &str = "/cart/change.js";

/// `POST` - remove every line item.
pub const CART_CLEAR_PATH: &str = "/cart/clear.js";

/// `POST` - update cart attributes or note.
pub const CART_UPDATE_PATH: &str = "/cart/update.js";

/// `GET` - shipping rates for the current cart.
pub const CART_SHIPPING_RATES_PATH: &str = "/cart/shipping_rates.json";

// =============================================================================
// Request Marker
// =============================================================================

/// Header sent with every request so the storefront answers with JSON rather
/// than rendering a full page.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Value of [`REQUESTED_WITH_HEADER`].
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Name of the storefront cookie identifying the visitor's cart.
pub const CART_COOKIE_NAME: &str = "cart";
