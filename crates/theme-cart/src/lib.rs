//! # theme-cart: Storefront Cart Client
//!
//! Async client for the storefront cart endpoints: read the cart, add,
//! change and remove line items, update attributes and the note, and fetch
//! shipping rates.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Client Architecture                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      CartClient (client.rs)                      │  │
//! │  │                                                                  │  │
//! │  │  validate input ─► resolve key (GET /cart.js) ─► mutate          │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   Protocol     │  │   Transport    │  │   Config               │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Endpoints and  │  │ reqwest with   │  │ TOML file + env vars   │    │
//! │  │ request bodies │  │ cookie jar and │  │ origin, cart token,    │    │
//! │  │                │  │ marker header  │  │ user agent             │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  Types and validation come from theme-cart-core.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `CartClient`, one method per cart operation
//! - [`config`] - Storefront origin, cart token and HTTP settings
//! - [`error`] - Cart error types
//! - [`protocol`] - Endpoints and request/response bodies
//! - [`transport`] - `CartTransport` trait and the reqwest implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use theme_cart::{AddLineItemOptions, CartClient, CartConfig};
//!
//! let client = CartClient::from_config(&CartConfig::load_or_default(None))?;
//!
//! let item = client
//!     .add_line_item(39897499729985u64, AddLineItemOptions::new().with_quantity(1))?
//!     .await?;
//! client.remove_line_item(&item.key).await?;
//!
//! let note = client.set_note(Some("Leave at the side door")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod transport;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use client::CartClient;
pub use config::CartConfig;
pub use error::{CartError, CartResult};
pub use transport::{CartTransport, HttpTransport, TransportConfig};

pub use theme_cart_core::{
    AddLineItemOptions, Attributes, CartState, ChangeLineItemOptions, LineItem, LineItemKey,
    Properties, ShippingRate, ValidationError, VariantId,
};
