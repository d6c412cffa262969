//! # Cart Protocol
//!
//! Endpoints and request/response bodies of the storefront cart API.
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Cart Endpoints                          │
//! │                                                                         │
//! │  READ                                                                  │
//! │  ────                                                                  │
//! │  GET  /cart.js                  ◄─── CartState                         │
//! │  GET  /cart/shipping_rates.json ◄─── [ShippingRate] or envelope        │
//! │                                                                         │
//! │  LINE ITEMS                                                            │
//! │  ──────────                                                            │
//! │  POST /cart/add.js    { id, quantity?, properties?, ... } ◄─ LineItem  │
//! │  POST /cart/change.js { line, quantity?, properties? }    ◄─ payload   │
//! │  POST /cart/clear.js  (no body)                           ◄─ CartState │
//! │                                                                         │
//! │  CART-LEVEL FIELDS                                                     │
//! │  ─────────────────                                                     │
//! │  POST /cart/update.js { attributes }                      ◄─ CartState │
//! │  POST /cart/update.js { note }                            ◄─ CartState │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Plain JSON objects in both directions. `line` is the zero-based position
//! of the item in `CartState::items`.

use std::fmt;

use serde::{Deserialize, Serialize};
use theme_cart_core::{
    AddLineItemOptions, Attributes, ChangeLineItemOptions, ShippingRate, VariantId, CART_ADD_PATH,
    CART_CHANGE_PATH, CART_CLEAR_PATH, CART_PATH, CART_SHIPPING_RATES_PATH, CART_UPDATE_PATH,
};

// =============================================================================
// Endpoints
// =============================================================================

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Every storefront cart endpoint the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /cart.js`
    State,
    /// `POST /cart/add.js`
    Add,
    /// `POST /cart/change.js`
    Change,
    /// `POST /cart/clear.js`
    Clear,
    /// `POST /cart/update.js`
    Update,
    /// `GET /cart/shipping_rates.json`
    ShippingRates,
}

impl Endpoint {
    /// Path relative to the storefront origin.
    pub const fn path(&self) -> &'static str {
        match self {
            Endpoint::State => CART_PATH,
            Endpoint::Add => CART_ADD_PATH,
            Endpoint::Change => CART_CHANGE_PATH,
            Endpoint::Clear => CART_CLEAR_PATH,
            Endpoint::Update => CART_UPDATE_PATH,
            Endpoint::ShippingRates => CART_SHIPPING_RATES_PATH,
        }
    }

    pub const fn method(&self) -> Method {
        match self {
            Endpoint::State | Endpoint::ShippingRates => Method::Get,
            Endpoint::Add | Endpoint::Change | Endpoint::Clear | Endpoint::Update => {
                Method::Post
            }
        }
    }
}

/// Renders as `"GET /cart.js"`; used as error and log context.
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of `POST /cart/add.js`: the caller's options with `id` merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddLineItemRequest {
    pub id: VariantId,

    #[serde(flatten)]
    pub options: AddLineItemOptions,
}

impl AddLineItemRequest {
    /// Merges the variant id into the options. The validated id always wins
    /// over an `id` smuggled in through the extra fields.
    pub fn new(id: VariantId, mut options: AddLineItemOptions) -> Self {
        options.extra.remove("id");
        AddLineItemRequest { id, options }
    }
}

/// Body of `POST /cart/change.js`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeLineItemRequest {
    /// Zero-based line number.
    pub line: usize,

    #[serde(flatten)]
    pub options: ChangeLineItemOptions,
}

/// Body of `POST /cart/update.js` when replacing attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateAttributesRequest<'a> {
    pub attributes: &'a Attributes,
}

/// Body of `POST /cart/update.js` when setting the note.
///
/// `None` serializes as `"note": null`, which clears the note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateNoteRequest<'a> {
    pub note: Option<&'a str>,
}

// =============================================================================
// Response Bodies
// =============================================================================

/// Body of `GET /cart/shipping_rates.json`.
///
/// Storefronts answer with `{"shipping_rates": [...]}`; a bare array is
/// accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ShippingRatesResponse {
    Envelope { shipping_rates: Vec<ShippingRate> },
    Bare(Vec<ShippingRate>),
}

impl ShippingRatesResponse {
    pub fn into_rates(self) -> Vec<ShippingRate> {
        match self {
            ShippingRatesResponse::Envelope { shipping_rates } => shipping_rates,
            ShippingRatesResponse::Bare(rates) => rates,
        }
    }
}
