//! # Domain Types
//!
//! The JSON shapes exchanged with the storefront cart endpoints.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CartState     │   │    LineItem     │   │  ShippingRate   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  items[]  ──────┼──►│  key "v:hash"   │   │  opaque map     │       │
//! │  │  attributes     │   │  quantity       │   │  (name, code,   │       │
//! │  │  note           │   │  properties     │   │  price, ...)    │       │
//! │  │  ...extra       │   │  ...extra       │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │  LineItemKey    │   │   VariantId     │   │ Add/ChangeLineItem   │  │
//! │  │  (validated)    │   │  (validated)    │   │ Options              │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pass-Through Fields
//! The storefront owns these shapes and adds fields freely (totals, currency,
//! images, discounts...). Every struct keeps the fields it does not model in a
//! flattened `extra` map, so a value read from the server serializes back to
//! the same JSON object. Only the fields the client acts on are typed; a
//! storefront sending a string price or a numeric title still decodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation;

/// Cart-level attributes: arbitrary string-keyed values.
pub type Attributes = Map<String, Value>;

/// Line item properties: arbitrary string-keyed values.
pub type Properties = Map<String, Value>;

// =============================================================================
// Line Item Key
// =============================================================================

/// Composite line item key, `"<variant_id>:<line_item_hash>"`.
///
/// Only constructible through validation, so holding one proves the key has
/// exactly two non-empty colon-delimited segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineItemKey {
    raw: String,
    separator: usize,
}

impl LineItemKey {
    pub(crate) fn from_parts(raw: String, separator: usize) -> Self {
        LineItemKey { raw, separator }
    }

    /// Returns the key as sent by the storefront.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the segment before the colon (the variant id part).
    pub fn variant_segment(&self) -> &str {
        &self.raw[..self.separator]
    }

    /// Returns the segment after the colon (the line item hash).
    pub fn hash_segment(&self) -> &str {
        &self.raw[self.separator + 1..]
    }

    /// Checks whether a line item carries this key.
    #[inline]
    pub fn matches(&self, item: &LineItem) -> bool {
        item.key == self.raw
    }
}

impl fmt::Display for LineItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for LineItemKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validation::validate_line_item_key(s)
    }
}

impl TryFrom<String> for LineItemKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validation::validate_line_item_key(&value)
    }
}

impl From<LineItemKey> for String {
    fn from(key: LineItemKey) -> Self {
        key.raw
    }
}

// =============================================================================
// Variant Id
// =============================================================================

/// Numeric identifier of a product variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(u64);

impl VariantId {
    /// Creates a variant id from its numeric value.
    #[inline]
    pub const fn new(id: u64) -> Self {
        VariantId(id)
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VariantId {
    fn from(id: u64) -> Self {
        VariantId(id)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One variant entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Composite key, `"<variant_id>:<hash>"`.
    pub key: String,

    /// Quantity in cart.
    #[serde(default)]
    pub quantity: u64,

    /// Custom properties attached to this line (null when none).
    #[serde(default)]
    pub properties: Option<Properties>,

    /// Id, title, prices and every other field, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Cart State
// =============================================================================

/// Server-owned snapshot of the cart, as returned by `GET /cart.js`.
///
/// ## Invariants
/// - `items` is in line-number order: `items[n]` is line `n`
/// - Never cached by the client; every read re-fetches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartState {
    /// Line items in line-number order.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Cart-level attributes.
    #[serde(default)]
    pub attributes: Attributes,

    /// Free-text cart note.
    #[serde(default)]
    pub note: Option<String>,

    /// Token, totals, currency and anything else the storefront sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartState {
    /// Number of line items (not the sum of quantities).
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no line items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the line number of the item carrying `key`.
    ///
    /// When several items share a key the last one wins.
    pub fn line_item_index(&self, key: &LineItemKey) -> Option<usize> {
        self.items.iter().rposition(|item| key.matches(item))
    }

    /// Returns the item carrying `key`, the last one if several match.
    pub fn line_item(&self, key: &LineItemKey) -> Option<&LineItem> {
        self.items.iter().rev().find(|item| key.matches(item))
    }

    /// Like [`CartState::line_item_index`], but a missing key is an error.
    pub fn require_line_item_index(&self, key: &LineItemKey) -> CoreResult<usize> {
        self.line_item_index(key)
            .ok_or_else(|| CoreError::LineItemNotFound {
                key: key.to_string(),
            })
    }
}

// =============================================================================
// Shipping Rate
// =============================================================================

/// A shipping rate offered for the current cart.
///
/// Opaque to the client: every field the storefront sends is kept as-is,
/// whatever its type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShippingRate(pub Map<String, Value>);

impl ShippingRate {
    /// Returns a field of the rate, e.g. `"name"`, `"code"` or `"price"`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

// =============================================================================
// Request Options
// =============================================================================

/// Options merged into the body of an add-to-cart request.
///
/// ## Example
/// ```rust
/// use theme_cart_core::AddLineItemOptions;
///
/// let options = AddLineItemOptions::new()
///     .with_quantity(2)
///     .with_property("engraving", "Happy birthday");
/// assert_eq!(options.quantity, Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddLineItemOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,

    /// Any other field the add endpoint accepts (e.g. `selling_plan`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddLineItemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Adds a single property, creating the properties map if needed.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Sets an extra top-level field on the request body.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Options for changing an existing line.
///
/// At least one of `quantity` or `properties` must be set; see
/// [`crate::validation::validate_change_options`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeLineItemOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl ChangeLineItemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options setting only the quantity.
    pub fn quantity(quantity: u64) -> Self {
        ChangeLineItemOptions {
            quantity: Some(quantity),
            properties: None,
        }
    }

    /// Options that remove the line (quantity 0).
    pub fn remove() -> Self {
        Self::quantity(0)
    }

    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Checks that the options actually change something.
    #[inline]
    pub fn has_change(&self) -> bool {
        self.quantity.is_some() || self.properties.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
