//! # Cart Client
//!
//! One method per cart operation. Every method issues fresh requests; nothing
//! is cached between calls.
//!
//! ## Key Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 change_line_item("1:abc", options)                      │
//! │                                                                         │
//! │  1. validate key ─────────────► InvalidArgument (no request sent)      │
//! │  2. validate options ─────────► InvalidArgument (no request sent)      │
//! │                                                                         │
//! │  3. RESOLVE                                                            │
//! │     GET /cart.js ──► items[] ──► last index with item.key == key       │
//! │                                      │                                  │
//! │                                      └── none ──► NotFound             │
//! │                                                                         │
//! │  4. MUTATE                                                             │
//! │     POST /cart/change.js { line, quantity?, properties? }              │
//! │                                                                         │
//! │  The line number is only valid for the snapshot read in step 3. A      │
//! │  concurrent edit between 3 and 4 can shift it; callers who already     │
//! │  hold a line number can skip straight to `change_line`.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Timing
//! `get_line_item` and `add_line_item` check their input when called and
//! return `Err` before any future exists. Every other keyed operation is an
//! `async fn` and reports bad input when awaited.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use theme_cart_core::validation::{
    validate_change_options, validate_line_item_key, validate_variant_id,
};
use theme_cart_core::{
    AddLineItemOptions, Attributes, CartState, ChangeLineItemOptions, LineItem, LineItemKey,
    ShippingRate,
};
use tracing::debug;

use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::protocol::{
    AddLineItemRequest, ChangeLineItemRequest, Endpoint, ShippingRatesResponse,
    UpdateAttributesRequest, UpdateNoteRequest,
};
use crate::transport::{CartTransport, HttpTransport};

/// Client for the storefront cart endpoints.
///
/// ## Example
/// ```rust,ignore
/// use theme_cart::{CartClient, CartConfig, ChangeLineItemOptions};
///
/// let client = CartClient::from_config(&CartConfig::load_or_default(None))?;
///
/// let state = client.get_state().await?;
/// println!("{} line items", state.len());
///
/// client
///     .change_line_item("39897499729985:9b8cd6f0", ChangeLineItemOptions::quantity(2))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct CartClient<T = HttpTransport> {
    transport: T,
}

impl CartClient<HttpTransport> {
    /// Creates a client from validated configuration.
    pub fn from_config(config: &CartConfig) -> CartResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.transport_config()?)?;
        Ok(Self::new(transport))
    }

    /// Creates a client for `origin` with default settings.
    pub fn from_origin(origin: &str) -> CartResult<Self> {
        Self::from_config(&CartConfig::for_origin(origin))
    }
}

impl<T: CartTransport> CartClient<T> {
    pub fn new(transport: T) -> Self {
        CartClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // Cart State
    // =========================================================================

    /// Fetches the current cart.
    pub async fn get_state(&self) -> CartResult<CartState> {
        self.request(Endpoint::State, None).await
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Returns the zero-based line number of the item with `key`.
    ///
    /// When several items share the key, the last one wins.
    ///
    /// ## Errors
    /// - `InvalidArgument` if `key` is not `"<variant>:<hash>"` (on await)
    /// - `NotFound` if no item carries the key
    pub async fn get_line_item_index(&self, key: &str) -> CartResult<usize> {
        let key = validate_line_item_key(key)?;
        self.resolve_line(&key).await
    }

    /// Returns the line item with `key`, or `None` if the cart has none.
    ///
    /// The key is checked before the future is built, so a malformed key
    /// fails here and not on await.
    pub fn get_line_item(
        &self,
        key: &str,
    ) -> CartResult<impl Future<Output = CartResult<Option<LineItem>>> + Send + '_> {
        let key = validate_line_item_key(key)?;

        Ok(async move {
            let state = self.get_state().await?;
            Ok(state.line_item(&key).cloned())
        })
    }

    /// Adds `variant_id` to the cart and returns the resulting line item.
    ///
    /// `variant_id` must be a JSON number holding a non-negative integer; the
    /// check happens before the future is built. Any `id` in
    /// `options.extra` is replaced by `variant_id`.
    pub fn add_line_item(
        &self,
        variant_id: impl Into<Value>,
        options: AddLineItemOptions,
    ) -> CartResult<impl Future<Output = CartResult<LineItem>> + Send + '_> {
        let id = validate_variant_id(&variant_id.into())?;
        let body = encode(Endpoint::Add, &AddLineItemRequest::new(id, options))?;

        Ok(async move {
            debug!(variant_id = %id, "Adding line item");
            self.request(Endpoint::Add, Some(body)).await
        })
    }

    /// Changes the quantity and/or properties of the item with `key`.
    ///
    /// Resolves the key against a fresh read of the cart, then changes that
    /// line. Returns the storefront's response unchanged.
    pub async fn change_line_item(
        &self,
        key: &str,
        options: ChangeLineItemOptions,
    ) -> CartResult<Value> {
        let key = validate_line_item_key(key)?;
        validate_change_options(&options)?;

        let line = self.resolve_line(&key).await?;
        self.change_line(line, options).await
    }

    /// Changes the line at zero-based position `line` without resolving a key.
    pub async fn change_line(
        &self,
        line: usize,
        options: ChangeLineItemOptions,
    ) -> CartResult<Value> {
        validate_change_options(&options)?;

        let body = encode(Endpoint::Change, &ChangeLineItemRequest { line, options })?;
        debug!(line, "Changing line item");
        self.request(Endpoint::Change, Some(body)).await
    }

    /// Removes the item with `key` by setting its quantity to zero.
    pub async fn remove_line_item(&self, key: &str) -> CartResult<Value> {
        self.change_line_item(key, ChangeLineItemOptions::remove())
            .await
    }

    /// Removes every line item.
    pub async fn clear_line_items(&self) -> CartResult<CartState> {
        self.request(Endpoint::Clear, None).await
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub async fn get_attributes(&self) -> CartResult<Attributes> {
        Ok(self.get_state().await?.attributes)
    }

    /// Sends `attributes` to the storefront and returns the updated cart.
    pub async fn set_attributes(&self, attributes: &Attributes) -> CartResult<CartState> {
        let body = encode(Endpoint::Update, &UpdateAttributesRequest { attributes })?;
        self.request(Endpoint::Update, Some(body)).await
    }

    pub async fn clear_attributes(&self) -> CartResult<CartState> {
        self.set_attributes(&Attributes::new()).await
    }

    // =========================================================================
    // Note
    // =========================================================================

    pub async fn get_note(&self) -> CartResult<Option<String>> {
        Ok(self.get_state().await?.note)
    }

    /// Sets the cart note and returns the note the storefront stored.
    /// `None` clears it.
    pub async fn set_note(&self, note: Option<&str>) -> CartResult<Option<String>> {
        let body = encode(Endpoint::Update, &UpdateNoteRequest { note })?;
        let state: CartState = self.request(Endpoint::Update, Some(body)).await?;
        Ok(state.note)
    }

    pub async fn clear_note(&self) -> CartResult<Option<String>> {
        self.set_note(None).await
    }

    // =========================================================================
    // Shipping
    // =========================================================================

    /// Fetches the shipping rates offered for the current cart.
    pub async fn get_shipping_rates(&self) -> CartResult<Vec<ShippingRate>> {
        let response: ShippingRatesResponse = self.request(Endpoint::ShippingRates, None).await?;
        Ok(response.into_rates())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn resolve_line(&self, key: &LineItemKey) -> CartResult<usize> {
        let state = self.get_state().await?;
        let line = state.require_line_item_index(key)?;
        debug!(%key, line, "Resolved line item key");
        Ok(line)
    }

    async fn request<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: Option<Value>,
    ) -> CartResult<R> {
        let response = self.transport.send(endpoint, body).await?;
        serde_json::from_value(response).map_err(|source| CartError::Decode {
            context: endpoint.to_string(),
            source,
        })
    }
}

fn encode<B: Serialize>(endpoint: Endpoint, body: &B) -> CartResult<Value> {
    serde_json::to_value(body).map_err(|source| CartError::Encode {
        context: endpoint.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EMPTY_CART: &str = include_str!("../fixtures/cart-empty.json");
    const POPULATED_CART: &str = include_str!("../fixtures/cart-populated.json");

    fn fixture(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap()
    }

    fn client_for(server: &MockServer) -> CartClient {
        CartClient::from_origin(&server.uri()).unwrap()
    }

    async fn mount_state(server: &MockServer, state: Value) {
        Mock::given(method("GET"))
            .and(path("/cart.js"))
            .respond_with(ResponseTemplate::new(200).set_body_json(state))
            .mount(server)
            .await;
    }

    /// Fails the test on drop if any request reaches the server.
    async fn forbid_requests(server: &MockServer) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }

    // -------------------------------------------------------------------------
    // State and lookup
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_cart_has_no_items() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(EMPTY_CART)).await;

        let state = client_for(&server).get_state().await.unwrap();
        assert!(state.is_empty());
        assert_eq!(state.note, None);
    }

    #[tokio::test]
    async fn test_get_line_item_index() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(POPULATED_CART)).await;
        let client = client_for(&server);

        assert_eq!(client.get_line_item_index("1:abc").await.unwrap(), 0);
        assert_eq!(client.get_line_item_index("2:def").await.unwrap(), 1);

        let err = client.get_line_item_index("9:zzz").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_line_item_index_rejects_on_await() {
        let server = MockServer::start().await;
        forbid_requests(&server).await;
        let client = client_for(&server);

        let pending = client.get_line_item_index("123456");
        let err = pending.await.unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_get_line_item() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(POPULATED_CART)).await;
        let client = client_for(&server);

        let item = client.get_line_item("1:abc").unwrap().await.unwrap();
        let item = item.expect("line item 1:abc");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.extra.get("handle"), Some(&json!("field-shirt")));

        let missing = client.get_line_item("9:zzz").unwrap().await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_items_with_unusual_field_types_resolve() {
        let server = MockServer::start().await;
        mount_state(
            &server,
            json!({"items": [{"key": "1:abc", "quantity": 1, "title": 42, "price": "25.00"}]}),
        )
        .await;
        let client = client_for(&server);

        assert_eq!(client.get_line_item_index("1:abc").await.unwrap(), 0);
        let item = client.get_line_item("1:abc").unwrap().await.unwrap();
        assert_eq!(
            item.and_then(|item| item.extra.get("price").cloned()),
            Some(json!("25.00"))
        );
    }

    #[tokio::test]
    async fn test_get_line_item_duplicate_key_returns_last() {
        let server = MockServer::start().await;
        mount_state(
            &server,
            json!({"items": [
                {"key": "1:abc", "quantity": 1},
                {"key": "2:def", "quantity": 2},
                {"key": "1:abc", "quantity": 3}
            ]}),
        )
        .await;
        let client = client_for(&server);

        let item = client.get_line_item("1:abc").unwrap().await.unwrap();
        assert_eq!(item.map(|item| item.quantity), Some(3));
        assert_eq!(client.get_line_item_index("1:abc").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cart_token_can_be_switched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cart.js"))
            .and(header("cookie", "cart=c2-next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(EMPTY_CART)))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = CartConfig::for_origin(server.uri());
        config.storefront.cart_token = Some("c1-first".into());
        let client = CartClient::from_config(&config).unwrap();
        assert_eq!(client.transport().origin().as_str(), format!("{}/", server.uri()));

        client.transport().set_cart_token("c2-next");
        assert!(client.get_state().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_line_item_fails_at_call_time() {
        let server = MockServer::start().await;
        forbid_requests(&server).await;
        let client = client_for(&server);

        for key in ["123456", "1:2:3", ":abc", ""] {
            let err = client.get_line_item(key).err().expect("invalid key");
            assert!(err.is_invalid_argument(), "{key}");
        }
    }

    // -------------------------------------------------------------------------
    // Add
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_line_item_merges_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/add.js"))
            .and(body_json(json!({
                "id": 123456,
                "quantity": 20,
                "properties": {"someKey": "someValue"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 123456,
                "key": "123456:f00d",
                "quantity": 20,
                "properties": {"someKey": "someValue"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = AddLineItemOptions::new()
            .with_quantity(20)
            .with_property("someKey", "someValue");
        let item = client_for(&server)
            .add_line_item(123456, options)
            .unwrap()
            .await
            .unwrap();

        assert_eq!(item.key, "123456:f00d");
        assert_eq!(item.quantity, 20);
    }

    #[tokio::test]
    async fn test_add_line_item_rejects_non_numeric_id() {
        let server = MockServer::start().await;
        forbid_requests(&server).await;
        let client = client_for(&server);

        let err = client
            .add_line_item("123456", AddLineItemOptions::new())
            .err()
            .expect("string id");
        assert!(err.is_invalid_argument());

        let err = client
            .add_line_item(json!("123456:123456"), AddLineItemOptions::new())
            .err()
            .expect("key as id");
        assert!(err.is_invalid_argument());
    }

    // -------------------------------------------------------------------------
    // Change and remove
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_change_line_item_sends_resolved_line() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(POPULATED_CART)).await;
        Mock::given(method("POST"))
            .and(path("/cart/change.js"))
            .and(body_json(json!({"line": 0, "quantity": 2})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"key": "1:abc", "quantity": 2})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .change_line_item("1:abc", ChangeLineItemOptions::quantity(2))
            .await
            .unwrap();
        assert_eq!(response["quantity"], 2);
    }

    #[tokio::test]
    async fn test_change_line_item_with_properties() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(POPULATED_CART)).await;
        Mock::given(method("POST"))
            .and(path("/cart/change.js"))
            .and(body_json(json!({"line": 1, "properties": {"someKey": "someValue"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let options = ChangeLineItemOptions::new().with_property("someKey", "someValue");
        client_for(&server)
            .change_line_item("2:def", options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_change_line_item_requires_a_change() {
        let server = MockServer::start().await;
        forbid_requests(&server).await;

        let err = client_for(&server)
            .change_line_item("1:abc", ChangeLineItemOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_change_line_item_missing_key() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(POPULATED_CART)).await;
        Mock::given(method("POST"))
            .and(path("/cart/change.js"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .change_line_item("9:zzz", ChangeLineItemOptions::quantity(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_remove_line_item_sends_zero_quantity() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(POPULATED_CART)).await;
        Mock::given(method("POST"))
            .and(path("/cart/change.js"))
            .and(body_json(json!({"line": 0, "quantity": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(EMPTY_CART)))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).remove_line_item("1:abc").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_line_item_invalid_key() {
        let server = MockServer::start().await;
        forbid_requests(&server).await;

        let err = client_for(&server)
            .remove_line_item("123456")
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_change_line_skips_resolution() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/change.js"))
            .and(body_json(json!({"line": 3, "quantity": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .change_line(3, ChangeLineItemOptions::quantity(5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_clear_line_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/clear.js"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(EMPTY_CART)))
            .expect(1)
            .mount(&server)
            .await;

        let state = client_for(&server).clear_line_items().await.unwrap();
        assert!(state.is_empty());
    }

    // -------------------------------------------------------------------------
    // Attributes and note
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_attributes_and_note() {
        let server = MockServer::start().await;
        mount_state(&server, fixture(POPULATED_CART)).await;
        let client = client_for(&server);

        let attributes = client.get_attributes().await.unwrap();
        assert_eq!(attributes.get("gift_wrap"), Some(&json!("yes")));

        let note = client.get_note().await.unwrap();
        assert_eq!(note.as_deref(), Some("Leave at the side door"));
    }

    #[tokio::test]
    async fn test_set_attributes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/update.js"))
            .and(body_json(json!({"attributes": {"someKey": "someValue"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "attributes": {"someKey": "someValue"},
                "note": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut attributes = Attributes::new();
        attributes.insert("someKey".into(), json!("someValue"));
        let state = client_for(&server)
            .set_attributes(&attributes)
            .await
            .unwrap();
        assert_eq!(state.attributes, attributes);
    }

    #[tokio::test]
    async fn test_clear_attributes_sends_empty_map() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/update.js"))
            .and(body_json(json!({"attributes": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(EMPTY_CART)))
            .expect(1)
            .mount(&server)
            .await;

        let state = client_for(&server).clear_attributes().await.unwrap();
        assert!(state.attributes.is_empty());
    }

    #[tokio::test]
    async fn test_set_note_returns_note() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/update.js"))
            .and(body_json(json!({"note": "Leave at the side door"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(POPULATED_CART)))
            .expect(1)
            .mount(&server)
            .await;

        let note = client_for(&server)
            .set_note(Some("Leave at the side door"))
            .await
            .unwrap();
        assert_eq!(note.as_deref(), Some("Leave at the side door"));
    }

    #[tokio::test]
    async fn test_clear_note_sends_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart/update.js"))
            .and(body_json(json!({"note": null})))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(EMPTY_CART)))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).clear_note().await.unwrap(), None);
    }

    // -------------------------------------------------------------------------
    // Shipping and failures
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_shipping_rates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cart/shipping_rates.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "shipping_rates": [
                    {"name": "Standard", "code": "std", "price": "5.00"},
                    {"name": "Express", "code": "exp", "price": "15.00", "delivery_days": [1, 2]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rates = client_for(&server).get_shipping_rates().await.unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].get("code"), Some(&json!("std")));
        assert_eq!(rates[1].get("delivery_days"), Some(&json!([1, 2])));
    }

    #[tokio::test]
    async fn test_shipping_rates_keep_numeric_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cart/shipping_rates.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "shipping_rates": [{"name": "Standard", "code": "std", "price": 5.0}]
            })))
            .mount(&server)
            .await;

        let rates = client_for(&server).get_shipping_rates().await.unwrap();
        assert_eq!(rates[0].get("price"), Some(&json!(5.0)));
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cart.js"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        let client = client_for(&server);

        assert!(client.get_state().await.unwrap_err().is_transport_failure());
        assert!(client
            .get_line_item_index("1:abc")
            .await
            .unwrap_err()
            .is_transport_failure());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_decode_error() {
        let server = MockServer::start().await;
        mount_state(&server, json!({"items": "not a list"})).await;

        let err = client_for(&server).get_state().await.unwrap_err();
        assert!(matches!(err, CartError::Decode { .. }));
    }
}
