//! # HTTP Transport
//!
//! The single seam between the cart client and the network.
//!
//! ## Request Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Cart Request                                   │
//! │                                                                         │
//! │  CartClient ──► CartTransport::send(endpoint, body)                    │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  HttpTransport (reqwest)                                         │  │
//! │  │                                                                  │  │
//! │  │  URL      origin + endpoint path (never another host)            │  │
//! │  │  Headers  X-Requested-With: XMLHttpRequest                       │  │
//! │  │           Accept: application/json                               │  │
//! │  │  Cookies  jar scoped to the origin, seeded with `cart=<token>`   │  │
//! │  │  Body     JSON, POST only                                        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                         │                                               │
//! │            2xx + JSON   │   anything else                               │
//! │                ┌────────┴────────┐                                      │
//! │                ▼                 ▼                                      │
//! │           Ok(Value)      Err(Http | HttpStatus | Decode)               │
//! │                                                                         │
//! │  No retries, no client-side timeout, no caching.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use theme_cart_core::{CART_COOKIE_NAME, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE};
use tracing::debug;
use url::Url;

use crate::error::{CartError, CartResult};
use crate::protocol::{Endpoint, Method};

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends one request to a cart endpoint and returns the decoded JSON body.
///
/// Implementations apply the shared request policy themselves; callers never
/// pass headers or credentials.
#[async_trait]
pub trait CartTransport: Send + Sync {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> CartResult<Value>;
}

#[async_trait]
impl<T: CartTransport + ?Sized> CartTransport for Arc<T> {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> CartResult<Value> {
        (**self).send(endpoint, body).await
    }
}

// =============================================================================
// Transport Configuration
// =============================================================================

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Storefront origin, e.g. `https://example.myshopify.com`.
    pub origin: Url,

    /// Value of the storefront's `cart` cookie, if resuming an existing cart.
    pub cart_token: Option<String>,

    /// Custom `User-Agent`; reqwest's default when `None`.
    pub user_agent: Option<String>,
}

impl TransportConfig {
    pub fn new(origin: Url) -> Self {
        TransportConfig {
            origin,
            cart_token: None,
            user_agent: None,
        }
    }
}

// =============================================================================
// reqwest Transport
// =============================================================================

/// [`CartTransport`] backed by a `reqwest` client with a cookie jar.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    origin: Url,
    client: Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Builds the transport and its underlying client.
    pub fn new(config: TransportConfig) -> CartResult<Self> {
        let jar = Arc::new(Jar::default());
        if let Some(token) = &config.cart_token {
            add_cart_cookie(&jar, &config.origin, token);
        }

        let mut builder = Client::builder()
            .default_headers(default_headers()?)
            .cookie_provider(Arc::clone(&jar));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder.build().map_err(|source| CartError::Http {
            context: "Failed to build HTTP client".to_string(),
            source,
        })?;

        Ok(HttpTransport {
            origin: config.origin,
            client,
            jar,
        })
    }

    /// Builds a transport for `origin` with default settings.
    pub fn from_origin(origin: &str) -> CartResult<Self> {
        Self::new(TransportConfig::new(Url::parse(origin)?))
    }

    /// Returns the storefront origin.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Points subsequent requests at the cart identified by `token`.
    pub fn set_cart_token(&self, token: &str) {
        add_cart_cookie(&self.jar, &self.origin, token);
    }

    fn url_for(&self, endpoint: Endpoint) -> CartResult<Url> {
        Ok(self.origin.join(endpoint.path())?)
    }
}

#[async_trait]
impl CartTransport for HttpTransport {
    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> CartResult<Value> {
        let context = endpoint.to_string();
        let url = self.url_for(endpoint)?;
        debug!(request = %context, %url, has_body = body.is_some(), "Sending cart request");

        let mut request = match endpoint.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| CartError::Http {
            context: context.clone(),
            source,
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| CartError::Http {
            context: context.clone(),
            source,
        })?;
        debug!(request = %context, %status, len = bytes.len(), "Cart response received");

        if !status.is_success() {
            return Err(CartError::HttpStatus {
                context,
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| CartError::Decode { context, source })
    }
}

fn default_headers() -> CartResult<HeaderMap> {
    let name = HeaderName::from_bytes(REQUESTED_WITH_HEADER.as_bytes())
        .map_err(|e| CartError::InvalidConfig(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(name, HeaderValue::from_static(REQUESTED_WITH_VALUE));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn add_cart_cookie(jar: &Jar, origin: &Url, token: &str) {
    jar.add_cookie_str(&format!("{}={}; Path=/", CART_COOKIE_NAME, token), origin);
}
