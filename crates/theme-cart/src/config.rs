//! # Cart Configuration
//!
//! Where the client finds its storefront and cart.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     THEME_CART_ORIGIN=https://example.myshopify.com                    │
//! │     THEME_CART_TOKEN=c1-abc                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/theme-cart/theme-cart.toml (Linux)                       │
//! │     ~/Library/Application Support/com.theme-cart.theme-cart/...        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000, no cart token                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # theme-cart.toml
//! [storefront]
//! origin = "https://example.myshopify.com"
//! cart_token = "c1-abc"   # optional, resumes an existing cart
//!
//! [http]
//! user_agent = "theme-cart/0.1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{CartError, CartResult};
use crate::transport::TransportConfig;

/// Environment variable overriding `storefront.origin`.
pub const ENV_ORIGIN: &str = "THEME_CART_ORIGIN";

/// Environment variable overriding `storefront.cart_token`.
pub const ENV_CART_TOKEN: &str = "THEME_CART_TOKEN";

/// Environment variable overriding `http.user_agent`.
pub const ENV_USER_AGENT: &str = "THEME_CART_USER_AGENT";

/// Placeholder shown instead of the cart token.
pub const REDACTED: &str = "<redacted>";

// =============================================================================
// Storefront Settings
// =============================================================================

/// The storefront the client talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontSettings {
    /// Origin of the storefront. Every request goes here and nowhere else.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Value of the `cart` cookie. `None` starts a fresh cart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_token: Option<String>,
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        StorefrontSettings {
            origin: default_origin(),
            cart_token: None,
        }
    }
}

// =============================================================================
// HTTP Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Custom `User-Agent` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

// =============================================================================
// Main Cart Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub storefront: StorefrontSettings,

    #[serde(default)]
    pub http: HttpSettings,
}

impl CartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config pointing at `origin` with everything else defaulted.
    pub fn for_origin(origin: impl Into<String>) -> Self {
        CartConfig {
            storefront: StorefrontSettings {
                origin: origin.into(),
                cart_token: None,
            },
            http: HttpSettings::default(),
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (theme-cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        let origin = Url::parse(&self.storefront.origin)?;

        if origin.scheme() != "http" && origin.scheme() != "https" {
            return Err(CartError::InvalidUrl(format!(
                "Storefront origin must start with http:// or https://, got: {}",
                self.storefront.origin
            )));
        }

        if origin.host_str().is_none() {
            return Err(CartError::InvalidUrl(format!(
                "Storefront origin has no host: {}",
                self.storefront.origin
            )));
        }

        if let Some(token) = &self.storefront.cart_token {
            if token.is_empty() || token.contains([';', ' ']) {
                return Err(CartError::InvalidConfig(
                    "cart_token must be a non-empty cookie value".into(),
                ));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(origin) = std::env::var(ENV_ORIGIN) {
            debug!(origin = %origin, "Overriding storefront origin from environment");
            self.storefront.origin = origin;
        }

        if let Ok(token) = std::env::var(ENV_CART_TOKEN) {
            debug!("Overriding cart token from environment");
            self.storefront.cart_token = Some(token);
        }

        if let Ok(user_agent) = std::env::var(ENV_USER_AGENT) {
            self.http.user_agent = Some(user_agent);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "theme-cart", "theme-cart")
            .map(|dirs| dirs.config_dir().join("theme-cart.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn origin(&self) -> &str {
        &self.storefront.origin
    }

    pub fn cart_token(&self) -> Option<&str> {
        self.storefront.cart_token.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.http.user_agent.as_deref()
    }

    /// Returns a copy safe to display, with the cart token masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.storefront.cart_token.is_some() {
            config.storefront.cart_token = Some(REDACTED.to_string());
        }
        config
    }

    /// Builds the transport settings; fails if the origin does not parse.
    pub fn transport_config(&self) -> CartResult<TransportConfig> {
        Ok(TransportConfig {
            origin: Url::parse(&self.storefront.origin)?,
            cart_token: self.storefront.cart_token.clone(),
            user_agent: self.http.user_agent.clone(),
        })
    }
}
