//! # Cart Error Types
//!
//! Error types for cart client operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │ InvalidArgument │  │    NotFound     │  │  Transport Failure      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  bad key        │  │  key matches no │  │  Http (network)         │ │
//! │  │  bad variant id │  │  line item      │  │  HttpStatus (non-2xx)   │ │
//! │  │  empty change   │  │                 │  │  Decode (bad JSON)      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  Configuration  │   InvalidArgument is always detected before a     │
//! │  │                 │   request is sent. Transport failures are passed  │
//! │  │  InvalidConfig  │   through unchanged and never retried.            │
//! │  │  InvalidUrl     │                                                   │
//! │  │  ConfigLoad...  │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::StatusCode;
use theme_cart_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for cart operations.
pub type CartResult<T> = Result<T, CartError>;

/// Cart error type covering every way a cart operation can fail.
#[derive(Debug, Error)]
pub enum CartError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Malformed key, variant id or options.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// The key matched no line item in the current cart.
    #[error("Unable to match line item with provided key: {key}")]
    NotFound { key: String },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The storefront answered with a non-success status.
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        context: String,
        status: StatusCode,
        body: String,
    },

    /// The response body was not the JSON shape expected.
    #[error("Failed to decode response: {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be serialized.
    #[error("Failed to encode request: {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Invalid storefront origin.
    #[error("Invalid storefront URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for CartError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineItemNotFound { key } => CartError::NotFound { key },
            CoreError::Validation(e) => CartError::InvalidArgument(e),
        }
    }
}

impl From<url::ParseError> for CartError {
    fn from(err: url::ParseError) -> Self {
        CartError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for CartError {
    fn from(err: std::io::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(err: toml::de::Error) -> Self {
        CartError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CartError {
    /// Returns true if the caller's input was malformed.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CartError::InvalidArgument(_))
    }

    /// Returns true if a key could not be resolved to a line.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CartError::NotFound { .. })
    }

    /// Returns true if the failure came from the network or the response.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            CartError::Http { .. } | CartError::HttpStatus { .. } | CartError::Decode { .. }
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CartError::InvalidConfig(_)
                | CartError::InvalidUrl(_)
                | CartError::ConfigLoadFailed(_)
        )
    }
}
