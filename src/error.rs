//! Error types for gateway configuration.
//!
//! This module contains the error type used by the configuration layer.
//! All configuration constructors return `Result<T, ConfigError>` so that
//! required OAuth parameters are validated before any network action.
//!
//! # Example
//!
//! ```rust
//! use shopify_gateway::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur during gateway configuration.
///
/// Each variant carries a clear, actionable message. A missing required
/// field is the gateway's configuration-error boundary: it is detected at
/// `GatewayConfig::build()` time, before any OAuth or API call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// OAuth client id cannot be empty.
    #[error("Client id cannot be empty. Provide the app's Shopify API key.")]
    EmptyClientId,

    /// OAuth client secret cannot be empty.
    #[error("Client secret cannot be empty. Provide the app's Shopify API secret key.")]
    EmptyClientSecret,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version string is invalid.
    #[error("Invalid API version '{version}'. Expected 'YYYY-MM' (e.g. '2025-07') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Scope list is invalid.
    #[error("Invalid scopes: {reason}")]
    InvalidScopes {
        /// The reason the scope list was rejected.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. Set it before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_client_id_error_message() {
        let error = ConfigError::EmptyClientId;
        assert!(error.to_string().contains("Client id cannot be empty"));
    }

    #[test]
    fn test_invalid_shop_domain_error_message() {
        let error = ConfigError::InvalidShopDomain {
            domain: "bad domain!".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad domain!"));
        assert!(message.contains("Expected"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "client_id" };
        let message = error.to_string();
        assert!(message.contains("client_id"));
        assert!(message.contains("Missing required field"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyClientId;
        let _: &dyn std::error::Error = &error;
    }
}
