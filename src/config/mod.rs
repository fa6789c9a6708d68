//! Configuration types for the gateway.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GatewayConfig`]: the immutable configuration threaded through every
//!   component (no process-global state)
//! - [`GatewayConfigBuilder`]: builder enforcing the required OAuth
//!   parameters before anything touches the network
//! - [`ClientId`] / [`ClientSecret`]: validated credential newtypes
//! - [`ShopDomain`]: validated, normalized shop domain
//! - [`ApiVersion`]: Admin API version
//!
//! This module also hosts the layered credential resolution used at process
//! startup: an explicit value wins, then the on-disk credential store, then
//! the environment. Resolution runs once and produces plain immutable
//! values; nothing later re-reads the environment.
//!
//! # Example
//!
//! ```rust
//! use shopify_gateway::{GatewayConfig, ClientId, ClientSecret, ShopDomain};
//!
//! let config = GatewayConfig::builder()
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .shop_domain(ShopDomain::new("my-store").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.shop_domain().as_ref(), "my-store.myshopify.com");
//! ```

mod newtypes;
mod version;

pub use newtypes::{ClientId, ClientSecret, ShopDomain};
pub use version::ApiVersion;

use crate::auth::token_store::TokenStore;
use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Environment variable consulted as the last resort for an access token.
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ACCESS_TOKEN";

/// Environment variable consulted as the last resort for the shop domain.
pub const SHOP_DOMAIN_ENV: &str = "MYSHOPIFY_DOMAIN";

/// Configuration for the gateway.
///
/// Holds the OAuth client credentials, target shop, requested scopes, and
/// Admin API version. Built once at startup and passed by reference into
/// each component's constructor, so every component is independently
/// testable with a mock collaborator.
///
/// # Thread Safety
///
/// `GatewayConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    shop_domain: ShopDomain,
    scopes: AuthScopes,
    api_version: ApiVersion,
}

impl GatewayConfig {
    /// Creates a new builder for constructing a `GatewayConfig`.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Returns the OAuth client id.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the target shop domain.
    #[must_use]
    pub const fn shop_domain(&self) -> &ShopDomain {
        &self.shop_domain
    }

    /// Returns the scopes requested during authorization.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the Admin API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }
}

// Verify GatewayConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GatewayConfig>();
};

/// Builder for constructing [`GatewayConfig`] instances.
///
/// Required fields are `client_id`, `client_secret`, and `shop_domain`;
/// their absence is this crate's configuration-error boundary, reported
/// before any network action.
///
/// # Defaults
///
/// - `scopes`: the gateway's fixed default scope set
/// - `api_version`: latest stable version
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    shop_domain: Option<ShopDomain>,
    scopes: Option<AuthScopes>,
    api_version: Option<ApiVersion>,
}

impl GatewayConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth client id (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the OAuth client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the target shop domain (required).
    #[must_use]
    pub fn shop_domain(mut self, domain: ShopDomain) -> Self {
        self.shop_domain = Some(domain);
        self
    }

    /// Overrides the default scope set.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Builds the [`GatewayConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id`,
    /// `client_secret`, or `shop_domain` is not set.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;
        let shop_domain = self.shop_domain.ok_or(ConfigError::MissingRequiredField {
            field: "shop_domain",
        })?;

        Ok(GatewayConfig {
            client_id,
            client_secret,
            shop_domain,
            scopes: self.scopes.unwrap_or_default(),
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
        })
    }
}

/// Resolves the access token for a shop from layered sources.
///
/// Sources are consulted in order: the explicit argument, the on-disk
/// credential store, and finally the `SHOPIFY_ACCESS_TOKEN` environment
/// variable. Intended to run once at startup; the winner becomes part of
/// the immutable configuration.
#[must_use]
pub fn resolve_access_token(
    explicit: Option<String>,
    store: &TokenStore,
    domain: &ShopDomain,
) -> Option<String> {
    if let Some(token) = explicit {
        return Some(token);
    }
    if let Ok(Some(record)) = store.load(domain) {
        tracing::debug!(domain = %domain, "using persisted access token");
        return Some(record.access_token);
    }
    std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.is_empty())
}

/// Resolves the shop domain from the explicit argument or the
/// `MYSHOPIFY_DOMAIN` environment variable.
///
/// # Errors
///
/// Returns [`ConfigError::MissingRequiredField`] when neither source is
/// set, or [`ConfigError::InvalidShopDomain`] when the winning value does
/// not validate.
pub fn resolve_shop_domain(explicit: Option<String>) -> Result<ShopDomain, ConfigError> {
    let raw = match explicit {
        Some(domain) => domain,
        None => std::env::var(SHOP_DOMAIN_ENV)
            .ok()
            .filter(|d| !d.is_empty())
            .ok_or(ConfigError::MissingRequiredField {
                field: "shop_domain",
            })?,
    };
    ShopDomain::new(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token_store::TokenRecord;
    use chrono::Utc;

    fn build_config() -> GatewayConfig {
        GatewayConfig::builder()
            .client_id(ClientId::new("test-client-id").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .shop_domain(ShopDomain::new("test-shop").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_client_id() {
        let result = GatewayConfigBuilder::new()
            .client_secret(ClientSecret::new("secret").unwrap())
            .shop_domain(ShopDomain::new("shop").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "client_id" })
        ));
    }

    #[test]
    fn test_builder_requires_client_secret() {
        let result = GatewayConfigBuilder::new()
            .client_id(ClientId::new("key").unwrap())
            .shop_domain(ShopDomain::new("shop").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "client_secret"
            })
        ));
    }

    #[test]
    fn test_builder_requires_shop_domain() {
        let result = GatewayConfigBuilder::new()
            .client_id(ClientId::new("key").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "shop_domain"
            })
        ));
    }

    #[test]
    fn test_builder_provides_defaults() {
        let config = build_config();
        assert_eq!(config.api_version(), &ApiVersion::latest());
        assert!(!config.scopes().is_empty());
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GatewayConfig>();
    }

    #[test]
    fn test_explicit_token_wins_over_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        let domain = ShopDomain::new("layered-shop").unwrap();
        store
            .persist(
                &domain,
                &TokenRecord {
                    access_token: "stored-token".to_string(),
                    scope: "read_products".to_string(),
                    obtained_at: Utc::now(),
                },
            )
            .unwrap();

        let token = resolve_access_token(Some("explicit-token".to_string()), &store, &domain);
        assert_eq!(token.as_deref(), Some("explicit-token"));
    }

    #[test]
    fn test_store_token_wins_over_environment() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        let domain = ShopDomain::new("layered-shop").unwrap();
        store
            .persist(
                &domain,
                &TokenRecord {
                    access_token: "stored-token".to_string(),
                    scope: "read_products".to_string(),
                    obtained_at: Utc::now(),
                },
            )
            .unwrap();

        let token = resolve_access_token(None, &store, &domain);
        assert_eq!(token.as_deref(), Some("stored-token"));
    }

    #[test]
    fn test_resolve_shop_domain_explicit() {
        let domain = resolve_shop_domain(Some("explicit-shop".to_string())).unwrap();
        assert_eq!(domain.as_ref(), "explicit-shop.myshopify.com");
    }
}
