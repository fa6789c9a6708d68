//! OAuth authorization URL generation.
//!
//! The first step of the interactive flow: generate a CSRF state nonce and
//! the Shopify authorization URL the user must visit. The redirect URI is
//! fixed to the gateway's local callback listener.

use crate::auth::oauth::callback_server::{CALLBACK_PATH, CALLBACK_PORT};
use crate::auth::oauth::state::StateParam;
use crate::auth::AuthScopes;
use crate::config::GatewayConfig;

/// Result of initiating OAuth authorization.
///
/// Holds the URL to open in the user's browser and the state parameter the
/// callback listener must compare against. The `state` lives only as long
/// as this flow invocation.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// The full authorization URL to open.
    pub auth_url: String,
    /// The state nonce generated for this flow invocation.
    pub state: StateParam,
}

/// Builds the authorization URL for the configured shop.
///
/// Generates a fresh state nonce and embeds the client id, scope list,
/// local redirect URI, and state as query parameters on
/// `https://{shop}/admin/oauth/authorize`.
///
/// Required OAuth parameters were already validated when the
/// [`GatewayConfig`] was built, so this step cannot fail.
///
/// # Arguments
///
/// * `config` - Gateway configuration (client id, shop domain, scopes)
/// * `scope_override` - Optional scope override (uses `config.scopes()` if `None`)
///
/// # Example
///
/// ```rust
/// use shopify_gateway::{GatewayConfig, ClientId, ClientSecret, ShopDomain};
/// use shopify_gateway::auth::oauth::begin_auth;
///
/// let config = GatewayConfig::builder()
///     .client_id(ClientId::new("client-id").unwrap())
///     .client_secret(ClientSecret::new("secret").unwrap())
///     .shop_domain(ShopDomain::new("test-shop").unwrap())
///     .build()
///     .unwrap();
///
/// let result = begin_auth(&config, None);
/// assert!(result.auth_url.contains("test-shop.myshopify.com/admin/oauth/authorize"));
/// assert!(result.auth_url.contains("state="));
/// ```
#[must_use]
pub fn begin_auth(config: &GatewayConfig, scope_override: Option<&AuthScopes>) -> BeginAuthResult {
    let state = StateParam::new();
    let scopes = scope_override.unwrap_or_else(|| config.scopes());
    let redirect_uri = format!("http://localhost:{CALLBACK_PORT}{CALLBACK_PATH}");

    let params = [
        ("client_id", config.client_id().as_ref().to_string()),
        ("scope", scopes.to_string()),
        ("redirect_uri", redirect_uri),
        ("state", state.to_string()),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!(
        "https://{}/admin/oauth/authorize?{}",
        config.shop_domain().as_ref(),
        query_string
    );

    BeginAuthResult { auth_url, state }
}

// Verify BeginAuthResult is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BeginAuthResult>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientId, ClientSecret, ShopDomain};

    fn create_test_config() -> GatewayConfig {
        GatewayConfig::builder()
            .client_id(ClientId::new("test-client-id").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap())
            .shop_domain(ShopDomain::new("test-shop").unwrap())
            .scopes("read_products,write_orders".parse().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_begin_auth_generates_correct_url_structure() {
        let result = begin_auth(&create_test_config(), None);
        assert!(result
            .auth_url
            .starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?"));
    }

    #[test]
    fn test_begin_auth_includes_all_required_params() {
        let result = begin_auth(&create_test_config(), None);
        assert!(result.auth_url.contains("client_id="));
        assert!(result.auth_url.contains("scope="));
        assert!(result.auth_url.contains("redirect_uri="));
        assert!(result.auth_url.contains("state="));
    }

    #[test]
    fn test_begin_auth_uses_local_redirect_uri() {
        let result = begin_auth(&create_test_config(), None);
        let expected = urlencoding::encode("http://localhost:3456/callback");
        assert!(result.auth_url.contains(&format!("redirect_uri={expected}")));
    }

    #[test]
    fn test_begin_auth_state_in_url_matches_returned_state() {
        let result = begin_auth(&create_test_config(), None);
        assert!(result.auth_url.contains(&format!(
            "state={}",
            urlencoding::encode(result.state.as_ref())
        )));
    }

    #[test]
    fn test_begin_auth_uses_scope_override() {
        let custom: AuthScopes = "read_customers".parse().unwrap();
        let result = begin_auth(&create_test_config(), Some(&custom));
        assert!(result.auth_url.contains("read_customers"));
        assert!(!result.auth_url.contains("write_orders"));
    }

    #[test]
    fn test_begin_auth_unique_states_per_invocation() {
        let config = create_test_config();
        let first = begin_auth(&config, None);
        let second = begin_auth(&config, None);
        assert_ne!(first.state.as_ref(), second.state.as_ref());
    }
}
